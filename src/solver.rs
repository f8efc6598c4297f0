//! XIRR root-finding
//!
//! Newton-Raphson iteration on the net present value of a dated cash flow
//! set, wrapped in a guess-sweeping driver that retries from a range of
//! starting rates when the primary attempt fails to converge.

use crate::payment::Payment;
use thiserror::Error;

/// Convergence tolerance on the Newton step size
pub const TOLERANCE: f64 = 1e-10;

/// Maximum Newton-Raphson iterations per starting guess
pub const MAX_ITERATIONS: u32 = 50;

/// Starting rate for the primary solve attempt (10%)
const INITIAL_GUESS: f64 = 0.1;

/// Fallback sweep over starting guesses: [-0.99, 1.0) in steps of 0.01
const SWEEP_START: f64 = -0.99;
const SWEEP_END: f64 = 1.0;
const SWEEP_STEP: f64 = 0.01;

/// The cash flow set cannot have a rate of return
///
/// Raised when the set lacks a strictly positive or a strictly negative
/// amount. Zero amounts count toward neither side, so an empty set fails
/// as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cash-flow set must contain both an inflow and an outflow")]
pub struct InvalidInputError;

/// Outcome of a solve over a valid cash flow set
///
/// Total non-convergence is an expected numeric outcome, not an error:
/// the guess sweep can exhaust its range without any starting point
/// reaching tolerance. Callers that want the raw float contract (finite
/// rate or NaN) can use [`Solution::value`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solution {
    /// Newton-Raphson reached tolerance at this annual rate
    Converged(f64),
    /// No starting guess converged to a finite rate
    Unresolved,
}

impl Solution {
    /// The converged rate, or `f64::NAN` when unresolved
    pub fn value(&self) -> f64 {
        match self {
            Solution::Converged(rate) => *rate,
            Solution::Unresolved => f64::NAN,
        }
    }

    /// The converged rate, if any
    pub fn converged(&self) -> Option<f64> {
        match self {
            Solution::Converged(rate) => Some(*rate),
            Solution::Unresolved => None,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Solution::Converged(_))
    }
}

/// Compute the XIRR of a set of dated cash flows
///
/// Validates the set, sorts a private copy by date, then runs
/// Newton-Raphson from an initial guess of 10%. If that fails to reach a
/// finite rate, re-attempts from starting guesses swept across
/// [-0.99, 1.0) in 0.01 steps until one converges or the range is
/// exhausted.
///
/// The input is read-only; payments may be passed in any date order.
///
/// # Returns
/// * `Ok(Solution::Converged(rate))` - annual rate making the NPV zero
/// * `Ok(Solution::Unresolved)` - no guess converged; not an error
/// * `Err(InvalidInputError)` - the set lacks an inflow or an outflow
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use xirr::{compute, Payment};
///
/// let payments = vec![
///     Payment::new(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(), -1000.0),
///     Payment::new(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 1100.0),
/// ];
///
/// let rate = compute(&payments).unwrap().value();
/// assert!((rate - 0.10).abs() < 1e-9);
/// ```
pub fn compute(payments: &[Payment]) -> Result<Solution, InvalidInputError> {
    validate(payments)?;

    let mut sorted = payments.to_vec();
    sorted.sort_by_key(|p| p.date);

    let mut rate = solve_from_guess(&sorted, INITIAL_GUESS);

    if !rate.is_finite() {
        log::debug!("primary guess {} did not converge, sweeping", INITIAL_GUESS);

        // Repeated float addition: the exact sequence of starting points
        // decides which root is found when several exist.
        let mut guess = SWEEP_START;
        while guess < SWEEP_END && !rate.is_finite() {
            rate = solve_from_guess(&sorted, guess);
            guess += SWEEP_STEP;
        }
    }

    if rate.is_finite() {
        Ok(Solution::Converged(rate))
    } else {
        Ok(Solution::Unresolved)
    }
}

/// Check that the set contains both an inflow and an outflow
fn validate(payments: &[Payment]) -> Result<(), InvalidInputError> {
    let positive = payments.iter().any(|p| p.amount > 0.0);
    let negative = payments.iter().any(|p| p.amount < 0.0);

    if positive && negative {
        Ok(())
    } else {
        Err(InvalidInputError)
    }
}

/// Run Newton-Raphson from a single starting guess
///
/// Returns the rate once the step size drops to [`TOLERANCE`], or
/// `f64::NAN` when [`MAX_ITERATIONS`] are exhausted. A zero derivative is
/// not special-cased: the non-finite step it produces never reaches
/// tolerance and falls through to the same sentinel.
fn solve_from_guess(payments: &[Payment], guess: f64) -> f64 {
    let mut rate = guess;
    let mut step = 1.0;

    for _ in 0..MAX_ITERATIONS {
        if step <= TOLERANCE {
            return rate;
        }

        let next = rate - npv(payments, rate) / dnpv(payments, rate);
        step = (next - rate).abs();
        rate = next;
    }

    f64::NAN
}

/// Net present value of a date-sorted cash flow set at annual rate `rate`
///
/// Each amount is discounted back to the earliest date over a 365-day
/// year. Requires `rate > -1` to be mathematically defined; out-of-domain
/// rates produce NaN or infinite values rather than an error.
pub fn npv(payments: &[Payment], rate: f64) -> f64 {
    let Some(base) = payments.first().map(|p| p.date) else {
        return 0.0;
    };

    payments
        .iter()
        .map(|p| p.amount / (1.0 + rate).powf(p.year_fraction(base)))
        .sum()
}

/// First derivative of [`npv`] with respect to the rate
pub fn dnpv(payments: &[Payment], rate: f64) -> f64 {
    let Some(base) = payments.first().map(|p| p.date) else {
        return 0.0;
    };

    -payments
        .iter()
        .map(|p| {
            let t = p.year_fraction(base);
            p.amount * t / (1.0 + rate).powf(t + 1.0)
        })
        .sum::<f64>()
}
