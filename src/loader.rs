//! Load payments from CSV cash flow files
//!
//! Rows are headerless `amount,date` pairs, e.g. `-1000.00,2020-01-01`.
//! Dates are accepted in ISO form (`%Y-%m-%d`) or the short day-first form
//! (`%d/%m/%y`) used by the shipped sample data.

use crate::payment::Payment;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use std::error::Error;
use std::path::Path;

/// Raw CSV row: amount first, date second
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    amount: f64,
    date: String,
}

impl CsvRow {
    fn to_payment(self) -> Result<Payment, Box<dyn Error>> {
        Ok(Payment::new(parse_date(&self.date)?, self.amount))
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, Box<dyn Error>> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%y"))
        .map_err(|e| format!("invalid date {:?}: {}", s, e).into())
}

/// Load all payments from a CSV file
pub fn load_payments<P: AsRef<Path>>(path: P) -> Result<Vec<Payment>, Box<dyn Error>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_path(path)?;
    let mut payments = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        payments.push(row.to_payment()?);
    }

    Ok(payments)
}

/// Load payments from any reader (e.g., string buffer, network stream)
pub fn load_payments_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Payment>, Box<dyn Error>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(reader);
    let mut payments = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        payments.push(row.to_payment()?);
    }

    Ok(payments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{compute, npv};

    #[test]
    fn test_load_from_reader() {
        let data = "\
-1000.00,2020-01-01
500.00,01/07/20
600.00,2021-01-01
";
        let payments = load_payments_from_reader(data.as_bytes()).unwrap();
        assert_eq!(payments.len(), 3);

        assert_eq!(payments[0].amount, -1000.0);
        assert_eq!(payments[0].date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());

        // Day-first short form: 01/07/20 is July 1st, 2020
        assert_eq!(payments[1].date, NaiveDate::from_ymd_opt(2020, 7, 1).unwrap());
    }

    #[test]
    fn test_bad_amount_is_an_error() {
        let data = "not-a-number,2020-01-01\n";
        assert!(load_payments_from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_bad_date_is_an_error() {
        let data = "100.00,2020-13-40\n";
        assert!(load_payments_from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_sample_file_converges() {
        let payments = load_payments("samples/random.csv").expect("Failed to load sample");
        assert_eq!(payments.len(), 22);

        let solution = compute(&payments).expect("sample has both signs");
        let rate = solution.converged().expect("sample must converge");

        // Plausible annual rate for the fixture, and genuinely a root
        assert!(rate > 0.0 && rate < 0.5, "unexpected rate: {}", rate);

        let mut sorted = payments.clone();
        sorted.sort_by_key(|p| p.date);
        let residual = npv(&sorted, rate);
        assert!(residual.abs() < 1e-4, "npv residual too large: {}", residual);
    }
}
