//! XIRR CLI
//!
//! Computes the extended internal rate of return for one or more CSV cash
//! flow files (headerless `amount,date` rows). Files are processed in
//! parallel. Supports JSON output for scripting via --json.

use anyhow::{anyhow, Context};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use xirr::{compute, loader};

#[derive(Parser)]
#[command(name = "xirr", version, about = "XIRR solver for dated cash flow files")]
struct Args {
    /// CSV files of amount,date rows
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Emit results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FileReport {
    file: String,
    payments: usize,
    /// Annual rate as a decimal; absent when no guess converged
    rate: Option<f64>,
    converged: bool,
    execution_time_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let reports = args
        .files
        .par_iter()
        .map(|path| {
            let start = Instant::now();

            let payments = loader::load_payments(path)
                .map_err(|e| anyhow!("{}: {}", path.display(), e))?;

            let solution = compute(&payments)
                .with_context(|| format!("{}", path.display()))?;

            Ok(FileReport {
                file: path.display().to_string(),
                payments: payments.len(),
                rate: solution.converged(),
                converged: solution.is_converged(),
                execution_time_ms: start.elapsed().as_millis() as u64,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            match report.rate {
                Some(rate) => println!(
                    "{}: {} payments, XIRR = {:.10} ({:.4}%)",
                    report.file,
                    report.payments,
                    rate,
                    rate * 100.0
                ),
                None => println!(
                    "{}: {} payments, did not converge within the guess sweep",
                    report.file, report.payments
                ),
            }
        }
    }

    Ok(())
}
