use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::loans::emi::{self, EmiInput};

use crate::input;

/// Arguments for EMI and the amortization schedule
#[derive(Args)]
pub struct EmiArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub loan: Option<Decimal>,

    /// Annual interest rate in percent (8.5 = 8.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Drop the year-by-year schedule from the output
    #[arg(long)]
    pub summary_only: bool,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let emi_input: EmiInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let (Some(loan), Some(rate), Some(years)) = (args.loan, args.rate, args.years) {
        EmiInput {
            loan_amount: loan,
            annual_rate_pct: rate,
            years,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json>, --loan/--rate/--years, or stdin required".into());
    };
    let result = emi::calculate_emi(&emi_input)?;
    let mut value = serde_json::to_value(result)?;
    if args.summary_only {
        if let Some(result) = value.get_mut("result").and_then(Value::as_object_mut) {
            result.remove("schedule");
        }
    }
    Ok(value)
}
