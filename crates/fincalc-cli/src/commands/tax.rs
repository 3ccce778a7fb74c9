use clap::Args;
use log::debug;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::tax::income_tax::{self, IncomeTaxInput};
use fincalc_core::tax::regime::TaxRegime;

use crate::input;

/// Arguments for income tax under a slab regime
#[derive(Args)]
pub struct IncomeTaxArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Gross annual income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Tax regime file (YAML or JSON); defaults to the built-in regime
    #[arg(long)]
    pub regime: Option<String>,
}

/// Arguments for printing the built-in tax regime
#[derive(Args)]
pub struct TaxRegimeArgs {}

pub fn run_income_tax(args: IncomeTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut tax_input: IncomeTaxInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(income) = args.income {
        IncomeTaxInput {
            gross_annual_income: income,
            regime: None,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json>, --income, or stdin required for income tax".into());
    };

    if let Some(ref path) = args.regime {
        tax_input.regime = Some(input::config::read_regime(path)?);
    } else if tax_input.regime.is_none() {
        debug!("no tax regime supplied, using built-in default");
    }

    let result = income_tax::calculate_income_tax(&tax_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_tax_regime(_args: TaxRegimeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(TaxRegime::default())?)
}
