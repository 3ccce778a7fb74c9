use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::compounding::{self, LumpsumInput};
use fincalc_core::growth::{self, CagrInput};
use fincalc_core::sip::annuity::{self, RequiredSipInput, SipInput};
use fincalc_core::sip::stepped::{self, StepUp, SteppedSipInput};

use crate::input;

/// Arguments for a one-time (lump sum) investment
#[derive(Args)]
pub struct LumpsumArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Amount invested today
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Expected annual return in percent (12 = 12%)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Holding period in years
    #[arg(long)]
    pub years: Option<u32>,
}

/// Arguments for a monthly SIP projection
#[derive(Args)]
pub struct SipArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly contribution
    #[arg(long)]
    pub contribution: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Investment period in years
    #[arg(long)]
    pub years: Option<u32>,
}

/// Arguments for back-solving the SIP needed to reach a target
#[derive(Args)]
pub struct RequiredSipArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Target corpus
    #[arg(long)]
    pub target: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Years to reach the target
    #[arg(long)]
    pub years: Option<u32>,
}

/// Arguments for a step-up SIP with a year-by-year trace
#[derive(Args)]
pub struct SteppedSipArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Starting monthly contribution
    #[arg(long)]
    pub contribution: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Investment period in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Fixed amount added to the monthly contribution each year
    #[arg(long, conflicts_with = "step_up_pct")]
    pub step_up: Option<Decimal>,

    /// Percentage raise of the monthly contribution each year
    #[arg(long)]
    pub step_up_pct: Option<Decimal>,
}

/// Arguments for compound annual growth rate
#[derive(Args)]
pub struct CagrArgs {
    /// Starting value
    #[arg(long)]
    pub initial: Decimal,

    /// Ending value
    #[arg(long = "final")]
    pub final_value: Decimal,

    /// Elapsed years (fractions allowed)
    #[arg(long)]
    pub years: Decimal,
}

pub fn run_lumpsum(args: LumpsumArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ls_input: LumpsumInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let (Some(principal), Some(rate), Some(years)) = (args.principal, args.rate, args.years) {
        LumpsumInput {
            principal,
            annual_rate_pct: rate,
            years,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json>, --principal/--rate/--years, or stdin required".into());
    };
    let result = compounding::calculate_lumpsum(&ls_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sip_input: SipInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let (Some(contribution), Some(rate), Some(years)) =
        (args.contribution, args.rate, args.years)
    {
        SipInput {
            monthly_contribution: contribution,
            annual_rate_pct: rate,
            years,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json>, --contribution/--rate/--years, or stdin required".into());
    };
    let result = annuity::calculate_sip(&sip_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_required_sip(args: RequiredSipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let req_input: RequiredSipInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let (Some(target), Some(rate), Some(years)) = (args.target, args.rate, args.years) {
        RequiredSipInput {
            target_amount: target,
            annual_rate_pct: rate,
            years,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json>, --target/--rate/--years, or stdin required".into());
    };
    let result = annuity::calculate_required_sip(&req_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_stepped_sip(args: SteppedSipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let step_input: SteppedSipInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let (Some(contribution), Some(rate), Some(years)) =
        (args.contribution, args.rate, args.years)
    {
        let step_up = match (args.step_up, args.step_up_pct) {
            (_, Some(pct)) => StepUp::Percent(pct),
            (Some(amount), None) => StepUp::Amount(amount),
            (None, None) => StepUp::default(),
        };
        SteppedSipInput {
            monthly_contribution: contribution,
            annual_rate_pct: rate,
            years,
            step_up,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json>, --contribution/--rate/--years, or stdin required".into());
    };
    let result = stepped::calculate_stepped_sip(&step_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_cagr(args: CagrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cagr_input = CagrInput {
        initial_value: args.initial,
        final_value: args.final_value,
        years: args.years,
    };
    let result = growth::calculate_cagr(&cagr_input)?;
    Ok(serde_json::to_value(result)?)
}
