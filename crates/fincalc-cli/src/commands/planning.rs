use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::planning::goal::{self, GoalInput, GoalKind};
use fincalc_core::planning::insurance::{self, InsuranceNeedInput};
use fincalc_core::planning::retirement::{self, RetirementInput};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GoalArg {
    Education,
    Marriage,
    Retirement,
    Car,
    Home,
    Custom,
}

impl From<GoalArg> for GoalKind {
    fn from(arg: GoalArg) -> Self {
        match arg {
            GoalArg::Education => GoalKind::Education,
            GoalArg::Marriage => GoalKind::Marriage,
            GoalArg::Retirement => GoalKind::Retirement,
            GoalArg::Car => GoalKind::Car,
            GoalArg::Home => GoalKind::Home,
            GoalArg::Custom => GoalKind::Custom,
        }
    }
}

/// Arguments for goal-based savings planning
#[derive(Args)]
pub struct GoalArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// What the goal is
    #[arg(long, value_enum, default_value = "custom")]
    pub goal: GoalArg,

    /// Cost of the goal in today's money
    #[arg(long)]
    pub cost: Option<Decimal>,

    /// Years until the money is needed
    #[arg(long)]
    pub years: Option<u32>,

    /// Expected inflation in percent
    #[arg(long, default_value = "6")]
    pub inflation: Decimal,

    /// Expected annual return in percent
    #[arg(long, default_value = "12")]
    pub expected_return: Decimal,
}

/// Arguments for life cover (human life value)
#[derive(Args)]
pub struct InsuranceArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly income
    #[arg(long)]
    pub monthly_income: Option<Decimal>,

    /// Outstanding loans and other liabilities
    #[arg(long, default_value = "0")]
    pub liabilities: Decimal,

    /// Life cover already held
    #[arg(long, default_value = "0")]
    pub existing_cover: Decimal,
}

/// Arguments for retirement corpus planning
#[derive(Args)]
pub struct RetirementArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_goal(args: GoalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let goal_input: GoalInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let (Some(cost), Some(years)) = (args.cost, args.years) {
        GoalInput {
            goal: args.goal.into(),
            current_cost: cost,
            years,
            inflation_rate_pct: args.inflation,
            expected_return_pct: args.expected_return,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json>, --cost/--years, or stdin required for goal planning".into());
    };
    let result = goal::calculate_goal(&goal_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_insurance(args: InsuranceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ins_input: InsuranceNeedInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(monthly_income) = args.monthly_income {
        InsuranceNeedInput {
            monthly_income,
            existing_liabilities: args.liabilities,
            existing_insurance_cover: args.existing_cover,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json>, --monthly-income, or stdin required".into());
    };
    let result = insurance::calculate_insurance_need(&ins_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_retirement(args: RetirementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ret_input: RetirementInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json> or stdin required for retirement planning".into());
    };
    let result = retirement::calculate_retirement(&ret_input)?;
    Ok(serde_json::to_value(result)?)
}
