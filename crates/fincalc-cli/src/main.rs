mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::investment::{CagrArgs, LumpsumArgs, RequiredSipArgs, SipArgs, SteppedSipArgs};
use commands::loans::EmiArgs;
use commands::planning::{GoalArgs, InsuranceArgs, RetirementArgs};
use commands::tax::{IncomeTaxArgs, TaxRegimeArgs};

/// Personal-finance calculators with decimal precision
#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Personal-finance calculators with decimal precision",
    long_about = "A CLI for investment and loan arithmetic with decimal precision. \
                  Supports lump sum and SIP projections, step-up SIPs, EMI schedules, \
                  CAGR, slab income tax, goal planning, life cover and retirement corpus."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculator inputs and intermediate steps to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Grow a one-time investment with annual compounding
    Lumpsum(LumpsumArgs),
    /// Project a monthly SIP (annuity-due, monthly compounding)
    Sip(SipArgs),
    /// Monthly SIP needed to reach a target corpus
    SipRequired(RequiredSipArgs),
    /// Step-up SIP with a year-by-year corpus trace
    SteppedSip(SteppedSipArgs),
    /// Loan EMI with yearly principal/interest schedule
    Emi(EmiArgs),
    /// Compound annual growth rate between two values
    Cagr(CagrArgs),
    /// Income tax under a slab regime with rebate and cess
    IncomeTax(IncomeTaxArgs),
    /// Print the built-in tax regime (a template for --regime files)
    TaxRegime(TaxRegimeArgs),
    /// Savings needed for a future goal (education, marriage, car, ...)
    Goal(GoalArgs),
    /// Recommended life cover by income multiple
    Insurance(InsuranceArgs),
    /// Retirement corpus and the SIP needed to build it
    Retirement(RetirementArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Lumpsum(args) => commands::investment::run_lumpsum(args),
        Commands::Sip(args) => commands::investment::run_sip(args),
        Commands::SipRequired(args) => commands::investment::run_required_sip(args),
        Commands::SteppedSip(args) => commands::investment::run_stepped_sip(args),
        Commands::Emi(args) => commands::loans::run_emi(args),
        Commands::Cagr(args) => commands::investment::run_cagr(args),
        Commands::IncomeTax(args) => commands::tax::run_income_tax(args),
        Commands::TaxRegime(args) => commands::tax::run_tax_regime(args),
        Commands::Goal(args) => commands::planning::run_goal(args),
        Commands::Insurance(args) => commands::planning::run_insurance(args),
        Commands::Retirement(args) => commands::planning::run_retirement(args),
        Commands::Version => {
            println!("fincalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
