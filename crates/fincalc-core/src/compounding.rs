use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, InvestmentResult, Money, RatePct, Years};
use crate::FinCalcResult;

const HUNDRED: Decimal = dec!(100);
const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Convert an annual percentage into a per-period decimal rate.
pub(crate) fn periodic_rate(annual_rate_pct: RatePct, periods_per_year: u32) -> Decimal {
    annual_rate_pct / HUNDRED / Decimal::from(periods_per_year)
}

/// Monthly decimal rate for an annual percentage.
pub(crate) fn monthly_rate(annual_rate_pct: RatePct) -> Decimal {
    periodic_rate(annual_rate_pct, MONTHS_PER_YEAR)
}

/// Number of monthly periods in `years`.
pub(crate) fn months(years: Years) -> FinCalcResult<u32> {
    years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| FinCalcError::invalid("years", "tenure too long"))
}

/// Rates at or below -100% would zero (or flip) the growth base.
pub(crate) fn validate_rate(field: &str, annual_rate_pct: RatePct) -> FinCalcResult<()> {
    if annual_rate_pct <= -HUNDRED {
        return Err(FinCalcError::invalid(field, "rate must be greater than -100%"));
    }
    Ok(())
}

pub(crate) fn validate_non_negative(field: &str, amount: Money) -> FinCalcResult<()> {
    if amount < Decimal::ZERO {
        return Err(FinCalcError::invalid(field, "must be >= 0"));
    }
    Ok(())
}

/// `a * b`, reporting overflow instead of panicking.
pub(crate) fn checked_product(a: Decimal, b: Decimal, context: &str) -> FinCalcResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| FinCalcError::overflow(context))
}

/// Compute (1 + r)^n by square-and-multiply (avoids Decimal::powd drift).
pub fn compound_factor(rate: Decimal, n: u32) -> FinCalcResult<Decimal> {
    let factor = Decimal::ONE + rate;
    if n == 0 || factor == Decimal::ONE {
        return Ok(Decimal::ONE);
    }
    if factor.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let overflow = || FinCalcError::overflow(format!("(1 + {rate})^{n}"));
    let mut result = Decimal::ONE;
    let mut base = factor;
    let mut exp = n;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result.checked_mul(base).ok_or_else(overflow)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = base.checked_mul(base).ok_or_else(overflow)?;
        }
    }
    Ok(result)
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// Future value of a lump sum under annual compounding:
/// `principal * (1 + rate/100)^years`.
///
/// Negative rates model depreciation. A zero principal yields zero.
pub fn future_value_lumpsum(
    principal: Money,
    annual_rate_pct: RatePct,
    years: Years,
) -> FinCalcResult<Money> {
    validate_non_negative("principal", principal)?;
    validate_rate("annual_rate_pct", annual_rate_pct)?;
    grow(principal, annual_rate_pct, years)
}

/// Today's cost of a goal carried forward at the inflation rate.
///
/// Same arithmetic as [`future_value_lumpsum`]; kept separate so goal
/// projections read as what they are.
pub fn future_value_inflated_cost(
    current_cost: Money,
    inflation_rate_pct: RatePct,
    years: Years,
) -> FinCalcResult<Money> {
    validate_non_negative("current_cost", current_cost)?;
    validate_rate("inflation_rate_pct", inflation_rate_pct)?;
    grow(current_cost, inflation_rate_pct, years)
}

/// Single-shot discount of a future amount back to today at an annual rate.
pub fn present_value_lumpsum(
    future_value: Money,
    annual_rate_pct: RatePct,
    years: Years,
) -> FinCalcResult<Money> {
    validate_non_negative("future_value", future_value)?;
    validate_rate("annual_rate_pct", annual_rate_pct)?;
    let factor = compound_factor(annual_rate_pct / HUNDRED, years)?;
    if factor.is_zero() {
        return Err(FinCalcError::DivisionByZero {
            context: "present value discount factor".into(),
        });
    }
    future_value
        .checked_div(factor)
        .ok_or_else(|| FinCalcError::overflow("present value discount"))
}

fn grow(amount: Money, annual_rate_pct: RatePct, years: Years) -> FinCalcResult<Money> {
    let factor = compound_factor(annual_rate_pct / HUNDRED, years)?;
    amount
        .checked_mul(factor)
        .ok_or_else(|| FinCalcError::overflow("lump sum growth"))
}

// ---------------------------------------------------------------------------
// Lumpsum calculator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpsumInput {
    pub principal: Money,
    pub annual_rate_pct: RatePct,
    pub years: Years,
}

/// One-time investment grown with annual compounding.
pub fn calculate_lumpsum(
    input: &LumpsumInput,
) -> FinCalcResult<ComputationOutput<InvestmentResult>> {
    let start = Instant::now();
    debug!(
        "lumpsum: principal={} rate={}% years={}",
        input.principal, input.annual_rate_pct, input.years
    );

    let mut warnings = Vec::new();
    if input.annual_rate_pct < Decimal::ZERO {
        warnings.push("Negative rate: value depreciates over the horizon".to_string());
    }
    if input.years == 0 {
        warnings.push("Zero-year horizon: total value equals principal".to_string());
    }

    let total = future_value_lumpsum(input.principal, input.annual_rate_pct, input.years)?;
    let result = InvestmentResult::from_invested_and_total(input.principal, total);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Lump sum, annual compounding: P * (1 + r)^years",
        input,
        warnings,
        elapsed,
        result,
    ))
}
