use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::compounding::{
    checked_product, compound_factor, future_value_inflated_cost, future_value_lumpsum,
    validate_rate,
};
use crate::error::FinCalcError;
use crate::sip::annuity::required_contribution_for_target;
use crate::types::{with_metadata, ComputationOutput, Money, RatePct, Years};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub current_monthly_expenses: Money,
    pub inflation_rate_pct: RatePct,
    pub pre_retirement_return_pct: RatePct,
    pub post_retirement_return_pct: RatePct,
    #[serde(default)]
    pub existing_savings: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementPlan {
    pub years_to_retirement: Years,
    pub years_in_retirement: Years,
    pub monthly_expenses_at_retirement: Money,
    pub corpus_required: Money,
    pub existing_savings_future_value: Money,
    pub corpus_shortfall: Money,
    pub monthly_sip_required: Money,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Present value at retirement of `years` annual withdrawals taken at the
/// start of each year, growing with inflation and discounted at the
/// post-retirement return. Works on the real rate `(1+post)/(1+infl) - 1`.
fn corpus_for_expenses(
    first_year_expenses: Money,
    years: Years,
    inflation_rate_pct: RatePct,
    post_retirement_return_pct: RatePct,
) -> FinCalcResult<Money> {
    let real_rate = (Decimal::ONE + post_retirement_return_pct / dec!(100))
        .checked_div(Decimal::ONE + inflation_rate_pct / dec!(100))
        .ok_or_else(|| FinCalcError::overflow("retirement real rate"))?
        - Decimal::ONE;

    if real_rate.is_zero() {
        return checked_product(first_year_expenses, Decimal::from(years), "retirement corpus");
    }

    let growth = compound_factor(real_rate, years)?;
    if growth.is_zero() {
        return Err(FinCalcError::DivisionByZero {
            context: "retirement real-rate discount".into(),
        });
    }
    let overflow = || FinCalcError::overflow("retirement annuity factor");
    let discount = Decimal::ONE.checked_div(growth).ok_or_else(overflow)?;
    let annuity_due = (Decimal::ONE - discount)
        .checked_div(real_rate)
        .and_then(|v| v.checked_mul(Decimal::ONE + real_rate))
        .ok_or_else(overflow)?;
    checked_product(first_year_expenses, annuity_due, "retirement corpus")
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn plan_retirement_corpus(input: &RetirementInput) -> FinCalcResult<RetirementPlan> {
    if input.retirement_age <= input.current_age {
        return Err(FinCalcError::invalid(
            "retirement_age",
            "retirement_age must be > current_age",
        ));
    }
    if input.life_expectancy <= input.retirement_age {
        return Err(FinCalcError::invalid(
            "life_expectancy",
            "life_expectancy must be > retirement_age",
        ));
    }
    validate_rate("post_retirement_return_pct", input.post_retirement_return_pct)?;

    let years_to_retirement = input.retirement_age - input.current_age;
    let years_in_retirement = input.life_expectancy - input.retirement_age;

    let monthly_expenses_at_retirement = future_value_inflated_cost(
        input.current_monthly_expenses,
        input.inflation_rate_pct,
        years_to_retirement,
    )?;
    let corpus_required = corpus_for_expenses(
        checked_product(monthly_expenses_at_retirement, dec!(12), "annual expenses")?,
        years_in_retirement,
        input.inflation_rate_pct,
        input.post_retirement_return_pct,
    )?;
    let existing_savings_future_value = future_value_lumpsum(
        input.existing_savings,
        input.pre_retirement_return_pct,
        years_to_retirement,
    )?;
    let corpus_shortfall = (corpus_required - existing_savings_future_value).max(Decimal::ZERO);
    let monthly_sip_required = required_contribution_for_target(
        corpus_shortfall,
        input.pre_retirement_return_pct,
        years_to_retirement,
    )?;

    Ok(RetirementPlan {
        years_to_retirement,
        years_in_retirement,
        monthly_expenses_at_retirement,
        corpus_required,
        existing_savings_future_value,
        corpus_shortfall,
        monthly_sip_required,
    })
}

pub fn calculate_retirement(
    input: &RetirementInput,
) -> FinCalcResult<ComputationOutput<RetirementPlan>> {
    let start = Instant::now();
    debug!(
        "retirement: age {}->{} (life {}), expenses={}/month",
        input.current_age, input.retirement_age, input.life_expectancy, input.current_monthly_expenses
    );

    let plan = plan_retirement_corpus(input)?;

    let mut warnings = Vec::new();
    if input.post_retirement_return_pct <= input.inflation_rate_pct {
        warnings.push(
            "Post-retirement return does not beat inflation: corpus shrinks in real terms".into(),
        );
    }
    if plan.corpus_shortfall.is_zero() {
        warnings.push("Existing savings already cover the retirement corpus".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Retirement corpus: inflate expenses, real-rate annuity-due PV, fund shortfall by SIP",
        input,
        warnings,
        elapsed,
        plan,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_input() -> RetirementInput {
        RetirementInput {
            current_age: 30,
            retirement_age: 60,
            life_expectancy: 85,
            current_monthly_expenses: dec!(50_000),
            inflation_rate_pct: dec!(6),
            pre_retirement_return_pct: dec!(12),
            post_retirement_return_pct: dec!(8),
            existing_savings: dec!(1_000_000),
        }
    }

    #[test]
    fn test_reference_plan() {
        let plan = plan_retirement_corpus(&default_input()).unwrap();
        assert_eq!(plan.years_to_retirement, 30);
        assert_eq!(plan.years_in_retirement, 25);
        assert!((plan.monthly_expenses_at_retirement - dec!(287_174.56)).abs() < dec!(1));
        assert!((plan.corpus_required - dec!(69_468_932.61)).abs() < dec!(5));
        assert!((plan.existing_savings_future_value - dec!(29_959_922.12)).abs() < dec!(1));
        assert!((plan.monthly_sip_required - dec!(11_192.63)).abs() < dec!(1));
    }

    #[test]
    fn test_zero_real_rate_is_simple_multiple() {
        let mut input = default_input();
        input.post_retirement_return_pct = dec!(6);
        let plan = plan_retirement_corpus(&input).unwrap();
        let annual = plan.monthly_expenses_at_retirement * dec!(12);
        assert_eq!(plan.corpus_required, annual * dec!(25));
    }

    #[test]
    fn test_large_savings_leave_no_shortfall() {
        let mut input = default_input();
        input.existing_savings = dec!(100_000_000);
        let out = calculate_retirement(&input).unwrap();
        assert_eq!(out.result.corpus_shortfall, Decimal::ZERO);
        assert_eq!(out.result.monthly_sip_required, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_huge_expenses_report_overflow() {
        let mut input = default_input();
        input.current_monthly_expenses = dec!(1e27);
        input.post_retirement_return_pct = dec!(6);
        let err = plan_retirement_corpus(&input).unwrap_err();
        assert!(matches!(err, FinCalcError::Overflow { .. }));
    }

    #[test]
    fn test_age_ordering_enforced() {
        let mut input = default_input();
        input.retirement_age = 30;
        assert!(plan_retirement_corpus(&input).is_err());

        let mut input = default_input();
        input.life_expectancy = 60;
        assert!(plan_retirement_corpus(&input).is_err());
    }
}
