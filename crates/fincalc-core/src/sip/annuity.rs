use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::compounding::{
    checked_product, compound_factor, monthly_rate, months, validate_non_negative, validate_rate,
};
use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, InvestmentResult, Money, RatePct, Years};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipInput {
    pub monthly_contribution: Money,
    pub annual_rate_pct: RatePct,
    pub years: Years,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredSipInput {
    pub target_amount: Money,
    pub annual_rate_pct: RatePct,
    pub years: Years,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredSipOutput {
    pub monthly_contribution: Money,
    pub total_invested: Money,
    pub target_amount: Money,
    pub growth_from_returns: Money,
}

// ---------------------------------------------------------------------------
// Closed forms
// ---------------------------------------------------------------------------

/// Annuity-due accumulation factor `((1+i)^n - 1) / i * (1+i)`.
///
/// At `i = 0` the factor degenerates to `n`.
pub fn annuity_due_factor(periodic_rate: Decimal, periods: u32) -> FinCalcResult<Decimal> {
    if periodic_rate.is_zero() {
        return Ok(Decimal::from(periods));
    }
    let growth = compound_factor(periodic_rate, periods)?;
    let one_plus_i = Decimal::ONE + periodic_rate;
    (growth - Decimal::ONE)
        .checked_div(periodic_rate)
        .and_then(|v| v.checked_mul(one_plus_i))
        .ok_or_else(|| FinCalcError::overflow("annuity-due factor"))
}

/// Future value of a monthly contribution paid at the start of each month
/// and compounded monthly.
pub fn future_value_annuity(
    monthly_contribution: Money,
    annual_rate_pct: RatePct,
    years: Years,
) -> FinCalcResult<InvestmentResult> {
    validate_non_negative("monthly_contribution", monthly_contribution)?;
    validate_rate("annual_rate_pct", annual_rate_pct)?;

    let n = months(years)?;
    let factor = annuity_due_factor(monthly_rate(annual_rate_pct), n)?;
    let total_value = checked_product(monthly_contribution, factor, "SIP future value")?;
    let invested = checked_product(monthly_contribution, Decimal::from(n), "SIP contributions")?;

    Ok(InvestmentResult::from_invested_and_total(invested, total_value))
}

/// Monthly contribution needed so that [`future_value_annuity`] reaches
/// `target_future_value`.
pub fn required_contribution_for_target(
    target_future_value: Money,
    annual_rate_pct: RatePct,
    years: Years,
) -> FinCalcResult<Money> {
    validate_non_negative("target_future_value", target_future_value)?;
    validate_rate("annual_rate_pct", annual_rate_pct)?;

    if target_future_value.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if years == 0 {
        return Err(FinCalcError::invalid(
            "years",
            "must be > 0 to accumulate a non-zero target",
        ));
    }

    let factor = annuity_due_factor(monthly_rate(annual_rate_pct), months(years)?)?;
    if factor.is_zero() {
        return Err(FinCalcError::DivisionByZero {
            context: "required SIP annuity factor".into(),
        });
    }
    target_future_value
        .checked_div(factor)
        .ok_or_else(|| FinCalcError::overflow("required SIP"))
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

pub fn calculate_sip(input: &SipInput) -> FinCalcResult<ComputationOutput<InvestmentResult>> {
    let start = Instant::now();
    debug!(
        "sip: contribution={} rate={}% years={}",
        input.monthly_contribution, input.annual_rate_pct, input.years
    );

    let mut warnings = Vec::new();
    if input.annual_rate_pct.is_zero() {
        warnings.push("Rate of 0%: value equals contributions".to_string());
    }

    let result = future_value_annuity(
        input.monthly_contribution,
        input.annual_rate_pct,
        input.years,
    )?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SIP future value, monthly annuity-due: C * ((1+i)^n - 1) / i * (1+i)",
        input,
        warnings,
        elapsed,
        result,
    ))
}

pub fn calculate_required_sip(
    input: &RequiredSipInput,
) -> FinCalcResult<ComputationOutput<RequiredSipOutput>> {
    let start = Instant::now();
    debug!(
        "required sip: target={} rate={}% years={}",
        input.target_amount, input.annual_rate_pct, input.years
    );

    let monthly = required_contribution_for_target(
        input.target_amount,
        input.annual_rate_pct,
        input.years,
    )?;
    let total_invested = checked_product(
        monthly,
        Decimal::from(months(input.years)?),
        "required SIP contributions",
    )?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Required SIP: target / annuity-due factor",
        input,
        Vec::new(),
        elapsed,
        RequiredSipOutput {
            monthly_contribution: monthly,
            total_invested,
            target_amount: input.target_amount,
            growth_from_returns: input.target_amount - total_invested,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sip_reference_scenario() {
        // 5,000/month at 12% for 10 years
        let r = future_value_annuity(dec!(5000), dec!(12), 10).unwrap();
        assert_eq!(r.invested_amount, dec!(600_000));
        assert!((r.total_value - dec!(1_161_695.38)).abs() < dec!(1), "got {}", r.total_value);
        assert!((r.estimated_returns - dec!(561_695.38)).abs() < dec!(1));
        assert_eq!(r.invested_amount + r.estimated_returns, r.total_value);
    }

    #[test]
    fn test_sip_zero_rate_is_sum_of_contributions() {
        let r = future_value_annuity(dec!(2500), dec!(0), 7).unwrap();
        assert_eq!(r.total_value, dec!(2500) * dec!(84));
        assert_eq!(r.estimated_returns, Decimal::ZERO);
    }

    #[test]
    fn test_annuity_due_factor_single_period() {
        // one payment at the start of the period earns one period of interest
        assert_eq!(annuity_due_factor(dec!(0.01), 1).unwrap(), dec!(1.01));
    }

    #[test]
    fn test_sip_rejects_negative_contribution() {
        assert!(future_value_annuity(dec!(-1), dec!(12), 10).is_err());
    }

    #[test]
    fn test_sip_huge_contribution_reports_overflow() {
        let err = future_value_annuity(dec!(1e27), dec!(-50), 10).unwrap_err();
        assert!(matches!(err, FinCalcError::Overflow { .. }));
    }

    #[test]
    fn test_required_contribution_inverts_future_value() {
        let target = dec!(1_000_000);
        let monthly = required_contribution_for_target(target, dec!(10), 8).unwrap();
        let fv = future_value_annuity(monthly, dec!(10), 8).unwrap();
        assert!((fv.total_value - target).abs() < dec!(0.01), "got {}", fv.total_value);
    }

    #[test]
    fn test_required_contribution_zero_rate() {
        let monthly = required_contribution_for_target(dec!(120_000), dec!(0), 10).unwrap();
        assert_eq!(monthly, dec!(1000));
    }

    #[test]
    fn test_required_contribution_zero_target() {
        assert_eq!(
            required_contribution_for_target(dec!(0), dec!(12), 0).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_required_contribution_zero_years_rejected() {
        assert!(required_contribution_for_target(dec!(10), dec!(12), 0).is_err());
    }

    #[test]
    fn test_calculate_required_sip_totals() {
        let input = RequiredSipInput {
            target_amount: dec!(120_000),
            annual_rate_pct: dec!(0),
            years: 10,
        };
        let out = calculate_required_sip(&input).unwrap();
        assert_eq!(out.result.monthly_contribution, dec!(1000));
        assert_eq!(out.result.total_invested, dec!(120_000));
        assert_eq!(out.result.growth_from_returns, Decimal::ZERO);
    }

    #[test]
    fn test_calculate_sip_zero_rate_warning() {
        let input = SipInput {
            monthly_contribution: dec!(100),
            annual_rate_pct: dec!(0),
            years: 1,
        };
        let out = calculate_sip(&input).unwrap();
        assert_eq!(out.result.total_value, dec!(1200));
        assert_eq!(out.warnings.len(), 1);
    }
}
