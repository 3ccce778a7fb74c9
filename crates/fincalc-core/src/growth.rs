use log::debug;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, RatePct};
use crate::FinCalcResult;

/// Compound annual growth rate, as a percentage:
/// `((final / initial)^(1 / years) - 1) * 100`.
///
/// `years` may be fractional. Fails with `InvalidInput` when
/// `initial_value <= 0`, `years <= 0` or `final_value < 0`.
pub fn compute_cagr(initial_value: Money, final_value: Money, years: Decimal) -> FinCalcResult<RatePct> {
    if initial_value <= Decimal::ZERO {
        return Err(FinCalcError::invalid("initial_value", "must be > 0"));
    }
    if years <= Decimal::ZERO {
        return Err(FinCalcError::invalid("years", "must be > 0"));
    }
    if final_value < Decimal::ZERO {
        return Err(FinCalcError::invalid("final_value", "must be >= 0"));
    }
    if final_value.is_zero() {
        return Ok(dec!(-100));
    }

    let ratio = growth_multiple(initial_value, final_value)?;
    let growth = if years == Decimal::ONE {
        ratio
    } else {
        ratio
            .checked_powd(Decimal::ONE / years)
            .ok_or_else(|| FinCalcError::overflow("CAGR root"))?
    };
    as_percent(growth)
}

fn growth_multiple(initial_value: Money, final_value: Money) -> FinCalcResult<Decimal> {
    final_value
        .checked_div(initial_value)
        .ok_or_else(|| FinCalcError::overflow("growth multiple"))
}

fn as_percent(multiple: Decimal) -> FinCalcResult<RatePct> {
    (multiple - Decimal::ONE)
        .checked_mul(dec!(100))
        .ok_or_else(|| FinCalcError::overflow("growth percentage"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CagrInput {
    pub initial_value: Money,
    pub final_value: Money,
    pub years: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CagrOutput {
    pub cagr_pct: RatePct,
    pub absolute_return_pct: RatePct,
    pub growth_multiple: Decimal,
}

pub fn calculate_cagr(input: &CagrInput) -> FinCalcResult<ComputationOutput<CagrOutput>> {
    let start = Instant::now();
    debug!(
        "cagr: initial={} final={} years={}",
        input.initial_value, input.final_value, input.years
    );

    let cagr_pct = compute_cagr(input.initial_value, input.final_value, input.years)?;
    let growth_multiple = growth_multiple(input.initial_value, input.final_value)?;
    let absolute_return_pct = as_percent(growth_multiple)?;

    let mut warnings = Vec::new();
    if input.years < Decimal::ONE {
        warnings.push("Holding period under one year: CAGR annualises a short-term move".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "CAGR: (final / initial)^(1 / years) - 1",
        input,
        warnings,
        elapsed,
        CagrOutput {
            cagr_pct,
            absolute_return_pct,
            growth_multiple,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cagr_doubling_in_one_year() {
        assert_eq!(compute_cagr(dec!(100), dec!(200), dec!(1)).unwrap(), dec!(100));
    }

    #[test]
    fn test_cagr_known_value() {
        // 1.21x over 2 years = 10% a year
        let r = compute_cagr(dec!(1000), dec!(1210), dec!(2)).unwrap();
        assert!((r - dec!(10)).abs() < dec!(0.001), "got {r}");
    }

    #[test]
    fn test_cagr_flat_is_zero() {
        let r = compute_cagr(dec!(500), dec!(500), dec!(7)).unwrap();
        assert!(r.abs() < dec!(0.001), "got {r}");
    }

    #[test]
    fn test_cagr_total_loss() {
        assert_eq!(compute_cagr(dec!(500), dec!(0), dec!(3)).unwrap(), dec!(-100));
    }

    #[test]
    fn test_cagr_unrepresentable_multiple_reports_overflow() {
        let err = compute_cagr(dec!(0.0000000001), dec!(1e28), dec!(1)).unwrap_err();
        assert!(matches!(err, FinCalcError::Overflow { .. }));
    }

    #[test]
    fn test_cagr_rejects_non_positive_initial() {
        let err = compute_cagr(dec!(0), dec!(100), dec!(5)).unwrap_err();
        assert!(matches!(err, FinCalcError::InvalidInput { ref field, .. } if field == "initial_value"));
        assert!(compute_cagr(dec!(-10), dec!(100), dec!(5)).is_err());
    }

    #[test]
    fn test_cagr_rejects_non_positive_years() {
        let err = compute_cagr(dec!(100), dec!(200), dec!(0)).unwrap_err();
        assert!(matches!(err, FinCalcError::InvalidInput { ref field, .. } if field == "years"));
        assert!(compute_cagr(dec!(100), dec!(200), dec!(-1)).is_err());
    }

    #[test]
    fn test_calculate_cagr_envelope() {
        let input = CagrInput {
            initial_value: dec!(100),
            final_value: dec!(150),
            years: dec!(0.5),
        };
        let out = calculate_cagr(&input).unwrap();
        assert_eq!(out.result.absolute_return_pct, dec!(50));
        assert_eq!(out.result.growth_multiple, dec!(1.5));
        // 1.5^2 - 1 = 125%
        assert!((out.result.cagr_pct - dec!(125)).abs() < dec!(0.001));
        assert_eq!(out.warnings.len(), 1);
    }
}
