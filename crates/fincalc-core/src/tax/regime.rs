use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinCalcError;
use crate::types::{Money, RatePct};
use crate::FinCalcResult;

/// One marginal slab. `upper_bound: None` is the open-ended top slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Money>,
    pub rate_pct: RatePct,
}

impl TaxBracket {
    pub fn capped(upper_bound: Money, rate_pct: RatePct) -> Self {
        TaxBracket {
            upper_bound: Some(upper_bound),
            rate_pct,
        }
    }

    pub fn open_ended(rate_pct: RatePct) -> Self {
        TaxBracket {
            upper_bound: None,
            rate_pct,
        }
    }
}

/// A tax year's policy: slab table plus deduction, rebate cliff and cess.
///
/// Loaded from configuration so a new tax year is a data change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRegime {
    pub name: String,
    pub brackets: Vec<TaxBracket>,
    pub standard_deduction: Money,
    /// Taxable income at or below this pays nothing (full rebate, no taper).
    pub rebate_threshold: Money,
    pub cess_rate_pct: RatePct,
}

impl Default for TaxRegime {
    /// New regime slabs: 0% to 3L, 5% to 7L, 10% to 10L, 15% to 12L,
    /// 20% to 15L, 30% above; 75,000 standard deduction, 7L rebate, 4% cess.
    fn default() -> Self {
        TaxRegime {
            name: "new-regime-fy2024-25".to_string(),
            brackets: vec![
                TaxBracket::capped(dec!(300_000), dec!(0)),
                TaxBracket::capped(dec!(700_000), dec!(5)),
                TaxBracket::capped(dec!(1_000_000), dec!(10)),
                TaxBracket::capped(dec!(1_200_000), dec!(15)),
                TaxBracket::capped(dec!(1_500_000), dec!(20)),
                TaxBracket::open_ended(dec!(30)),
            ],
            standard_deduction: dec!(75_000),
            rebate_threshold: dec!(700_000),
            cess_rate_pct: dec!(4),
        }
    }
}

impl TaxRegime {
    /// Check the slab table covers `[0, ∞)` without gaps or overlaps.
    pub fn validate(&self) -> FinCalcResult<()> {
        let Some((last, capped)) = self.brackets.split_last() else {
            return Err(FinCalcError::invalid("brackets", "at least one bracket required"));
        };
        if last.upper_bound.is_some() {
            return Err(FinCalcError::invalid(
                "brackets",
                "the last bracket must be open-ended",
            ));
        }

        let mut previous = Decimal::ZERO;
        for (idx, bracket) in capped.iter().enumerate() {
            let bound = bracket.upper_bound.ok_or_else(|| {
                FinCalcError::invalid(
                    "brackets",
                    format!("bracket {idx} is open-ended but is not the last bracket"),
                )
            })?;
            if bound <= previous {
                return Err(FinCalcError::invalid(
                    "brackets",
                    format!("bracket {idx} upper bound {bound} must exceed {previous}"),
                ));
            }
            previous = bound;
        }

        for (idx, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate_pct < Decimal::ZERO || bracket.rate_pct > dec!(100) {
                return Err(FinCalcError::invalid(
                    "brackets",
                    format!("bracket {idx} rate must be within 0..=100"),
                ));
            }
        }

        if self.standard_deduction < Decimal::ZERO {
            return Err(FinCalcError::invalid("standard_deduction", "must be >= 0"));
        }
        if self.rebate_threshold < Decimal::ZERO {
            return Err(FinCalcError::invalid("rebate_threshold", "must be >= 0"));
        }
        if self.cess_rate_pct < Decimal::ZERO {
            return Err(FinCalcError::invalid("cess_rate_pct", "must be >= 0"));
        }
        Ok(())
    }

    /// Iterate `(lower, upper, rate_pct)` slices; `upper` is `None` for the top slab.
    pub fn slices(&self) -> impl Iterator<Item = (Money, Option<Money>, RatePct)> + '_ {
        let mut lower = Decimal::ZERO;
        self.brackets.iter().map(move |bracket| {
            let slice = (lower, bracket.upper_bound, bracket.rate_pct);
            if let Some(bound) = bracket.upper_bound {
                lower = bound;
            }
            slice
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_regime_is_valid() {
        let regime = TaxRegime::default();
        regime.validate().unwrap();
        assert_eq!(regime.brackets.len(), 6);
        assert_eq!(regime.cess_rate_pct, dec!(4));
    }

    #[test]
    fn test_slices_chain_bounds() {
        let regime = TaxRegime::default();
        let slices: Vec<_> = regime.slices().collect();
        assert_eq!(slices[0], (dec!(0), Some(dec!(300_000)), dec!(0)));
        assert_eq!(slices[1], (dec!(300_000), Some(dec!(700_000)), dec!(5)));
        assert_eq!(slices[5], (dec!(1_500_000), None, dec!(30)));
    }

    #[test]
    fn test_empty_table_rejected() {
        let regime = TaxRegime {
            brackets: vec![],
            ..TaxRegime::default()
        };
        assert!(regime.validate().is_err());
    }

    #[test]
    fn test_capped_last_bracket_rejected() {
        let regime = TaxRegime {
            brackets: vec![TaxBracket::capped(dec!(100), dec!(10))],
            ..TaxRegime::default()
        };
        assert!(regime.validate().is_err());
    }

    #[test]
    fn test_unordered_bounds_rejected() {
        let regime = TaxRegime {
            brackets: vec![
                TaxBracket::capped(dec!(500), dec!(0)),
                TaxBracket::capped(dec!(400), dec!(10)),
                TaxBracket::open_ended(dec!(20)),
            ],
            ..TaxRegime::default()
        };
        assert!(regime.validate().is_err());
    }

    #[test]
    fn test_open_bracket_in_middle_rejected() {
        let regime = TaxRegime {
            brackets: vec![TaxBracket::open_ended(dec!(0)), TaxBracket::open_ended(dec!(10))],
            ..TaxRegime::default()
        };
        assert!(regime.validate().is_err());
    }

    #[test]
    fn test_rate_out_of_range_rejected() {
        let regime = TaxRegime {
            brackets: vec![TaxBracket::open_ended(dec!(101))],
            ..TaxRegime::default()
        };
        assert!(regime.validate().is_err());
    }

    #[test]
    fn test_regime_round_trips_through_json() {
        let regime = TaxRegime::default();
        let json = serde_json::to_string(&regime).unwrap();
        let back: TaxRegime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, regime);
    }
}
