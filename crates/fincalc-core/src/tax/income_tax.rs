use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::compounding::{checked_product, validate_non_negative};
use crate::error::FinCalcError;
use crate::tax::regime::TaxRegime;
use crate::types::{round_currency, with_metadata, ComputationOutput, Money, RatePct};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeTaxInput {
    pub gross_annual_income: Money,
    /// Falls back to [`TaxRegime::default`] when absent.
    #[serde(default)]
    pub regime: Option<TaxRegime>,
}

/// Tax on the part of income falling in one slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabTax {
    pub lower: Money,
    pub upper: Option<Money>,
    pub rate_pct: RatePct,
    pub taxable_amount: Money,
    pub tax: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxBreakdown {
    pub regime: String,
    pub gross_income: Money,
    pub standard_deduction: Money,
    pub taxable_income: Money,
    pub slabs: Vec<SlabTax>,
    pub slab_tax: Money,
    pub rebate_applied: bool,
    pub rebate: Money,
    pub cess: Money,
    pub total_tax: Money,
    pub effective_rate_pct: RatePct,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Full slab-by-slab computation.
///
/// Taxable income at or below the rebate threshold pays zero; one unit above
/// it pays the whole slab tax (a cliff, not a taper). Cess is charged on the
/// post-rebate slab tax and the total is rounded half-up to whole units.
pub fn income_tax_breakdown(
    gross_annual_income: Money,
    regime: &TaxRegime,
) -> FinCalcResult<IncomeTaxBreakdown> {
    validate_non_negative("gross_annual_income", gross_annual_income)?;
    regime.validate()?;

    let taxable_income = (gross_annual_income - regime.standard_deduction).max(Decimal::ZERO);

    let slabs = regime
        .slices()
        .map(|(lower, upper, rate_pct)| {
            let ceiling = upper.map_or(taxable_income, |u| taxable_income.min(u));
            let taxable_amount = (ceiling - lower).max(Decimal::ZERO);
            Ok(SlabTax {
                lower,
                upper,
                rate_pct,
                taxable_amount,
                tax: checked_product(taxable_amount, rate_pct / dec!(100), "slab tax")?,
            })
        })
        .collect::<FinCalcResult<Vec<SlabTax>>>()?;

    let slab_tax: Money = slabs.iter().map(|s| s.tax).sum();
    let rebate_applied = taxable_income <= regime.rebate_threshold;
    let rebate = if rebate_applied { slab_tax } else { Decimal::ZERO };
    let tax_after_rebate = slab_tax - rebate;
    let cess = checked_product(tax_after_rebate, regime.cess_rate_pct / dec!(100), "cess")?;
    let total_tax = round_currency(
        tax_after_rebate
            .checked_add(cess)
            .ok_or_else(|| FinCalcError::overflow("tax plus cess"))?,
    );

    let effective_rate_pct = if gross_annual_income.is_zero() {
        Decimal::ZERO
    } else {
        (total_tax / gross_annual_income * dec!(100)).round_dp(4)
    };

    Ok(IncomeTaxBreakdown {
        regime: regime.name.clone(),
        gross_income: gross_annual_income,
        standard_deduction: regime.standard_deduction,
        taxable_income,
        slabs,
        slab_tax,
        rebate_applied,
        rebate,
        cess,
        total_tax,
        effective_rate_pct,
    })
}

/// Total tax payable, including cess, in whole currency units.
pub fn compute_income_tax(gross_annual_income: Money, regime: &TaxRegime) -> FinCalcResult<Money> {
    Ok(income_tax_breakdown(gross_annual_income, regime)?.total_tax)
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

pub fn calculate_income_tax(
    input: &IncomeTaxInput,
) -> FinCalcResult<ComputationOutput<IncomeTaxBreakdown>> {
    let start = Instant::now();
    let default_regime;
    let regime = match &input.regime {
        Some(r) => r,
        None => {
            default_regime = TaxRegime::default();
            &default_regime
        }
    };
    debug!(
        "income tax: gross={} regime={}",
        input.gross_annual_income, regime.name
    );

    let breakdown = income_tax_breakdown(input.gross_annual_income, regime)?;

    let mut warnings = Vec::new();
    if breakdown.rebate_applied && breakdown.slab_tax > Decimal::ZERO {
        warnings.push(format!(
            "Taxable income within rebate threshold {}: full rebate of {} applied",
            regime.rebate_threshold, breakdown.rebate
        ));
    }
    if regime.rebate_threshold > Decimal::ZERO
        && !breakdown.rebate_applied
        && breakdown.taxable_income - regime.rebate_threshold < dec!(50_000)
    {
        warnings.push(
            "Taxable income just above the rebate threshold: the full slab tax applies".into(),
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Marginal slab tax after standard deduction, rebate cliff, cess on tax",
        regime,
        warnings,
        elapsed,
        breakdown,
    ))
}
