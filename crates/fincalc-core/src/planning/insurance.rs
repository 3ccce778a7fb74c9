use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::compounding::{checked_product, validate_non_negative};
use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::FinCalcResult;

/// Years of annual income the recommended cover replaces.
pub const INCOME_MULTIPLE: u32 = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceNeedInput {
    pub monthly_income: Money,
    #[serde(default)]
    pub existing_liabilities: Money,
    #[serde(default)]
    pub existing_insurance_cover: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceNeedOutput {
    pub annual_income: Money,
    pub income_multiple: u32,
    pub gross_requirement: Money,
    pub existing_insurance_cover: Money,
    pub recommended_cover: Money,
}

fn annual_income(monthly_income: Money) -> FinCalcResult<Money> {
    checked_product(monthly_income, Decimal::from(12), "annual income")
}

fn gross_requirement(monthly_income: Money, existing_liabilities: Money) -> FinCalcResult<Money> {
    checked_product(
        monthly_income,
        Decimal::from(12 * INCOME_MULTIPLE),
        "income-multiple cover",
    )?
    .checked_add(existing_liabilities)
    .ok_or_else(|| FinCalcError::overflow("cover plus liabilities"))
}

/// Human life value by income multiple:
/// `max(0, monthly_income * 12 * 15 + liabilities - existing_cover)`.
///
/// A rule of thumb, not an actuarial present value of future earnings.
pub fn human_life_value(
    monthly_income: Money,
    existing_liabilities: Money,
    existing_insurance_cover: Money,
) -> FinCalcResult<Money> {
    validate_non_negative("monthly_income", monthly_income)?;
    validate_non_negative("existing_liabilities", existing_liabilities)?;
    validate_non_negative("existing_insurance_cover", existing_insurance_cover)?;

    let needed = gross_requirement(monthly_income, existing_liabilities)? - existing_insurance_cover;
    Ok(needed.max(Decimal::ZERO))
}

pub fn calculate_insurance_need(
    input: &InsuranceNeedInput,
) -> FinCalcResult<ComputationOutput<InsuranceNeedOutput>> {
    let start = Instant::now();
    debug!(
        "insurance need: monthly_income={} liabilities={} cover={}",
        input.monthly_income, input.existing_liabilities, input.existing_insurance_cover
    );

    let recommended_cover = human_life_value(
        input.monthly_income,
        input.existing_liabilities,
        input.existing_insurance_cover,
    )?;
    let gross = gross_requirement(input.monthly_income, input.existing_liabilities)?;

    let mut warnings = Vec::new();
    if recommended_cover.is_zero() && !gross.is_zero() {
        warnings.push("Existing cover already meets the income-multiple requirement".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Human life value: 15x annual income + liabilities - existing cover",
        input,
        warnings,
        elapsed,
        InsuranceNeedOutput {
            annual_income: annual_income(input.monthly_income)?,
            income_multiple: INCOME_MULTIPLE,
            gross_requirement: gross,
            existing_insurance_cover: input.existing_insurance_cover,
            recommended_cover,
        },
    ))
}
