use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::compounding::{
    checked_product, compound_factor, monthly_rate, months, validate_non_negative,
};
use crate::error::FinCalcError;
use crate::types::{round_currency, with_metadata, ComputationOutput, Money, RatePct, Years};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiInput {
    pub loan_amount: Money,
    pub annual_rate_pct: RatePct,
    pub years: Years,
}

/// Installment summary. `emi` is rounded to whole currency units unless the
/// rounded amount would not cover the first month's interest, in which case
/// the exact installment is kept. `total_payment == emi * months` and
/// `total_interest == total_payment - loan_amount` hold exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmiResult {
    pub emi: Money,
    pub unrounded_emi: Money,
    pub months: u32,
    pub total_payment: Money,
    pub total_interest: Money,
}

/// Principal / interest split for one year of the payoff schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub opening_balance: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiOutput {
    pub summary: EmiResult,
    pub schedule: Vec<AmortizationYear>,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

fn validate(loan_amount: Money, annual_rate_pct: RatePct, years: Years) -> FinCalcResult<()> {
    validate_non_negative("loan_amount", loan_amount)?;
    if annual_rate_pct < Decimal::ZERO {
        return Err(FinCalcError::invalid("annual_rate_pct", "must be >= 0"));
    }
    if years == 0 {
        return Err(FinCalcError::invalid("years", "loan tenure must be > 0"));
    }
    Ok(())
}

/// Equated monthly installment `P * r * (1+r)^n / ((1+r)^n - 1)`,
/// degenerating to `P / n` at a zero rate.
pub fn compute_emi(
    loan_amount: Money,
    annual_rate_pct: RatePct,
    years: Years,
) -> FinCalcResult<EmiResult> {
    validate(loan_amount, annual_rate_pct, years)?;

    let n = months(years)?;
    let n_dec = Decimal::from(n);
    let r = monthly_rate(annual_rate_pct);

    let unrounded_emi = if r.is_zero() {
        loan_amount / n_dec
    } else {
        let factor = compound_factor(r, n)?;
        let denominator = factor - Decimal::ONE;
        if denominator.is_zero() {
            return Err(FinCalcError::DivisionByZero {
                context: "EMI annuity denominator".into(),
            });
        }
        loan_amount
            .checked_mul(r)
            .and_then(|v| v.checked_mul(factor))
            .and_then(|v| v.checked_div(denominator))
            .ok_or_else(|| FinCalcError::overflow("EMI installment"))?
    };

    // A rounded installment at or below the first month's interest never
    // amortizes the loan.
    let rounded = round_currency(unrounded_emi);
    let emi = if loan_amount > Decimal::ZERO && rounded <= loan_amount * r {
        unrounded_emi
    } else {
        rounded
    };
    let total_payment = checked_product(emi, n_dec, "EMI total payment")?;

    Ok(EmiResult {
        emi,
        unrounded_emi,
        months: n,
        total_payment,
        total_interest: total_payment - loan_amount,
    })
}

/// Month-by-month payoff with the rounded installment, rolled up by year.
///
/// The final installment clears whatever balance the rounding left, so the
/// principal column sums to the loan and the last closing balance is zero.
pub fn amortization_schedule(
    loan_amount: Money,
    annual_rate_pct: RatePct,
    years: Years,
) -> FinCalcResult<Vec<AmortizationYear>> {
    let summary = compute_emi(loan_amount, annual_rate_pct, years)?;
    let r = monthly_rate(annual_rate_pct);

    let mut schedule = Vec::with_capacity(years as usize);
    let mut balance = loan_amount;
    let mut month: u32 = 0;

    for year in 1..=years {
        let opening_balance = balance;
        let mut principal_paid = Decimal::ZERO;
        let mut interest_paid = Decimal::ZERO;

        for _ in 0..12 {
            month += 1;
            let interest = balance * r;
            let principal = if month == summary.months {
                balance
            } else {
                (summary.emi - interest).min(balance)
            };
            balance -= principal;
            principal_paid += principal;
            interest_paid += interest;
        }

        schedule.push(AmortizationYear {
            year,
            opening_balance,
            principal_paid,
            interest_paid,
            closing_balance: balance,
        });
    }

    Ok(schedule)
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

pub fn calculate_emi(input: &EmiInput) -> FinCalcResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();
    debug!(
        "emi: loan={} rate={}% years={}",
        input.loan_amount, input.annual_rate_pct, input.years
    );

    let summary = compute_emi(input.loan_amount, input.annual_rate_pct, input.years)?;
    let schedule = amortization_schedule(input.loan_amount, input.annual_rate_pct, input.years)?;

    let mut warnings = Vec::new();
    if input.annual_rate_pct.is_zero() {
        warnings.push("Rate of 0%: installment is principal / months".to_string());
    }
    if summary.emi != summary.unrounded_emi {
        warnings.push(format!(
            "Installment rounded from {} to {}; final month absorbs the difference",
            summary.unrounded_emi.round_dp(2),
            summary.emi
        ));
    } else if round_currency(summary.emi) != summary.emi {
        warnings.push(
            "Installment below what whole-unit rounding can amortize; kept unrounded".to_string(),
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "EMI: P * r * (1+r)^n / ((1+r)^n - 1), monthly reducing balance",
        input,
        warnings,
        elapsed,
        EmiOutput { summary, schedule },
    ))
}
