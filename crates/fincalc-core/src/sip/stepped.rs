use log::{debug, trace};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::compounding::{
    compound_factor, monthly_rate, months, validate_non_negative, validate_rate,
};
use crate::error::FinCalcError;
use crate::sip::annuity::annuity_due_factor;
use crate::types::{with_metadata, ComputationOutput, InvestmentResult, Money, RatePct, Years};
use crate::FinCalcResult;

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the monthly contribution grows at the start of each new year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepUp {
    /// Add a fixed amount to the monthly contribution.
    Amount(Money),
    /// Raise the monthly contribution by a percentage (10 = 10%).
    Percent(RatePct),
}

impl Default for StepUp {
    fn default() -> Self {
        StepUp::Amount(Decimal::ZERO)
    }
}

impl StepUp {
    fn apply(self, contribution: Money) -> Money {
        match self {
            StepUp::Amount(increment) => contribution + increment,
            StepUp::Percent(pct) => contribution * (Decimal::ONE + pct / dec!(100)),
        }
    }

    fn validate(self) -> FinCalcResult<()> {
        let value = match self {
            StepUp::Amount(v) | StepUp::Percent(v) => v,
        };
        validate_non_negative("step_up", value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteppedSipInput {
    pub monthly_contribution: Money,
    pub annual_rate_pct: RatePct,
    pub years: Years,
    #[serde(default)]
    pub step_up: StepUp,
}

/// Position of the corpus at the end of one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteppedSipYear {
    pub year: u32,
    pub monthly_contribution: Money,
    pub cumulative_invested: Money,
    pub corpus_value: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteppedSipOutput {
    pub summary: InvestmentResult,
    pub final_monthly_contribution: Money,
    pub yearly: Vec<SteppedSipYear>,
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

/// Lazy year-by-year accumulation of a stepped SIP.
///
/// Each month `corpus = (corpus + contribution) * (1 + i)`. Yields exactly
/// `years` items; `restart` (or a clone taken before iterating) replays the
/// identical sequence.
#[derive(Debug, Clone)]
pub struct SteppedSipTrace {
    monthly_rate: Decimal,
    step_up: StepUp,
    years: Years,
    initial_contribution: Money,
    year: u32,
    contribution: Money,
    invested: Money,
    corpus: Money,
}

impl SteppedSipTrace {
    pub fn new(input: &SteppedSipInput) -> FinCalcResult<Self> {
        validate_non_negative("monthly_contribution", input.monthly_contribution)?;
        validate_rate("annual_rate_pct", input.annual_rate_pct)?;
        input.step_up.validate()?;

        let rate = monthly_rate(input.annual_rate_pct);
        check_corpus_bound(input, rate)?;

        Ok(SteppedSipTrace {
            monthly_rate: rate,
            step_up: input.step_up,
            years: input.years,
            initial_contribution: input.monthly_contribution,
            year: 0,
            contribution: input.monthly_contribution,
            invested: Decimal::ZERO,
            corpus: Decimal::ZERO,
        })
    }

    /// Rewind to year zero.
    pub fn restart(&mut self) {
        self.year = 0;
        self.contribution = self.initial_contribution;
        self.invested = Decimal::ZERO;
        self.corpus = Decimal::ZERO;
    }
}

impl Iterator for SteppedSipTrace {
    type Item = SteppedSipYear;

    fn next(&mut self) -> Option<SteppedSipYear> {
        if self.year >= self.years {
            return None;
        }
        if self.year > 0 {
            self.contribution = self.step_up.apply(self.contribution);
        }

        let growth = Decimal::ONE + self.monthly_rate;
        for _ in 0..MONTHS_PER_YEAR {
            self.invested += self.contribution;
            self.corpus = (self.corpus + self.contribution) * growth;
        }
        self.year += 1;

        trace!(
            "stepped sip year {}: contribution={} invested={} corpus={}",
            self.year,
            self.contribution,
            self.invested,
            self.corpus
        );

        Some(SteppedSipYear {
            year: self.year,
            monthly_contribution: self.contribution,
            cumulative_invested: self.invested,
            corpus_value: self.corpus,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.years - self.year) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SteppedSipTrace {}

/// Reject inputs whose final corpus could not be represented, so the
/// iterator itself never overflows.
fn check_corpus_bound(input: &SteppedSipInput, rate: Decimal) -> FinCalcResult<()> {
    if input.years == 0 {
        return Ok(());
    }
    let last_year = input.years - 1;
    let max_contribution = match input.step_up {
        StepUp::Amount(increment) => increment
            .checked_mul(Decimal::from(last_year))
            .and_then(|raised| raised.checked_add(input.monthly_contribution)),
        StepUp::Percent(pct) => compound_factor(pct / dec!(100), last_year)?
            .checked_mul(input.monthly_contribution),
    }
    .ok_or_else(|| FinCalcError::overflow("stepped SIP contribution"))?;

    let n = months(input.years)?;
    let factor = annuity_due_factor(rate, n)?.max(Decimal::from(n));
    max_contribution
        .checked_mul(factor)
        .map(|_| ())
        .ok_or_else(|| FinCalcError::overflow("stepped SIP corpus"))
}

pub fn stepped_sip_trace(input: &SteppedSipInput) -> FinCalcResult<SteppedSipTrace> {
    SteppedSipTrace::new(input)
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

pub fn calculate_stepped_sip(
    input: &SteppedSipInput,
) -> FinCalcResult<ComputationOutput<SteppedSipOutput>> {
    let start = Instant::now();
    debug!(
        "stepped sip: contribution={} rate={}% years={} step_up={:?}",
        input.monthly_contribution, input.annual_rate_pct, input.years, input.step_up
    );

    let yearly: Vec<SteppedSipYear> = stepped_sip_trace(input)?.collect();

    let (invested, corpus, final_contribution) = match yearly.last() {
        Some(last) => (
            last.cumulative_invested,
            last.corpus_value,
            last.monthly_contribution,
        ),
        None => (Decimal::ZERO, Decimal::ZERO, input.monthly_contribution),
    };

    let mut warnings = Vec::new();
    if input.years == 0 {
        warnings.push("Zero-year horizon: nothing accumulated".to_string());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Stepped SIP: monthly (corpus + C) * (1+i), contribution stepped up yearly",
        input,
        warnings,
        elapsed,
        SteppedSipOutput {
            summary: InvestmentResult::from_invested_and_total(invested, corpus),
            final_monthly_contribution: final_contribution,
            yearly,
        },
    ))
}
