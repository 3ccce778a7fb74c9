use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::compounding::{
    checked_product, future_value_inflated_cost, months, present_value_lumpsum,
};
use crate::error::FinCalcError;
use crate::sip::annuity::required_contribution_for_target;
use crate::types::{with_metadata, ComputationOutput, Money, RatePct, Years};
use crate::FinCalcResult;

/// What the money is for. Only changes labelling, never the arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalKind {
    Education,
    Marriage,
    Retirement,
    Car,
    Home,
    #[default]
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalInput {
    #[serde(default)]
    pub goal: GoalKind,
    pub current_cost: Money,
    pub years: Years,
    pub inflation_rate_pct: RatePct,
    pub expected_return_pct: RatePct,
}

/// Two alternative ways to fund the same inflated goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalPlan {
    pub future_cost: Money,
    pub monthly_sip: Money,
    pub lumpsum: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalOutput {
    pub goal: GoalKind,
    pub plan: GoalPlan,
    pub total_sip_invested: Money,
}

pub fn goal_plan(
    current_cost: Money,
    years: Years,
    inflation_rate_pct: RatePct,
    expected_return_pct: RatePct,
) -> FinCalcResult<GoalPlan> {
    if years == 0 {
        return Err(FinCalcError::invalid("years", "goal horizon must be > 0"));
    }
    let future_cost = future_value_inflated_cost(current_cost, inflation_rate_pct, years)?;
    let monthly_sip = required_contribution_for_target(future_cost, expected_return_pct, years)?;
    let lumpsum = present_value_lumpsum(future_cost, expected_return_pct, years)?;

    Ok(GoalPlan {
        future_cost,
        monthly_sip,
        lumpsum,
    })
}

pub fn calculate_goal(input: &GoalInput) -> FinCalcResult<ComputationOutput<GoalOutput>> {
    let start = Instant::now();
    debug!(
        "goal {:?}: cost={} years={} inflation={}% return={}%",
        input.goal, input.current_cost, input.years, input.inflation_rate_pct, input.expected_return_pct
    );

    let plan = goal_plan(
        input.current_cost,
        input.years,
        input.inflation_rate_pct,
        input.expected_return_pct,
    )?;

    let mut warnings = Vec::new();
    if input.expected_return_pct <= input.inflation_rate_pct {
        warnings.push(
            "Expected return does not beat inflation: savings lose ground to the goal".into(),
        );
    }

    let total_sip_invested = checked_product(
        plan.monthly_sip,
        Money::from(months(input.years)?),
        "goal SIP contributions",
    )?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Goal: inflate cost, back-solve annuity-due SIP, discount for lump sum",
        input,
        warnings,
        elapsed,
        GoalOutput {
            goal: input.goal,
            plan,
            total_sip_invested,
        },
    ))
}
