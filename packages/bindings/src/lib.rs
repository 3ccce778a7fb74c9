use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use fincalc_core::{FinCalcError, FinCalcResult};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse the input JSON, run one calculator, serialize its output.
fn run_json<I, O, F>(input_json: &str, calculate: F) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
    F: Fn(&I) -> FinCalcResult<O>,
{
    let input: I = serde_json::from_str(input_json)
        .map_err(FinCalcError::from)
        .map_err(to_napi_error)?;
    let output = calculate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output)
        .map_err(FinCalcError::from)
        .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Investments
// ---------------------------------------------------------------------------

#[napi]
pub fn lumpsum(input_json: String) -> NapiResult<String> {
    run_json(&input_json, fincalc_core::compounding::calculate_lumpsum)
}

#[napi]
pub fn sip(input_json: String) -> NapiResult<String> {
    run_json(&input_json, fincalc_core::sip::annuity::calculate_sip)
}

#[napi]
pub fn required_sip(input_json: String) -> NapiResult<String> {
    run_json(&input_json, fincalc_core::sip::annuity::calculate_required_sip)
}

#[napi]
pub fn stepped_sip(input_json: String) -> NapiResult<String> {
    run_json(&input_json, fincalc_core::sip::stepped::calculate_stepped_sip)
}

#[napi]
pub fn cagr(input_json: String) -> NapiResult<String> {
    run_json(&input_json, fincalc_core::growth::calculate_cagr)
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn emi(input_json: String) -> NapiResult<String> {
    run_json(&input_json, fincalc_core::loans::emi::calculate_emi)
}

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

#[napi]
pub fn income_tax(input_json: String) -> NapiResult<String> {
    run_json(&input_json, fincalc_core::tax::income_tax::calculate_income_tax)
}

#[napi]
pub fn default_tax_regime() -> NapiResult<String> {
    serde_json::to_string(&fincalc_core::tax::regime::TaxRegime::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[napi]
pub fn goal_plan(input_json: String) -> NapiResult<String> {
    run_json(&input_json, fincalc_core::planning::goal::calculate_goal)
}

#[napi]
pub fn insurance_need(input_json: String) -> NapiResult<String> {
    run_json(&input_json, fincalc_core::planning::insurance::calculate_insurance_need)
}

#[napi]
pub fn retirement_plan(input_json: String) -> NapiResult<String> {
    run_json(&input_json, fincalc_core::planning::retirement::calculate_retirement)
}
