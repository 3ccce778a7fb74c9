use fincalc_core::compounding::{self, LumpsumInput};
use fincalc_core::growth;
use fincalc_core::loans::emi::{self, EmiInput, EmiResult};
use fincalc_core::planning::goal::{self, GoalInput, GoalKind};
use fincalc_core::sip::annuity::{self, SipInput};
use fincalc_core::sip::stepped::{self, StepUp, SteppedSipInput};
use fincalc_core::tax::income_tax::{self, IncomeTaxInput};
use fincalc_core::tax::regime::{TaxBracket, TaxRegime};
use fincalc_core::FinCalcError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Reference scenarios pinned as regression values.
// ===========================================================================

// ---------------------------------------------------------------------------
// SIP
// ---------------------------------------------------------------------------

#[test]
fn test_sip_5000_at_12pct_for_10_years() {
    let out = annuity::calculate_sip(&SipInput {
        monthly_contribution: dec!(5000),
        annual_rate_pct: dec!(12),
        years: 10,
    })
    .unwrap();
    let r = out.result;
    assert_eq!(r.invested_amount, dec!(600_000));
    assert!(
        (r.total_value - dec!(1_161_695)).abs() <= dec!(1),
        "Expected total ~1,161,695, got {}",
        r.total_value
    );
    assert!(
        (r.estimated_returns - dec!(561_695)).abs() <= dec!(1),
        "Expected returns ~561,695, got {}",
        r.estimated_returns
    );
}

#[test]
fn test_sip_zero_rate_equals_contributions() {
    let r = annuity::future_value_annuity(dec!(3_000), Decimal::ZERO, 4).unwrap();
    assert_eq!(r.total_value, dec!(3_000) * dec!(4) * dec!(12));
}

#[test]
fn test_stepped_sip_final_year_matches_summary() {
    let out = stepped::calculate_stepped_sip(&SteppedSipInput {
        monthly_contribution: dec!(10_000),
        annual_rate_pct: dec!(11),
        years: 15,
        step_up: StepUp::Percent(dec!(10)),
    })
    .unwrap();
    let last = out.result.yearly.last().unwrap();
    assert_eq!(out.result.yearly.len(), 15);
    assert_eq!(last.corpus_value, out.result.summary.total_value);
    assert_eq!(last.cumulative_invested, out.result.summary.invested_amount);
}

// ---------------------------------------------------------------------------
// EMI
// ---------------------------------------------------------------------------

#[test]
fn test_emi_50_lakh_at_8_5pct_for_20_years() {
    let r = emi::compute_emi(dec!(5_000_000), dec!(8.5), 20).unwrap();
    let expected = EmiResult {
        emi: dec!(43_391),
        unrounded_emi: r.unrounded_emi,
        months: 240,
        total_payment: dec!(10_413_840),
        total_interest: dec!(5_413_840),
    };
    assert_eq!(r, expected);
}

#[test]
fn test_emi_zero_rate_is_principal_over_months() {
    let r = emi::compute_emi(dec!(600_000), Decimal::ZERO, 5).unwrap();
    assert_eq!(r.emi, dec!(600_000) / dec!(60));
}

#[test]
fn test_emi_calculator_schedule_closes_loan() {
    let out = emi::calculate_emi(&EmiInput {
        loan_amount: dec!(2_500_000),
        annual_rate_pct: dec!(9.25),
        years: 15,
    })
    .unwrap();
    assert_eq!(out.result.schedule.len(), 15);
    assert_eq!(out.result.schedule[0].opening_balance, dec!(2_500_000));
    assert_eq!(
        out.result.schedule.last().unwrap().closing_balance,
        Decimal::ZERO
    );
}

// ---------------------------------------------------------------------------
// Goal
// ---------------------------------------------------------------------------

#[test]
fn test_goal_25_lakh_in_15_years() {
    let out = goal::calculate_goal(&GoalInput {
        goal: GoalKind::Education,
        current_cost: dec!(2_500_000),
        years: 15,
        inflation_rate_pct: dec!(8),
        expected_return_pct: dec!(12),
    })
    .unwrap();
    let plan = out.result.plan;
    // 2.5M * 1.08^15
    assert!(
        (plan.future_cost - dec!(7_930_423)).abs() <= dec!(1),
        "Expected future cost ~7,930,423, got {}",
        plan.future_cost
    );
    let sip_fv = annuity::future_value_annuity(plan.monthly_sip, dec!(12), 15).unwrap();
    assert!((sip_fv.total_value - plan.future_cost).abs() < dec!(0.01));
    let lumpsum_fv = compounding::future_value_lumpsum(plan.lumpsum, dec!(12), 15).unwrap();
    assert!((lumpsum_fv - plan.future_cost).abs() < dec!(0.01));
}

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

#[test]
fn test_tax_on_12_lakh_gross_is_71500() {
    let tax = income_tax::compute_income_tax(dec!(1_200_000), &TaxRegime::default()).unwrap();
    assert_eq!(tax, dec!(71_500));
}

#[test]
fn test_tax_rebate_cliff() {
    let regime = TaxRegime::default();
    assert_eq!(
        income_tax::compute_income_tax(dec!(775_000), &regime).unwrap(),
        Decimal::ZERO
    );
    assert!(income_tax::compute_income_tax(dec!(775_001), &regime).unwrap() > Decimal::ZERO);
}

#[test]
fn test_tax_regime_from_json_config() {
    let json = r#"{
        "name": "two-slab",
        "brackets": [
            {"upper_bound": "500000", "rate_pct": "0"},
            {"upper_bound": null, "rate_pct": "20"}
        ],
        "standard_deduction": "0",
        "rebate_threshold": "0",
        "cess_rate_pct": "0"
    }"#;
    let regime: TaxRegime = serde_json::from_str(json).unwrap();
    assert_eq!(
        regime.brackets,
        vec![
            TaxBracket::capped(dec!(500_000), dec!(0)),
            TaxBracket::open_ended(dec!(20)),
        ]
    );
    let out = income_tax::calculate_income_tax(&IncomeTaxInput {
        gross_annual_income: dec!(600_000),
        regime: Some(regime),
    })
    .unwrap();
    assert_eq!(out.result.total_tax, dec!(20_000));
}

// ---------------------------------------------------------------------------
// Lumpsum + CAGR
// ---------------------------------------------------------------------------

#[test]
fn test_lumpsum_then_cagr_recovers_rate() {
    let out = compounding::calculate_lumpsum(&LumpsumInput {
        principal: dec!(250_000),
        annual_rate_pct: dec!(9),
        years: 12,
    })
    .unwrap();
    let cagr = growth::compute_cagr(dec!(250_000), out.result.total_value, dec!(12)).unwrap();
    assert!((cagr - dec!(9)).abs() < dec!(0.001), "Expected ~9%, got {}", cagr);
}

#[test]
fn test_cagr_invalid_inputs_are_errors_not_nan() {
    for (initial, years) in [(dec!(0), dec!(5)), (dec!(-5), dec!(5)), (dec!(100), dec!(0))] {
        let err = growth::compute_cagr(initial, dec!(200), years).unwrap_err();
        assert!(matches!(err, FinCalcError::InvalidInput { .. }));
    }
}

#[test]
fn test_envelope_serializes_with_metadata() {
    let out = annuity::calculate_sip(&SipInput {
        monthly_contribution: dec!(1000),
        annual_rate_pct: dec!(10),
        years: 3,
    })
    .unwrap();
    let value = serde_json::to_value(&out).unwrap();
    assert!(value["result"]["total_value"].is_string());
    assert_eq!(value["metadata"]["precision"], "rust_decimal_128bit");
    assert_eq!(value["assumptions"]["years"], 3);
}
