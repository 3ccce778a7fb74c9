use fincalc_core::compounding;
use fincalc_core::growth;
use fincalc_core::planning::insurance;
use fincalc_core::loans::emi;
use fincalc_core::sip::annuity;
use fincalc_core::tax::income_tax;
use fincalc_core::tax::regime::TaxRegime;
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
use rust_decimal::Decimal;

// Rates are drawn in basis points and converted to percentages.
fn pct_from_bp(bp: i64) -> Decimal {
    Decimal::new(bp, 2)
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_lumpsum_strictly_increasing_in_years(
        principal in 1u64..10_000_000,
        rate_bp in 1i64..3_000,
        years in 0u32..40,
    ) {
        let p = Decimal::from(principal);
        let rate = pct_from_bp(rate_bp);
        let now = compounding::future_value_lumpsum(p, rate, years).unwrap();
        let later = compounding::future_value_lumpsum(p, rate, years + 1).unwrap();
        prop_assert!(later > now, "{} !> {}", later, now);
    }

    #[test]
    fn prop_annuity_decomposes(
        contribution in 0u64..200_000,
        rate_bp in 0i64..3_000,
        years in 0u32..40,
    ) {
        let r = annuity::future_value_annuity(Decimal::from(contribution), pct_from_bp(rate_bp), years)
            .unwrap();
        prop_assert_eq!(r.invested_amount + r.estimated_returns, r.total_value);
        prop_assert_eq!(r.invested_amount, Decimal::from(contribution) * Decimal::from(years * 12));
    }

    #[test]
    fn prop_emi_decomposes(
        loan in 1u64..100_000_000,
        rate_bp in 1i64..2_500,
        years in 1u32..35,
    ) {
        let loan = Decimal::from(loan);
        let r = emi::compute_emi(loan, pct_from_bp(rate_bp), years).unwrap();
        prop_assert_eq!(r.total_payment, r.emi * Decimal::from(years * 12));
        prop_assert_eq!(r.total_interest, r.total_payment - loan);
    }

    #[test]
    fn prop_cagr_inverts_compounding(
        initial in 1u64..10_000_000,
        rate_bp in -2_000i64..3_000,
        years in 1u32..30,
    ) {
        let initial = Decimal::from(initial);
        let rate = pct_from_bp(rate_bp);
        let final_value = compounding::future_value_lumpsum(initial, rate, years).unwrap();
        let cagr = growth::compute_cagr(initial, final_value, Decimal::from(years)).unwrap();
        prop_assert!(
            (cagr - rate).abs() < Decimal::new(1, 2),
            "rate {} recovered as {}", rate, cagr
        );
    }

    #[test]
    fn prop_tax_non_decreasing_in_income(
        income in 0u64..5_000_000,
        raise in 1u64..500_000,
    ) {
        let regime = TaxRegime::default();
        let low = income_tax::compute_income_tax(Decimal::from(income), &regime).unwrap();
        let high = income_tax::compute_income_tax(Decimal::from(income + raise), &regime).unwrap();
        prop_assert!(high >= low, "tax({}) = {} > tax({}) = {}", income, low, income + raise, high);
    }

    #[test]
    fn prop_extreme_amounts_error_instead_of_panicking(
        mantissa in 1i64..i64::MAX,
        exponent in 0u32..10,
        rate_bp in -9_900i64..10_000,
        years in 0u32..200,
    ) {
        // up to ~9.2e27, close to the top of Decimal's range
        let amount = Decimal::from(mantissa) * Decimal::from(10u64.pow(exponent));
        let rate = pct_from_bp(rate_bp);
        let _ = compounding::future_value_lumpsum(amount, rate, years);
        let _ = compounding::present_value_lumpsum(amount, rate, years);
        let _ = annuity::future_value_annuity(amount, rate, years);
        let _ = annuity::required_contribution_for_target(amount, rate, years);
        let _ = insurance::human_life_value(amount, amount, Decimal::ZERO);
        let _ = income_tax::compute_income_tax(amount, &TaxRegime::default());
        if rate_bp >= 0 && years > 0 {
            let _ = emi::compute_emi(amount, rate, years);
        }
    }
}
