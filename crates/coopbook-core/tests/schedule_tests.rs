use chrono::NaiveDate;
use coopbook_core::loans::schedule::{build_loan_schedule, generate_schedule};
use coopbook_core::loans::{pending_count, set_installment_status, InstallmentStatus, LoanTerms};
use coopbook_core::CoopBookError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn terms(principal: Decimal, rate: Decimal, tenure: u32) -> LoanTerms {
    LoanTerms {
        principal,
        annual_rate_percent: rate,
        tenure_months: tenure,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    }
}

fn sample_terms() -> Vec<LoanTerms> {
    vec![
        terms(dec!(120000), dec!(12), 12),
        terms(dec!(500000), dec!(9.5), 60),
        terms(dec!(100000), dec!(10), 24),
        terms(dec!(250000), dec!(8.75), 36),
        terms(dec!(75000), dec!(14), 48),
        terms(dec!(1500), dec!(18), 6),
        terms(dec!(1000000), dec!(12), 360),
        terms(dec!(750000), dec!(24), 300),
        terms(dec!(2500000), dec!(18), 240),
    ]
}

// ===========================================================================
// Schedule properties
// ===========================================================================

#[test]
fn test_principal_sum_matches_within_tolerance() {
    for t in sample_terms() {
        let schedule = generate_schedule(&t).unwrap();
        let retired: Decimal = schedule.iter().map(|i| i.principal_component).sum();
        let tolerance = Decimal::from(t.tenure_months) * dec!(0.01);
        assert!(
            (retired - t.principal).abs() <= tolerance,
            "{:?}: retired {} vs principal {}",
            t,
            retired,
            t.principal
        );
    }
}

#[test]
fn test_emi_identical_across_regular_installments() {
    for t in sample_terms() {
        let schedule = generate_schedule(&t).unwrap();
        let emi = schedule[0].total_emi;
        let (last, regular) = schedule.split_last().unwrap();
        assert!(regular.iter().all(|i| i.total_emi == emi), "{:?}", t);

        let tolerance = Decimal::from(t.tenure_months) * dec!(0.01);
        assert!((last.total_emi - emi).abs() <= tolerance, "{:?}", t);
    }
}

#[test]
fn test_emi_equals_principal_plus_interest() {
    for t in sample_terms() {
        for inst in generate_schedule(&t).unwrap() {
            assert_eq!(inst.total_emi, inst.principal_component + inst.interest_component);
        }
    }
}

#[test]
fn test_outstanding_non_increasing_and_closes() {
    for t in sample_terms() {
        let schedule = generate_schedule(&t).unwrap();
        assert_eq!(schedule.len(), t.tenure_months as usize);

        for pair in schedule.windows(2) {
            assert!(pair[1].outstanding_principal_after <= pair[0].outstanding_principal_after);
        }

        let last = schedule.last().unwrap();
        assert_eq!(last.outstanding_principal_after, Decimal::ZERO, "{:?}", t);
    }
}

#[test]
fn test_indices_are_one_based_and_contiguous() {
    let schedule = generate_schedule(&terms(dec!(100000), dec!(10), 24)).unwrap();
    for (pos, inst) in schedule.iter().enumerate() {
        assert_eq!(inst.index as usize, pos + 1);
    }
}

#[test]
fn test_generation_is_deterministic() {
    for t in sample_terms() {
        let a = serde_json::to_string(&generate_schedule(&t).unwrap()).unwrap();
        let b = serde_json::to_string(&generate_schedule(&t).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_zero_rate_emi_exact() {
    let schedule = generate_schedule(&terms(dec!(12000), dec!(0), 12)).unwrap();
    assert!(schedule.iter().all(|i| i.total_emi == dec!(1000.00)));
    assert!(schedule.iter().all(|i| i.interest_component.is_zero()));
}

#[test]
fn test_reference_scenario() {
    let out = build_loan_schedule(&terms(dec!(120000), dec!(12), 12)).unwrap();
    let first = &out.result.repayments[0];

    assert_eq!(out.result.emi, dec!(10661.85));
    assert_eq!(first.interest_component, dec!(1200.00));
    assert_eq!(first.principal_component, dec!(9461.85));
    assert_eq!(first.outstanding_principal_after, dec!(110538.15));
    assert_eq!(out.result.summary.pending_count, 12);
}

// ===========================================================================
// Validation
// ===========================================================================

#[test]
fn test_invalid_terms() {
    let cases = [
        terms(dec!(0), dec!(12), 12),
        terms(dec!(-100), dec!(12), 12),
        terms(dec!(1000), dec!(12), 0),
        terms(dec!(1000), dec!(-1), 12),
    ];
    for t in cases {
        match generate_schedule(&t) {
            Err(CoopBookError::InvalidTerms { .. }) => {}
            other => panic!("Expected InvalidTerms for {:?}, got {:?}", t, other),
        }
    }
}

#[test]
fn test_schedule_that_never_retires_principal_is_rejected() {
    match generate_schedule(&terms(dec!(1), dec!(12), 360)) {
        Err(CoopBookError::FinancialImpossibility(_)) => {}
        other => panic!("Expected FinancialImpossibility, got {other:?}"),
    }
}

// ===========================================================================
// Ledger over a generated schedule
// ===========================================================================

#[test]
fn test_status_toggle_preserves_money_fields() {
    let schedule = generate_schedule(&terms(dec!(500000), dec!(9.5), 60)).unwrap();
    let paid = set_installment_status(&schedule, 30, InstallmentStatus::Paid).unwrap();

    assert_eq!(pending_count(&paid), 59);
    for (before, after) in schedule.iter().zip(paid.iter()) {
        assert_eq!(before.total_emi, after.total_emi);
        assert_eq!(before.principal_component, after.principal_component);
        assert_eq!(before.outstanding_principal_after, after.outstanding_principal_after);
    }
}
