use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use coopbook_core::loans::prepayment::{recalculate_after_prepayment, PrepaymentInput};
use coopbook_core::loans::{apply_prepayment, InstallmentStatus, Loan, LoanTerms, PrepaymentMode};
use coopbook_core::CoopBookError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn five_year_loan() -> Loan {
    Loan::open(
        "LN-2024-0042",
        LoanTerms {
            principal: dec!(500000),
            annual_rate_percent: dec!(9.5),
            tenure_months: 60,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        },
    )
    .unwrap()
}

fn applied_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 3, 11, 0, 0).unwrap()
}

// ===========================================================================
// Reduce tenure
// ===========================================================================

#[test]
fn test_reduce_tenure_keeps_original_emi() {
    let loan = five_year_loan();
    let emi = loan.repayments[0].total_emi;
    let outcome =
        apply_prepayment(&loan, dec!(100000), 12, PrepaymentMode::ReduceTenure, applied_at())
            .unwrap();

    let tail = outcome.tail();
    assert!(tail.len() < 48, "tail of {} should be shorter than 48", tail.len());
    assert_eq!(outcome.tail_emi, emi);
    for inst in &tail[..tail.len() - 1] {
        assert_eq!(inst.total_emi, emi);
    }
    assert!(tail.last().unwrap().total_emi <= emi);
    assert_eq!(tail.last().unwrap().outstanding_principal_after, Decimal::ZERO);
}

#[test]
fn test_reduce_tenure_payoff_amount_gives_single_installment() {
    let loan = five_year_loan();
    let k = 20;
    let outstanding = loan.repayments[k - 1].outstanding_principal_after;

    for amount in [outstanding, outstanding + dec!(5000)] {
        let outcome =
            apply_prepayment(&loan, amount, k as u32, PrepaymentMode::ReduceTenure, applied_at())
                .unwrap();
        let tail = outcome.tail();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].index, k as u32 + 1);
        assert_eq!(tail[0].outstanding_principal_after, Decimal::ZERO);
    }
}

// ===========================================================================
// Reduce EMI
// ===========================================================================

#[test]
fn test_reduce_emi_tail_length_and_new_emi() {
    let loan = five_year_loan();
    let original_emi = loan.repayments[0].total_emi;

    for after in [1u32, 12, 30, 59] {
        let outcome =
            apply_prepayment(&loan, dec!(25000), after, PrepaymentMode::ReduceEmi, applied_at())
                .unwrap();
        let tail = outcome.tail();

        assert_eq!(tail.len(), (60 - after) as usize);
        assert_ne!(outcome.tail_emi, original_emi);
        for inst in &tail[..tail.len() - 1] {
            assert_eq!(inst.total_emi, outcome.tail_emi);
        }
        let last = tail.last().unwrap();
        assert_eq!(last.outstanding_principal_after, Decimal::ZERO);
        assert!((last.total_emi - outcome.tail_emi).abs() <= Decimal::from(tail.len() as u32) * dec!(0.01));
    }
}

#[test]
fn test_reduce_emi_degenerate_at_end_of_tenure() {
    let loan = five_year_loan();
    assert!(matches!(
        apply_prepayment(&loan, dec!(100), 60, PrepaymentMode::ReduceEmi, applied_at()),
        Err(CoopBookError::DegenerateTenure { .. })
    ));
}

// ===========================================================================
// Splicing and invariants shared by both modes
// ===========================================================================

#[test]
fn test_outstanding_drops_by_at_least_amount() {
    let loan = five_year_loan();
    for mode in [PrepaymentMode::ReduceTenure, PrepaymentMode::ReduceEmi] {
        let outcome = apply_prepayment(&loan, dec!(40000), 10, mode, applied_at()).unwrap();
        assert_eq!(outcome.outstanding_before - outcome.outstanding_after, dec!(40000));
        assert_eq!(
            outcome.outstanding_before,
            loan.repayments[9].outstanding_principal_after
        );
    }
}

#[test]
fn test_spliced_schedule_is_contiguous_with_dates() {
    let loan = five_year_loan();
    for mode in [PrepaymentMode::ReduceTenure, PrepaymentMode::ReduceEmi] {
        let outcome = apply_prepayment(&loan, dec!(60000), 6, mode, applied_at()).unwrap();

        for (pos, inst) in outcome.repayments.iter().enumerate() {
            assert_eq!(inst.index as usize, pos + 1);
            assert_eq!(inst.total_emi, inst.principal_component + inst.interest_component);
        }
        for pair in outcome.repayments.windows(2) {
            assert!(pair[1].outstanding_principal_after <= pair[0].outstanding_principal_after);
            assert!(pair[1].due_date > pair[0].due_date);
        }
        // start date is Jan 31: installment 7 falls at the end of August
        assert_eq!(
            outcome.repayments[6].due_date,
            NaiveDate::from_ymd_opt(2024, 8, 31).unwrap()
        );
        assert_eq!(
            outcome.repayments[8].due_date,
            NaiveDate::from_ymd_opt(2024, 10, 31).unwrap()
        );
    }
}

#[test]
fn test_successive_prepayments_accumulate_history() {
    let loan = five_year_loan()
        .with_installment_status(1, InstallmentStatus::Paid)
        .unwrap();

    let first =
        apply_prepayment(&loan, dec!(50000), 6, PrepaymentMode::ReduceEmi, applied_at()).unwrap();
    let loan = loan.with_prepayment(&first);

    let second =
        apply_prepayment(&loan, dec!(50000), 18, PrepaymentMode::ReduceTenure, applied_at())
            .unwrap();
    let loan = loan.with_prepayment(&second);

    let history = loan.lump_sum_payments.list_all();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].mode, PrepaymentMode::ReduceEmi);
    assert_eq!(history[1].applied_after_installment, 18);
    assert_eq!(loan.lump_sum_payments.total_prepaid(), dec!(100000));
    assert!(loan.repayments[0].is_paid());
    assert!(loan.repayments.len() < 60);
}

#[test]
fn test_wrapper_reports_discarded_paid_installments() {
    let loan = five_year_loan()
        .with_installment_status(8, InstallmentStatus::Paid)
        .unwrap();
    let input = PrepaymentInput {
        loan,
        amount: dec!(10000),
        after_installment: 5,
        mode: "reduce_tenure".into(),
        applied_at: Some(applied_at()),
    };
    let out = recalculate_after_prepayment(&input).unwrap();

    assert_eq!(out.result.discarded_paid, vec![8]);
    assert!(out.warnings.iter().any(|w| w.contains("[8]")));
    assert_eq!(out.result.loan.lump_sum_payments.len(), 1);
}

#[test]
fn test_wrapper_parses_json_request() {
    let loan = five_year_loan();
    let request = serde_json::json!({
        "loan": loan,
        "amount": "15000",
        "after_installment": 24,
        "mode": "ReduceEMI",
        "applied_at": "2026-01-05T08:00:00Z"
    });
    let input: PrepaymentInput = serde_json::from_value(request).unwrap();
    let out = recalculate_after_prepayment(&input).unwrap();

    assert_eq!(out.result.tail_length, 36);
    assert_eq!(out.result.event.amount, dec!(15000));
}
