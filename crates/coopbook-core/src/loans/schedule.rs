//! Reducing-balance repayment schedules.
//!
//! A single EMI is computed from the loan terms, rounded once to cents and
//! charged every regular month; the final installment settles the remaining
//! balance. Each month's interest is the rounded product of the
//! opening balance and the monthly rate; the rest of the EMI retires principal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::ledger::{summarize_schedule, ScheduleSummary};
use super::model::{Installment, InstallmentStatus, LoanTerms};
use crate::time_value::{add_months, emi, monthly_rate, round_money};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::{CoopBookError, CoopBookResult};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub emi: Money,
    pub monthly_rate: Decimal,
    pub repayments: Vec<Installment>,
    pub summary: ScheduleSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate the full repayment schedule for `terms`.
///
/// Pure and deterministic: identical terms always give identical schedules.
pub fn generate_schedule(terms: &LoanTerms) -> CoopBookResult<Vec<Installment>> {
    amortize(terms).map(|(_, schedule)| schedule)
}

/// Regular installments charge the rounded EMI, capped at the opening balance.
/// The final installment settles whatever balance remains, so its total may
/// differ from the EMI by the accumulated rounding.
fn amortize(terms: &LoanTerms) -> CoopBookResult<(Money, Vec<Installment>)> {
    terms.validate()?;

    let rate = monthly_rate(terms.annual_rate_percent);
    let emi = emi(terms.principal, rate, terms.tenure_months)?;

    let first_interest = round_money(terms.principal * rate);
    if emi <= first_interest {
        return Err(CoopBookError::FinancialImpossibility(format!(
            "EMI {emi} does not cover interest {first_interest} on principal {}",
            terms.principal
        )));
    }

    let mut schedule = Vec::with_capacity(terms.tenure_months as usize);
    let mut balance = terms.principal;

    for index in 1..=terms.tenure_months {
        let interest = round_money(balance * rate);
        let principal_component = if index == terms.tenure_months {
            balance
        } else {
            (emi - interest).min(balance)
        };
        balance -= principal_component;

        schedule.push(Installment {
            index,
            due_date: due_date(terms.start_date, index)?,
            principal_component,
            interest_component: interest,
            total_emi: principal_component + interest,
            outstanding_principal_after: balance,
            status: InstallmentStatus::Pending,
        });
    }

    if let Some(last) = schedule.last() {
        tracing::debug!(
            principal = %terms.principal,
            annual_rate_percent = %terms.annual_rate_percent,
            tenure_months = terms.tenure_months,
            emi = %emi,
            final_installment = %last.total_emi,
            "generated repayment schedule"
        );
    }

    Ok((emi, schedule))
}

/// EMI charged by a schedule generated from `terms`.
pub fn original_emi(terms: &LoanTerms) -> CoopBookResult<Money> {
    terms.validate()?;
    emi(
        terms.principal,
        monthly_rate(terms.annual_rate_percent),
        terms.tenure_months,
    )
}

/// Generate a schedule and wrap it with a summary and computation metadata.
pub fn build_loan_schedule(terms: &LoanTerms) -> CoopBookResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (emi, repayments) = amortize(terms)?;
    let rate = monthly_rate(terms.annual_rate_percent);

    if rate.is_zero() {
        warnings.push("Zero-rate loan: principal is divided evenly and no interest accrues".into());
    }

    if let Some(last) = repayments.last() {
        let residue = last.total_emi - emi;
        if !residue.is_zero() {
            warnings.push(format!(
                "Final installment {} settles a rounding residue of {residue} against the EMI",
                last.total_emi
            ));
        }
    }

    let summary = summarize_schedule(&repayments);
    let output = ScheduleOutput {
        emi,
        monthly_rate: rate,
        repayments,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance EMI schedule, cents rounded half-up",
        &serde_json::json!({
            "principal": terms.principal.to_string(),
            "annual_rate_percent": terms.annual_rate_percent.to_string(),
            "tenure_months": terms.tenure_months,
            "start_date": terms.start_date.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

pub(crate) fn due_date(start_date: NaiveDate, index: u32) -> CoopBookResult<NaiveDate> {
    add_months(start_date, index)
}
