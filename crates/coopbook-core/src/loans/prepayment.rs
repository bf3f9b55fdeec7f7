//! Schedule recalculation after an out-of-cycle lump-sum payment.
//!
//! The balance recorded at the chosen installment boundary is reduced by the
//! lump sum and a fresh tail is amortized from there, either at the original
//! EMI (the loan finishes sooner) or at a new EMI over the remaining original
//! tenure. Installments up to the boundary are kept exactly as they were.
//!
//! The starting balance is read from the stored schedule, not re-derived from
//! which installments are actually paid.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::ledger::{summarize_schedule, ScheduleSummary};
use super::loan::Loan;
use super::model::{Installment, InstallmentStatus, LumpSumEvent, PrepaymentMode};
use super::schedule::{due_date, original_emi};
use crate::error::CoopBookError;
use crate::time_value::{emi, monthly_rate, round_money};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::CoopBookResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Upper bound on a recalculated tail (100 years of monthly installments).
const MAX_TAIL_PERIODS: u32 = 1200;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Replacement schedule and audit event produced by one prepayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepaymentOutcome {
    pub repayments: Vec<Installment>,
    pub event: LumpSumEvent,
    /// Paid installments beyond the boundary that the new tail replaced.
    pub discarded_paid: Vec<u32>,
    /// Balance recorded at the boundary before the lump sum.
    pub outstanding_before: Money,
    /// Balance the new tail amortizes.
    pub outstanding_after: Money,
    /// EMI charged by the new tail.
    pub tail_emi: Money,
}

impl PrepaymentOutcome {
    pub fn tail(&self) -> &[Installment] {
        let start = self.event.applied_after_installment as usize;
        &self.repayments[start.min(self.repayments.len())..]
    }
}

/// Serialized request for [`recalculate_after_prepayment`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentInput {
    pub loan: Loan,
    pub amount: Money,
    pub after_installment: u32,
    /// `ReduceTenure` or `ReduceEMI`.
    pub mode: String,
    /// Defaults to the current time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentOutput {
    pub loan: Loan,
    pub event: LumpSumEvent,
    pub discarded_paid: Vec<u32>,
    pub outstanding_before: Money,
    pub outstanding_after: Money,
    pub previous_emi: Money,
    pub tail_emi: Money,
    pub tail_length: usize,
    pub summary: ScheduleSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Recompute the schedule tail after a lump-sum payment of `amount` made
/// right after installment `after_installment`.
pub fn apply_prepayment(
    loan: &Loan,
    amount: Money,
    after_installment: u32,
    mode: PrepaymentMode,
    applied_at: DateTime<Utc>,
) -> CoopBookResult<PrepaymentOutcome> {
    if amount <= Decimal::ZERO {
        return Err(CoopBookError::InvalidAmount(amount));
    }
    if after_installment == 0 || after_installment as usize > loan.repayments.len() {
        return Err(CoopBookError::InvalidInstallment {
            index: after_installment,
            len: loan.repayments.len(),
        });
    }

    let boundary = after_installment as usize;
    let outstanding_before = loan.repayments[boundary - 1].outstanding_principal_after;
    let reduced = (outstanding_before - amount).max(Decimal::ZERO);

    let (tail, tail_emi) = match mode {
        PrepaymentMode::ReduceTenure => reduce_tenure_tail(loan, reduced, after_installment)?,
        PrepaymentMode::ReduceEmi => reduce_emi_tail(loan, reduced, after_installment)?,
    };

    let discarded_paid: Vec<u32> = loan.repayments[boundary..]
        .iter()
        .filter(|i| i.is_paid())
        .map(|i| i.index)
        .collect();
    if !discarded_paid.is_empty() {
        tracing::warn!(
            loan_id = %loan.id,
            after_installment,
            discarded = ?discarded_paid,
            "paid installments beyond the prepayment point were replaced"
        );
    }

    let mut repayments = Vec::with_capacity(boundary + tail.len());
    repayments.extend_from_slice(&loan.repayments[..boundary]);
    repayments.extend(tail);

    tracing::info!(
        loan_id = %loan.id,
        amount = %amount,
        after_installment,
        mode = %mode,
        outstanding_before = %outstanding_before,
        outstanding_after = %reduced,
        tail_emi = %tail_emi,
        installments = repayments.len(),
        "prepayment applied"
    );

    Ok(PrepaymentOutcome {
        repayments,
        event: LumpSumEvent {
            amount,
            applied_after_installment: after_installment,
            mode,
            applied_at,
        },
        discarded_paid,
        outstanding_before,
        outstanding_after: reduced,
        tail_emi,
    })
}

/// Parse, apply and wrap a prepayment request, returning the updated loan.
pub fn recalculate_after_prepayment(
    input: &PrepaymentInput,
) -> CoopBookResult<ComputationOutput<PrepaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mode: PrepaymentMode = input.mode.parse()?;
    let applied_at = input.applied_at.unwrap_or_else(Utc::now);
    let previous_emi = original_emi(&input.loan.terms)?;

    let outcome = apply_prepayment(
        &input.loan,
        input.amount,
        input.after_installment,
        mode,
        applied_at,
    )?;

    if input.amount > outcome.outstanding_before {
        warnings.push(format!(
            "Prepayment {} exceeds the outstanding balance {}; the excess is not applied",
            input.amount, outcome.outstanding_before
        ));
    }
    if !outcome.discarded_paid.is_empty() {
        warnings.push(format!(
            "Paid installments {:?} lay beyond installment {} and were replaced by the new schedule",
            outcome.discarded_paid, input.after_installment
        ));
    }

    let tail_length = outcome.tail().len();
    let loan = input.loan.with_prepayment(&outcome);
    let summary = summarize_schedule(&loan.repayments);

    let output = PrepaymentOutput {
        loan,
        event: outcome.event,
        discarded_paid: outcome.discarded_paid,
        outstanding_before: outcome.outstanding_before,
        outstanding_after: outcome.outstanding_after,
        previous_emi,
        tail_emi: outcome.tail_emi,
        tail_length,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Lump-sum prepayment with tail re-amortization",
        &serde_json::json!({
            "loan_id": input.loan.id,
            "amount": input.amount.to_string(),
            "after_installment": input.after_installment,
            "mode": mode.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tail builders
// ---------------------------------------------------------------------------

/// Original EMI, as many periods as it takes to clear `balance`.
fn reduce_tenure_tail(
    loan: &Loan,
    mut balance: Money,
    after_installment: u32,
) -> CoopBookResult<(Vec<Installment>, Money)> {
    let rate = monthly_rate(loan.terms.annual_rate_percent);
    let emi = original_emi(&loan.terms)?;

    let mut tail = Vec::new();
    let mut index = after_installment;

    loop {
        if tail.len() as u32 >= MAX_TAIL_PERIODS {
            return Err(CoopBookError::FinancialImpossibility(format!(
                "balance {balance} not cleared within {MAX_TAIL_PERIODS} installments"
            )));
        }
        index += 1;

        let interest = round_money(balance * rate);
        let principal_component = (emi - interest).min(balance);
        if principal_component <= Decimal::ZERO && !balance.is_zero() {
            return Err(CoopBookError::FinancialImpossibility(format!(
                "EMI {emi} does not cover interest {interest} on balance {balance}"
            )));
        }
        balance -= principal_component;

        tail.push(pending_installment(
            loan,
            index,
            principal_component,
            interest,
            balance,
        )?);

        if balance.is_zero() {
            break;
        }
    }

    Ok((tail, emi))
}

/// New EMI over exactly the periods left in the original tenure.
fn reduce_emi_tail(
    loan: &Loan,
    mut balance: Money,
    after_installment: u32,
) -> CoopBookResult<(Vec<Installment>, Money)> {
    let remaining = loan
        .terms
        .tenure_months
        .checked_sub(after_installment)
        .filter(|periods| *periods > 0)
        .ok_or(CoopBookError::DegenerateTenure {
            after_installment,
            tenure_months: loan.terms.tenure_months,
        })?;

    let rate = monthly_rate(loan.terms.annual_rate_percent);
    let new_emi = emi(balance, rate, remaining)?;

    let mut tail = Vec::with_capacity(remaining as usize);
    for period in 1..=remaining {
        let interest = round_money(balance * rate);
        // last period takes whatever the fixed EMI left behind
        let principal_component = if period == remaining {
            balance
        } else {
            (new_emi - interest).min(balance)
        };
        balance -= principal_component;

        tail.push(pending_installment(
            loan,
            after_installment + period,
            principal_component,
            interest,
            balance,
        )?);
    }

    Ok((tail, new_emi))
}

fn pending_installment(
    loan: &Loan,
    index: u32,
    principal_component: Money,
    interest_component: Money,
    outstanding_after: Money,
) -> CoopBookResult<Installment> {
    Ok(Installment {
        index,
        due_date: due_date(loan.terms.start_date, index)?,
        principal_component,
        interest_component,
        total_emi: principal_component + interest_component,
        outstanding_principal_after: outstanding_after,
        status: InstallmentStatus::Pending,
    })
}
