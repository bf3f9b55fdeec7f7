//! Installment status tracking and read-only aggregates over a schedule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::model::{Installment, InstallmentStatus};
use crate::error::CoopBookError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::CoopBookResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInput {
    pub repayments: Vec<Installment>,
    pub index: u32,
    pub status: InstallmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOutput {
    pub repayments: Vec<Installment>,
    /// False when the installment already carried the requested status.
    pub changed: bool,
    pub summary: ScheduleSummary,
}

/// The first installment still awaiting payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextDue {
    pub index: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub installment_count: usize,
    pub paid_count: usize,
    pub pending_count: usize,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_payable: Money,
    pub pending_principal: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due: Option<NextDue>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Return a copy of `schedule` with installment `index` set to `status`.
///
/// Only the status field changes. Setting the status an installment already
/// has is a no-op, so the call is idempotent in both directions.
pub fn set_installment_status(
    schedule: &[Installment],
    index: u32,
    status: InstallmentStatus,
) -> CoopBookResult<Vec<Installment>> {
    let position = position_of(schedule, index).ok_or(CoopBookError::InstallmentNotFound {
        index,
        len: schedule.len(),
    })?;

    let mut updated = schedule.to_vec();
    updated[position].status = status;
    Ok(updated)
}

pub fn pending_count(schedule: &[Installment]) -> usize {
    schedule.iter().filter(|i| !i.is_paid()).count()
}

pub fn pending_principal_sum(schedule: &[Installment]) -> Money {
    schedule
        .iter()
        .filter(|i| !i.is_paid())
        .map(|i| i.principal_component)
        .sum()
}

pub fn summarize_schedule(schedule: &[Installment]) -> ScheduleSummary {
    let total_principal: Money = schedule.iter().map(|i| i.principal_component).sum();
    let total_interest: Money = schedule.iter().map(|i| i.interest_component).sum();
    let pending = pending_count(schedule);

    let next_due = schedule.iter().find(|i| !i.is_paid()).map(|i| NextDue {
        index: i.index,
        due_date: i.due_date,
        amount: i.total_emi,
    });

    ScheduleSummary {
        installment_count: schedule.len(),
        paid_count: schedule.len() - pending,
        pending_count: pending,
        total_principal,
        total_interest,
        total_payable: total_principal + total_interest,
        pending_principal: pending_principal_sum(schedule),
        next_due,
    }
}

/// Toggle one installment and report the resulting schedule and aggregates.
pub fn update_installment_status(
    input: &StatusInput,
) -> CoopBookResult<ComputationOutput<StatusOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let repayments = set_installment_status(&input.repayments, input.index, input.status)?;

    let changed = input
        .repayments
        .iter()
        .any(|i| i.index == input.index && i.status != input.status);

    if !changed {
        warnings.push(format!(
            "Installment {} was already {:?}",
            input.index, input.status
        ));
    }

    if input.status == InstallmentStatus::Paid {
        if let Some(earlier) = repayments
            .iter()
            .find(|i| i.index < input.index && !i.is_paid())
        {
            warnings.push(format!(
                "Installment {} marked paid while earlier installment {} is still pending",
                input.index, earlier.index
            ));
        }
    }

    let summary = summarize_schedule(&repayments);
    let output = StatusOutput {
        repayments,
        changed,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Installment status update (status field only)",
        &serde_json::json!({
            "index": input.index,
            "status": input.status,
            "installments": input.repayments.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn position_of(schedule: &[Installment], index: u32) -> Option<usize> {
    if index == 0 || index as usize > schedule.len() {
        return None;
    }
    let position = index as usize - 1;
    if schedule[position].index == index {
        Some(position)
    } else {
        schedule.iter().position(|i| i.index == index)
    }
}
