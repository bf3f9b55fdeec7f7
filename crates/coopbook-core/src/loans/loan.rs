use serde::{Deserialize, Serialize};

use super::history::LumpSumHistory;
use super::ledger::set_installment_status;
use super::model::{Installment, InstallmentStatus, LoanTerms};
use super::prepayment::PrepaymentOutcome;
use super::schedule::generate_schedule;
use crate::CoopBookResult;

/// A loan with its live schedule and prepayment history.
///
/// Every operation returns a new `Loan`; callers persist the replacement as a
/// whole rather than patching individual installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub terms: LoanTerms,
    pub repayments: Vec<Installment>,
    #[serde(default)]
    pub lump_sum_payments: LumpSumHistory,
}

impl Loan {
    pub fn open(id: impl Into<String>, terms: LoanTerms) -> CoopBookResult<Self> {
        let repayments = generate_schedule(&terms)?;
        Ok(Self {
            id: id.into(),
            terms,
            repayments,
            lump_sum_payments: LumpSumHistory::new(),
        })
    }

    pub fn with_installment_status(
        &self,
        index: u32,
        status: InstallmentStatus,
    ) -> CoopBookResult<Self> {
        Ok(Self {
            repayments: set_installment_status(&self.repayments, index, status)?,
            ..self.clone()
        })
    }

    /// Splice a computed prepayment into the loan and record its event.
    pub fn with_prepayment(&self, outcome: &PrepaymentOutcome) -> Self {
        let mut history = self.lump_sum_payments.clone();
        history.append(outcome.event.clone());
        Self {
            repayments: outcome.repayments.clone(),
            lump_sum_payments: history,
            ..self.clone()
        }
    }

    /// Replace the terms and regenerate the whole schedule.
    ///
    /// Paid flags on the old schedule are lost; the prepayment history is kept.
    pub fn revise_terms(&self, terms: LoanTerms) -> CoopBookResult<Self> {
        let repayments = generate_schedule(&terms)?;
        let paid = self.repayments.iter().filter(|i| i.is_paid()).count();
        if paid > 0 {
            tracing::warn!(
                loan_id = %self.id,
                paid_installments = paid,
                "terms revised; paid installment statuses reset"
            );
        } else {
            tracing::info!(loan_id = %self.id, "terms revised; schedule regenerated");
        }
        Ok(Self {
            id: self.id.clone(),
            terms,
            repayments,
            lump_sum_payments: self.lump_sum_payments.clone(),
        })
    }
}
