use chrono::{DateTime, Utc};

use super::{LoanStore, VersionedLoan};
use crate::loans::{
    apply_prepayment, InstallmentStatus, Loan, LoanTerms, PrepaymentMode, PrepaymentOutcome,
};
use crate::types::Money;
use crate::CoopBookResult;

/// Load → engine → versioned save, over an injected [`LoanStore`].
///
/// Conflicts are returned to the caller unchanged; nothing here retries.
pub struct LoanService<S: LoanStore> {
    store: S,
}

impl<S: LoanStore> LoanService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn open_loan(&self, id: &str, terms: LoanTerms) -> CoopBookResult<VersionedLoan> {
        let loan = Loan::open(id, terms)?;
        tracing::info!(loan_id = id, installments = loan.repayments.len(), "loan opened");
        self.store.insert(loan)
    }

    pub fn loan(&self, id: &str) -> CoopBookResult<VersionedLoan> {
        self.store.load(id)
    }

    pub fn set_installment_status(
        &self,
        id: &str,
        index: u32,
        status: InstallmentStatus,
    ) -> CoopBookResult<VersionedLoan> {
        let current = self.store.load(id)?;
        let updated = current.loan.with_installment_status(index, status)?;
        self.store.save(updated, current.version)
    }

    pub fn prepay(
        &self,
        id: &str,
        amount: Money,
        after_installment: u32,
        mode: PrepaymentMode,
    ) -> CoopBookResult<(VersionedLoan, PrepaymentOutcome)> {
        self.prepay_at(id, amount, after_installment, mode, Utc::now())
    }

    pub fn prepay_at(
        &self,
        id: &str,
        amount: Money,
        after_installment: u32,
        mode: PrepaymentMode,
        applied_at: DateTime<Utc>,
    ) -> CoopBookResult<(VersionedLoan, PrepaymentOutcome)> {
        let current = self.store.load(id)?;
        let outcome = apply_prepayment(&current.loan, amount, after_installment, mode, applied_at)?;
        let saved = self
            .store
            .save(current.loan.with_prepayment(&outcome), current.version)?;
        Ok((saved, outcome))
    }

    pub fn revise_terms(&self, id: &str, terms: LoanTerms) -> CoopBookResult<VersionedLoan> {
        let current = self.store.load(id)?;
        let revised = current.loan.revise_terms(terms)?;
        self.store.save(revised, current.version)
    }
}
