//! Persistence port for loans.
//!
//! The engine never touches storage itself. Callers load a [`VersionedLoan`],
//! run a pure engine operation, and hand the replacement back through
//! [`LoanStore::save`], which must reject the write if anyone else saved the
//! loan in between.

pub mod memory;
pub mod service;

use serde::{Deserialize, Serialize};

use crate::loans::Loan;
use crate::CoopBookResult;

pub use memory::InMemoryLoanStore;
pub use service::LoanService;

/// A loan snapshot tagged with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedLoan {
    pub loan: Loan,
    pub version: u64,
}

pub trait LoanStore: Send + Sync {
    /// Store a new loan at version 1. Fails with `DuplicateLoan` if the id is taken.
    fn insert(&self, loan: Loan) -> CoopBookResult<VersionedLoan>;

    /// Fetch the current snapshot. Fails with `LoanNotFound`.
    fn load(&self, id: &str) -> CoopBookResult<VersionedLoan>;

    /// Replace the loan's schedule and history in one write if its stored
    /// version still equals `expected_version`; otherwise `VersionConflict`.
    fn save(&self, loan: Loan, expected_version: u64) -> CoopBookResult<VersionedLoan>;

    fn list_ids(&self) -> CoopBookResult<Vec<String>>;
}
