use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoopBookError {
    #[error("Invalid loan terms: {field}: {reason}")]
    InvalidTerms { field: String, reason: String },

    #[error("Invalid prepayment amount: {0} (must be greater than zero)")]
    InvalidAmount(Decimal),

    #[error("Invalid installment: {index} is outside the schedule of {len} installments")]
    InvalidInstallment { index: u32, len: usize },

    #[error("Installment not found: {index} (schedule has {len} installments)")]
    InstallmentNotFound { index: u32, len: usize },

    #[error("Invalid prepayment mode: {0:?} (expected ReduceTenure or ReduceEMI)")]
    InvalidMode(String),

    #[error("Invalid installment status: {0:?} (expected Pending or Paid)")]
    InvalidStatus(String),

    #[error("Degenerate tenure: no periods remain after installment {after_installment} of a {tenure_months}-month loan")]
    DegenerateTenure {
        after_installment: u32,
        tenure_months: u32,
    },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Loan not found: {0}")]
    LoanNotFound(String),

    #[error("Loan already exists: {0}")]
    DuplicateLoan(String),

    #[error("Version conflict on loan {loan_id}: expected {expected}, found {actual}")]
    VersionConflict {
        loan_id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CoopBookError {
    fn from(e: serde_json::Error) -> Self {
        CoopBookError::SerializationError(e.to_string())
    }
}
