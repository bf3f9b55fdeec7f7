//! Loan schedules: generation, status tracking and prepayment recalculation.

pub mod history;
pub mod ledger;
pub mod loan;
pub mod model;
pub mod prepayment;
pub mod schedule;

pub use history::LumpSumHistory;
pub use ledger::{pending_count, pending_principal_sum, set_installment_status, summarize_schedule};
pub use loan::Loan;
pub use model::{Installment, InstallmentStatus, LoanTerms, LumpSumEvent, PrepaymentMode};
pub use prepayment::{apply_prepayment, PrepaymentOutcome};
pub use schedule::generate_schedule;
