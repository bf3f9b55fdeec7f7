use napi::Result as NapiResult;
use napi_derive::napi;

use coopbook_core::loans::{self, ledger, prepayment, schedule};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

/// Loan terms JSON in, schedule envelope JSON out.
#[napi]
pub fn generate_schedule(terms_json: String) -> NapiResult<String> {
    let terms: loans::LoanTerms = serde_json::from_str(&terms_json).map_err(to_napi_error)?;
    let output = schedule::build_loan_schedule(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn schedule_summary(repayments_json: String) -> NapiResult<String> {
    let repayments: Vec<loans::Installment> =
        serde_json::from_str(&repayments_json).map_err(to_napi_error)?;
    let summary = ledger::summarize_schedule(&repayments);
    serde_json::to_string(&summary).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[napi]
pub fn set_installment_status(input_json: String) -> NapiResult<String> {
    let input: ledger::StatusInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = ledger::update_installment_status(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Prepayment
// ---------------------------------------------------------------------------

#[napi]
pub fn apply_prepayment(input_json: String) -> NapiResult<String> {
    let input: prepayment::PrepaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = prepayment::recalculate_after_prepayment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
