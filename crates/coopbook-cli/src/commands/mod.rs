pub mod ledger;
pub mod prepayment;
pub mod schedule;

use serde_json::Value;

use coopbook_core::loans::Installment;

use crate::CliResult;

/// Accept either a whole loan document or a bare installment array.
pub(crate) fn schedule_from_value(value: Value) -> CliResult<Vec<Installment>> {
    match value {
        Value::Object(mut map) => match map.remove("repayments") {
            Some(repayments) => Ok(serde_json::from_value(repayments)?),
            None => Err("expected a loan object with a \"repayments\" array".into()),
        },
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        _ => Err("expected a loan object or an array of installments".into()),
    }
}
