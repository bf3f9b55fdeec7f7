use clap::Args;
use serde_json::Value;
use std::time::Instant;

use coopbook_core::loans::ledger::{self, StatusInput};
use coopbook_core::loans::InstallmentStatus;
use coopbook_core::types::with_metadata;

use super::schedule_from_value;
use crate::input;
use crate::CliResult;

/// Arguments for an installment status change
#[derive(Args)]
pub struct SetStatusArgs {
    /// Path to a loan document or installment array
    #[arg(long)]
    pub input: Option<String>,

    /// 1-based installment index
    #[arg(long)]
    pub index: u32,

    /// Paid or Pending
    #[arg(long)]
    pub status: InstallmentStatus,
}

/// Arguments for schedule aggregates
#[derive(Args)]
pub struct SummaryArgs {
    /// Path to a loan document or installment array
    #[arg(long)]
    pub input: Option<String>,
}

fn read_schedule_document(path: Option<&str>) -> CliResult<Value> {
    if let Some(path) = path {
        input::file::read_json_value(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(data)
    } else {
        Err("--input file (or a schedule on stdin) is required".into())
    }
}

pub fn run_set_status(args: SetStatusArgs) -> CliResult<Value> {
    let repayments = schedule_from_value(read_schedule_document(args.input.as_deref())?)?;
    let request = StatusInput {
        repayments,
        index: args.index,
        status: args.status,
    };

    let result = ledger::update_installment_status(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_summary(args: SummaryArgs) -> CliResult<Value> {
    let start = Instant::now();
    let repayments = schedule_from_value(read_schedule_document(args.input.as_deref())?)?;

    let summary = ledger::summarize_schedule(&repayments);
    let elapsed = start.elapsed().as_micros() as u64;
    let result = with_metadata(
        "Schedule aggregates over current installment statuses",
        &serde_json::json!({ "installments": repayments.len() }),
        Vec::new(),
        elapsed,
        summary,
    );
    Ok(serde_json::to_value(result)?)
}
