use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use coopbook_core::loans::prepayment::{self, PrepaymentInput};
use coopbook_core::loans::Loan;

use crate::input;
use crate::CliResult;

/// Arguments for lump-sum prepayment
#[derive(Args)]
pub struct PrepayArgs {
    /// Path to a JSON prepayment request {loan, amount, after_installment, mode}
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON loan document (used with the flags below)
    #[arg(long)]
    pub loan: Option<String>,

    /// Lump-sum amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Installment after which the lump sum is paid
    #[arg(long, alias = "after-installment")]
    pub after: Option<u32>,

    /// ReduceTenure or ReduceEMI
    #[arg(long)]
    pub mode: Option<String>,
}

pub fn run_prepay(args: PrepayArgs) -> CliResult<Value> {
    let request: PrepaymentInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else {
        let loan: Loan = if let Some(ref path) = args.loan {
            input::file::read_json(path)?
        } else if let Some(data) = input::stdin::read_stdin()? {
            serde_json::from_value(data)?
        } else {
            return Err("--loan file (or a loan on stdin) is required, or provide --input".into());
        };

        PrepaymentInput {
            loan,
            amount: args.amount.ok_or("--amount is required (or provide --input)")?,
            after_installment: args.after.ok_or("--after is required (or provide --input)")?,
            mode: args.mode.ok_or("--mode is required (or provide --input)")?,
            applied_at: None,
        }
    };

    let result = prepayment::recalculate_after_prepayment(&request)?;
    Ok(serde_json::to_value(result)?)
}
