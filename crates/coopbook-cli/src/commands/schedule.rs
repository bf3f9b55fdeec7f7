use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use coopbook_core::loans::schedule;
use coopbook_core::loans::LoanTerms;

use crate::input;
use crate::CliResult;

/// Arguments for schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON loan terms (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal disbursed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual interest rate in percent (12 = 12% p.a.)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Number of monthly installments
    #[arg(long, alias = "months")]
    pub tenure: Option<u32>,

    /// Disbursement date (YYYY-MM-DD); installment n is due n months later
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

pub fn run_schedule(args: ScheduleArgs) -> CliResult<Value> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            tenure_months: args
                .tenure
                .ok_or("--tenure is required (or provide --input)")?,
            start_date: args
                .start_date
                .ok_or("--start-date is required (or provide --input)")?,
        }
    };

    let result = schedule::build_loan_schedule(&terms)?;
    Ok(serde_json::to_value(result)?)
}
