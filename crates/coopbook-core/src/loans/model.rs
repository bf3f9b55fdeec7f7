//! Value types shared by the schedule generator, ledger and prepayment engine.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoopBookError;
use crate::types::{Money, RatePercent};
use crate::CoopBookResult;

/// Terms a schedule is generated from. Never edited in place; a revision
/// produces a new schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Nominal annual rate in percent (12 = 12% p.a.).
    pub annual_rate_percent: RatePercent,
    pub tenure_months: u32,
    /// Installment `n` falls due `n` calendar months after this date.
    pub start_date: NaiveDate,
}

impl LoanTerms {
    pub fn validate(&self) -> CoopBookResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(CoopBookError::InvalidTerms {
                field: "principal".into(),
                reason: "Principal must be positive".into(),
            });
        }
        if self.tenure_months == 0 {
            return Err(CoopBookError::InvalidTerms {
                field: "tenure_months".into(),
                reason: "Tenure must be at least 1 month".into(),
            });
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(CoopBookError::InvalidTerms {
                field: "annual_rate_percent".into(),
                reason: "Interest rate cannot be negative".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallmentStatus {
    #[default]
    Pending,
    Paid,
}

impl FromStr for InstallmentStatus {
    type Err = CoopBookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(InstallmentStatus::Pending),
            "paid" => Ok(InstallmentStatus::Paid),
            _ => Err(CoopBookError::InvalidStatus(s.to_string())),
        }
    }
}

/// One row of a repayment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based position in the schedule.
    pub index: u32,
    pub due_date: NaiveDate,
    pub principal_component: Money,
    pub interest_component: Money,
    /// principal_component + interest_component.
    pub total_emi: Money,
    pub outstanding_principal_after: Money,
    #[serde(default)]
    pub status: InstallmentStatus,
}

impl Installment {
    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }
}

/// Policy for re-deriving the schedule tail after a lump-sum payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrepaymentMode {
    /// Keep the original EMI, finish sooner.
    #[serde(alias = "reduce_tenure")]
    ReduceTenure,
    /// Keep the remaining period count, lower the EMI.
    #[serde(rename = "ReduceEMI", alias = "reduce_emi", alias = "ReduceEmi")]
    ReduceEmi,
}

impl FromStr for PrepaymentMode {
    type Err = CoopBookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalised.as_str() {
            "reducetenure" | "tenure" => Ok(PrepaymentMode::ReduceTenure),
            "reduceemi" | "emi" => Ok(PrepaymentMode::ReduceEmi),
            _ => Err(CoopBookError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for PrepaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrepaymentMode::ReduceTenure => write!(f, "ReduceTenure"),
            PrepaymentMode::ReduceEmi => write!(f, "ReduceEMI"),
        }
    }
}

/// Audit record of one prepayment. Written once, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LumpSumEvent {
    pub amount: Money,
    pub applied_after_installment: u32,
    pub mode: PrepaymentMode,
    pub applied_at: DateTime<Utc>,
}
