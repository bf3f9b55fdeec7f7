use chrono::{Months, NaiveDate};
use rust_decimal::RoundingStrategy;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::CoopBookError;
use crate::types::{Money, RatePercent};
use crate::CoopBookResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);
const MONEY_DP: u32 = 2;

/// Round a monetary amount to cents, half-up.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Periodic rate for a nominal annual percentage: 12 → 0.01.
pub fn monthly_rate(annual_rate_percent: RatePercent) -> Decimal {
    annual_rate_percent / MONTHS_PER_YEAR / PERCENT
}

/// Reducing-balance equated monthly installment, rounded once to cents.
///
/// A zero rate divides the principal evenly; the closed form would divide by zero.
pub fn emi(principal: Money, monthly_rate: Decimal, periods: u32) -> CoopBookResult<Money> {
    if periods == 0 {
        return Err(CoopBookError::InvalidTerms {
            field: "tenure_months".into(),
            reason: "EMI needs at least one period".into(),
        });
    }

    if monthly_rate.is_zero() {
        return Ok(round_money(principal / Decimal::from(periods)));
    }

    let factor = (Decimal::ONE + monthly_rate)
        .checked_powi(i64::from(periods))
        .ok_or_else(|| {
            CoopBookError::FinancialImpossibility(format!(
                "compounding factor overflows at {periods} periods"
            ))
        })?;

    let denominator = factor - Decimal::ONE;
    if denominator <= Decimal::ZERO {
        return Err(CoopBookError::FinancialImpossibility(
            "annuity factor is not positive".into(),
        ));
    }

    Ok(round_money(principal * monthly_rate * factor / denominator))
}

/// Advance a date by whole calendar months, clamping to month end (Jan 31 + 1 → Feb 28/29).
pub fn add_months(start: NaiveDate, months: u32) -> CoopBookResult<NaiveDate> {
    start
        .checked_add_months(Months::new(months))
        .ok_or_else(|| CoopBookError::DateError(format!("{start} + {months} months is out of range")))
}
