use serde::{Deserialize, Serialize};

use super::model::LumpSumEvent;
use crate::types::Money;

/// Append-only log of a loan's prepayments, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LumpSumHistory {
    events: Vec<LumpSumEvent>,
}

impl LumpSumHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: LumpSumEvent) {
        self.events.push(event);
    }

    pub fn list_all(&self) -> &[LumpSumEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn total_prepaid(&self) -> Money {
        self.events.iter().map(|e| e.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loans::model::PrepaymentMode;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn event(amount: Money, after: u32) -> LumpSumEvent {
        LumpSumEvent {
            amount,
            applied_after_installment: after,
            mode: PrepaymentMode::ReduceTenure,
            applied_at: Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let mut history = LumpSumHistory::new();
        history.append(event(dec!(5000), 3));
        history.append(event(dec!(2500), 7));

        let all = history.list_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].applied_after_installment, 3);
        assert_eq!(all[1].applied_after_installment, 7);
        assert_eq!(history.total_prepaid(), dec!(7500));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut history = LumpSumHistory::new();
        history.append(event(dec!(100), 1));
        let value = serde_json::to_value(&history).unwrap();
        assert!(value.is_array());
        let back: LumpSumHistory = serde_json::from_value(value).unwrap();
        assert_eq!(back, history);
    }
}
