use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{LoanStore, VersionedLoan};
use crate::error::CoopBookError;
use crate::loans::Loan;
use crate::CoopBookResult;

/// Process-local [`LoanStore`] backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct InMemoryLoanStore {
    loans: Mutex<HashMap<String, VersionedLoan>>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> CoopBookResult<MutexGuard<'_, HashMap<String, VersionedLoan>>> {
        self.loans
            .lock()
            .map_err(|e| CoopBookError::StoreUnavailable(format!("loan map poisoned: {e}")))
    }
}

impl LoanStore for InMemoryLoanStore {
    fn insert(&self, loan: Loan) -> CoopBookResult<VersionedLoan> {
        let mut loans = self.guard()?;
        if loans.contains_key(&loan.id) {
            return Err(CoopBookError::DuplicateLoan(loan.id));
        }
        let stored = VersionedLoan { loan, version: 1 };
        loans.insert(stored.loan.id.clone(), stored.clone());
        Ok(stored)
    }

    fn load(&self, id: &str) -> CoopBookResult<VersionedLoan> {
        self.guard()?
            .get(id)
            .cloned()
            .ok_or_else(|| CoopBookError::LoanNotFound(id.to_string()))
    }

    fn save(&self, loan: Loan, expected_version: u64) -> CoopBookResult<VersionedLoan> {
        let mut loans = self.guard()?;
        let current = loans
            .get_mut(&loan.id)
            .ok_or_else(|| CoopBookError::LoanNotFound(loan.id.clone()))?;

        if current.version != expected_version {
            return Err(CoopBookError::VersionConflict {
                loan_id: loan.id,
                expected: expected_version,
                actual: current.version,
            });
        }

        current.loan = loan;
        current.version += 1;
        Ok(current.clone())
    }

    fn list_ids(&self) -> CoopBookResult<Vec<String>> {
        let mut ids: Vec<String> = self.guard()?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loans::LoanTerms;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn loan(id: &str) -> Loan {
        Loan::open(
            id,
            LoanTerms {
                principal: dec!(24000),
                annual_rate_percent: dec!(6),
                tenure_months: 6,
                start_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_insert_then_load() {
        let store = InMemoryLoanStore::new();
        store.insert(loan("A")).unwrap();
        let loaded = store.load("A").unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.loan.repayments.len(), 6);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let store = InMemoryLoanStore::new();
        store.insert(loan("A")).unwrap();
        assert!(matches!(
            store.insert(loan("A")),
            Err(CoopBookError::DuplicateLoan(id)) if id == "A"
        ));
    }

    #[test]
    fn test_stale_save_conflicts() {
        let store = InMemoryLoanStore::new();
        store.insert(loan("A")).unwrap();

        let first = store.load("A").unwrap();
        let second = store.load("A").unwrap();

        let saved = store.save(first.loan, first.version).unwrap();
        assert_eq!(saved.version, 2);

        match store.save(second.loan, second.version) {
            Err(CoopBookError::VersionConflict {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected VersionConflict, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_loan() {
        let store = InMemoryLoanStore::new();
        assert!(matches!(store.load("nope"), Err(CoopBookError::LoanNotFound(_))));
        assert!(matches!(
            store.save(loan("nope"), 1),
            Err(CoopBookError::LoanNotFound(_))
        ));
    }

    #[test]
    fn test_list_ids_sorted() {
        let store = InMemoryLoanStore::new();
        store.insert(loan("B")).unwrap();
        store.insert(loan("A")).unwrap();
        assert_eq!(store.list_ids().unwrap(), vec!["A".to_string(), "B".to_string()]);
    }
}
