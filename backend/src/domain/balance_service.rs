//! Service for the shared account balance.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::domain::errors::DomainError;
use crate::domain::models::balance::{BalanceSnapshot, CurrentBalance};
use crate::storage::csv::{BalanceRepository, CsvConnection};
use crate::storage::BalanceStorage;

#[derive(Clone)]
pub struct BalanceService {
    balance_repository: BalanceRepository,
}

impl BalanceService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            balance_repository: BalanceRepository::new(connection),
        }
    }

    pub fn get_current_balance(&self) -> Result<Option<CurrentBalance>> {
        self.balance_repository.get_current()
    }

    /// The current balance, degraded to `0.0` when the store is empty or
    /// unreadable. Projections stay available either way; the figures are
    /// then relative to zero.
    pub fn current_balance_or_zero(&self) -> f64 {
        match self.balance_repository.get_current() {
            Ok(Some(current)) => current.balance,
            Ok(None) => {
                warn!("No balance recorded yet, projecting from 0.0");
                0.0
            }
            Err(err) => {
                warn!("Failed to read balance, projecting from 0.0: {:#}", err);
                0.0
            }
        }
    }

    /// Overwrite the balance (last write wins) and record the day snapshot.
    pub fn set_current_balance(
        &self,
        balance: f64,
        effective_date: NaiveDate,
    ) -> Result<CurrentBalance> {
        if !balance.is_finite() {
            return Err(DomainError::Validation("Balance must be a finite number".to_string()).into());
        }

        let current = CurrentBalance {
            balance,
            effective_date,
            updated_at: Utc::now(),
        };
        self.balance_repository.set_current(&current)?;
        info!("Balance set to {:.2} as of {}", balance, effective_date);
        Ok(current)
    }

    pub fn list_snapshots(&self) -> Result<Vec<BalanceSnapshot>> {
        self.balance_repository.list_snapshots()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service() -> (tempfile::TempDir, BalanceService) {
        let dir = tempfile::tempdir().unwrap();
        let conn = CsvConnection::new(dir.path()).unwrap();
        (dir, BalanceService::new(conn))
    }

    #[test]
    fn missing_balance_degrades_to_zero() {
        let (_dir, service) = service();
        assert_eq!(service.current_balance_or_zero(), 0.0);
    }

    #[test]
    fn set_and_read_back() {
        let (_dir, service) = service();
        service.set_current_balance(42_000.0, date(2024, 5, 1)).unwrap();
        assert_eq!(service.current_balance_or_zero(), 42_000.0);

        let current = service.get_current_balance().unwrap().unwrap();
        assert_eq!(current.effective_date, date(2024, 5, 1));
    }

    #[test]
    fn rejects_non_finite_balance() {
        let (_dir, service) = service();
        assert!(service.set_current_balance(f64::NAN, date(2024, 5, 1)).is_err());
        assert!(service
            .set_current_balance(f64::INFINITY, date(2024, 5, 1))
            .is_err());
    }

    #[test]
    fn snapshots_accumulate_per_day() {
        let (_dir, service) = service();
        service.set_current_balance(1000.0, date(2024, 5, 1)).unwrap();
        service.set_current_balance(1100.0, date(2024, 5, 2)).unwrap();
        assert_eq!(service.list_snapshots().unwrap().len(), 2);
    }
}
