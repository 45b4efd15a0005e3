//! Storage abstraction traits.
//!
//! The domain layer works exclusively against these traits, so the CSV
//! backend can be swapped for any other record store without touching the
//! services.

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::models::balance::{BalanceSnapshot, CurrentBalance};
use crate::domain::models::recurring::{
    FixedCost, OccurrenceOverride, SalaryRecord, Scenario, SimulationEntry,
};
use crate::domain::models::transaction::OneOffTransaction;

/// Persisted one-off transactions.
pub trait TransactionStorage: Send + Sync {
    fn store_transaction(&self, transaction: &OneOffTransaction) -> Result<()>;

    /// Append many rows in one write (bulk import).
    fn store_transactions(&self, transactions: &[OneOffTransaction]) -> Result<usize>;

    fn get_transaction(&self, id: &str) -> Result<Option<OneOffTransaction>>;

    /// All transactions ascending by date.
    fn list_transactions(&self) -> Result<Vec<OneOffTransaction>>;

    /// Transactions with `start <= date <= end`, ascending by date.
    fn list_transactions_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OneOffTransaction>>;

    fn update_transaction(&self, transaction: &OneOffTransaction) -> Result<()>;

    /// Returns true when the record existed and was removed.
    fn delete_transaction(&self, id: &str) -> Result<bool>;
}

/// Fixed-cost definitions.
pub trait FixedCostStorage: Send + Sync {
    fn store_fixed_cost(&self, fixed_cost: &FixedCost) -> Result<()>;
    fn get_fixed_cost(&self, id: &str) -> Result<Option<FixedCost>>;
    fn list_fixed_costs(&self) -> Result<Vec<FixedCost>>;
    fn update_fixed_cost(&self, fixed_cost: &FixedCost) -> Result<()>;
    fn delete_fixed_cost(&self, id: &str) -> Result<bool>;
}

/// Payroll records.
pub trait PayrollStorage: Send + Sync {
    fn store_salary(&self, salary: &SalaryRecord) -> Result<()>;
    fn get_salary(&self, id: &str) -> Result<Option<SalaryRecord>>;
    fn list_salaries(&self) -> Result<Vec<SalaryRecord>>;
    fn update_salary(&self, salary: &SalaryRecord) -> Result<()>;
    fn delete_salary(&self, id: &str) -> Result<bool>;
}

/// Simulation entries and their named scenarios.
pub trait SimulationStorage: Send + Sync {
    fn store_entry(&self, entry: &SimulationEntry) -> Result<()>;
    fn get_entry(&self, id: &str) -> Result<Option<SimulationEntry>>;
    fn list_entries(&self) -> Result<Vec<SimulationEntry>>;
    fn update_entry(&self, entry: &SimulationEntry) -> Result<()>;
    fn delete_entry(&self, id: &str) -> Result<bool>;

    fn store_scenario(&self, scenario: &Scenario) -> Result<()>;
    fn list_scenarios(&self) -> Result<Vec<Scenario>>;
    fn get_scenario(&self, id: &str) -> Result<Option<Scenario>>;
    /// Deletes the scenario and detaches its entries.
    fn delete_scenario(&self, id: &str) -> Result<bool>;
}

/// Per-occurrence overrides, keyed by `(definition_id, original_date)`.
pub trait OverrideStorage: Send + Sync {
    /// Insert or replace the override for its key.
    fn upsert_override(&self, ov: &OccurrenceOverride) -> Result<()>;

    fn get_override(
        &self,
        definition_id: &str,
        original_date: NaiveDate,
    ) -> Result<Option<OccurrenceOverride>>;

    /// All overrides, every definition.
    fn list_overrides(&self) -> Result<Vec<OccurrenceOverride>>;

    /// Overrides addressing one definition.
    fn list_overrides_for(&self, definition_id: &str) -> Result<Vec<OccurrenceOverride>>;

    fn delete_override(&self, definition_id: &str, original_date: NaiveDate) -> Result<bool>;
}

/// The single shared balance record plus its day-keyed snapshot history.
pub trait BalanceStorage: Send + Sync {
    fn get_current(&self) -> Result<Option<CurrentBalance>>;

    /// Last write wins; also records a day-keyed snapshot, at most one per
    /// calendar day.
    fn set_current(&self, balance: &CurrentBalance) -> Result<()>;

    /// Snapshot history ascending by day.
    fn list_snapshots(&self) -> Result<Vec<BalanceSnapshot>>;
}
