//! CSV-file storage backend.
//!
//! One file per entity kind inside a single data directory; every write
//! rewrites the file through a buffered `csv::Writer` after mutating the
//! in-memory record list. Plain-text files keep the organization's books
//! inspectable and trivially backed up.
//!
//! Files: `transactions.csv`, `fixed_costs.csv`, `payroll.csv`,
//! `simulations.csv`, `scenarios.csv`, `overrides.csv`, `balance.csv`,
//! `balance_history.csv`.

pub mod balance_repository;
pub mod connection;
pub mod fields;
pub mod fixed_cost_repository;
pub mod override_repository;
pub mod payroll_repository;
pub mod simulation_repository;
pub mod transaction_repository;

pub use balance_repository::BalanceRepository;
pub use connection::CsvConnection;
pub use fixed_cost_repository::FixedCostRepository;
pub use override_repository::OverrideRepository;
pub use payroll_repository::PayrollRepository;
pub use simulation_repository::SimulationRepository;
pub use transaction_repository::TransactionRepository;
