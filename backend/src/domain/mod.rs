//! Domain layer: pure cashflow logic plus the services orchestrating it
//! over storage.

pub mod balance;
pub mod balance_service;
pub mod commands;
pub mod errors;
pub mod expansion;
pub mod fixed_cost_service;
pub mod models;
pub mod normalize;
pub mod payroll_service;
pub mod recurrence;
pub mod report_service;
pub mod reporting;
pub mod simulation_service;
pub mod transaction_service;

pub use balance_service::BalanceService;
pub use fixed_cost_service::FixedCostService;
pub use payroll_service::PayrollService;
pub use report_service::ReportService;
pub use simulation_service::SimulationService;
pub use transaction_service::TransactionService;
