//! Cashflow-planner backend.
//!
//! Layering: `rest` translates HTTP to domain commands, `domain` holds the
//! projection logic and services, `storage` persists everything as CSV
//! files. All state shared across handlers lives in [`AppState`].

pub mod domain;
pub mod rest;
pub mod storage;

use domain::{
    BalanceService, FixedCostService, PayrollService, ReportService, SimulationService,
    TransactionService,
};
use storage::csv::CsvConnection;

/// One service instance per concern, all over the same data directory.
#[derive(Clone)]
pub struct AppState {
    pub transaction_service: TransactionService,
    pub fixed_cost_service: FixedCostService,
    pub payroll_service: PayrollService,
    pub simulation_service: SimulationService,
    pub balance_service: BalanceService,
    pub report_service: ReportService,
}

impl AppState {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            transaction_service: TransactionService::new(connection.clone()),
            fixed_cost_service: FixedCostService::new(connection.clone()),
            payroll_service: PayrollService::new(connection.clone()),
            simulation_service: SimulationService::new(connection.clone()),
            balance_service: BalanceService::new(connection.clone()),
            report_service: ReportService::new(connection),
        }
    }
}
