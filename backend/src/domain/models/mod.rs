//! Domain models for the cashflow planner.

pub mod balance;
pub mod recurring;
pub mod transaction;
