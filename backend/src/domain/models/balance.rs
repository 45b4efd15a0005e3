//! The single shared account balance and its day-keyed snapshot history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The one global account balance. Not per-user: the application tracks a
/// single organizational account. Last write wins; every write stamps
/// `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentBalance {
    pub balance: f64,
    /// Day the balance is stated for.
    pub effective_date: NaiveDate,
    pub updated_at: DateTime<Utc>,
}

/// One balance snapshot, written at most once per calendar day touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub day: NaiveDate,
    pub balance: f64,
}
