//! Domain models for transactions: the persisted one-offs and the uniform
//! normalized shape the projection pipeline works with.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{Category, Direction};
use std::time::{SystemTime, UNIX_EPOCH};

/// A directly-entered, persisted transaction. Unlike expanded occurrences
/// (regenerated fresh on every computation) these have stable identity
/// across reloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneOffTransaction {
    pub id: String,
    pub date: NaiveDate,
    pub details: String,
    /// Unsigned magnitude in CHF.
    pub amount: f64,
    pub direction: Direction,
    /// Explicit category carried over from import, if any.
    pub category: Option<Category>,
    /// Set once the record was edited after creation/import.
    pub modified: bool,
    pub is_simulation: bool,
}

impl OneOffTransaction {
    /// Generate a transaction ID from direction and a millisecond timestamp.
    /// Format: `tx-<in|out>-<timestamp_ms>-<suffix>`.
    pub fn generate_id(direction: Direction, timestamp_ms: u64) -> String {
        let tag = match direction {
            Direction::Incoming => "in",
            Direction::Outgoing => "out",
        };
        format!("tx-{}-{}-{}", tag, timestamp_ms, random_suffix(4))
    }

    pub fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

fn random_suffix(len: usize) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{:x}", nanos % (16_u128.pow(len as u32)))
        .chars()
        .take(len)
        .collect()
}

/// Where a normalized transaction originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    OneOff,
    FixedCost,
    Salary,
    Simulation,
}

/// The uniform transaction shape produced by the normalizer.
///
/// Invariant: `signed_amount` is `+amount` for incoming and `-amount` for
/// outgoing; `amount` itself is always the unsigned magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub date: NaiveDate,
    pub details: String,
    pub amount: f64,
    pub signed_amount: f64,
    pub direction: Direction,
    pub category: Category,
    pub source: SourceKind,
    pub was_date_shifted: bool,
}

/// A normalized transaction annotated with its running balance.
///
/// `running_balance` is only present for transactions after the evaluation
/// date; historical transactions are presentational facts and carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancedTransaction {
    pub transaction: NormalizedTransaction,
    pub running_balance: Option<f64>,
    pub projected: bool,
}
