//! Domain models for recurring definitions: fixed costs, payroll records,
//! simulation entries and the per-occurrence overrides that can skip,
//! reschedule or reamount a single occurrence.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{Direction, Rhythm};
use uuid::Uuid;

/// Day of month every salary is paid on.
pub const SALARY_PAY_DAY: u32 = 25;

/// Number of months one rhythm step advances.
pub fn rhythm_months(rhythm: Rhythm) -> u32 {
    match rhythm {
        Rhythm::Monthly => 1,
        Rhythm::Quarterly => 3,
        Rhythm::Semiannual => 6,
        Rhythm::Annual => 12,
    }
}

/// The uniform shape the occurrence expander consumes. Fixed costs and
/// simulation entries convert into this; payroll records have their own
/// specialized expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringDefinition {
    pub id: String,
    pub label: String,
    pub amount: f64,
    pub direction: Direction,
    pub anchor_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub rhythm: Rhythm,
}

/// A recurring fixed cost (rent, insurance, subscriptions, ...).
///
/// Soft-ended by setting `end_date` rather than deleting, so history stays
/// intact; hard-deleted only through the explicit delete operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCost {
    pub id: String,
    pub label: String,
    pub amount: f64,
    pub direction: Direction,
    pub anchor_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub rhythm: Rhythm,
}

impl FixedCost {
    pub fn generate_id() -> String {
        format!("fc::{}", Uuid::new_v4())
    }

    pub fn as_definition(&self) -> RecurringDefinition {
        RecurringDefinition {
            id: self.id.clone(),
            label: self.label.clone(),
            amount: self.amount,
            direction: self.direction,
            anchor_date: self.anchor_date,
            end_date: self.end_date,
            rhythm: self.rhythm,
        }
    }
}

/// A payroll record: one employee's monthly salary, paid on the 25th,
/// active between `start_date` and `end_date` (open-ended if absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    pub id: String,
    pub employee: String,
    pub amount: f64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl SalaryRecord {
    pub fn generate_id() -> String {
        format!("sal::{}", Uuid::new_v4())
    }

    /// Whether this record is active on a given payment date.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| date <= end)
    }
}

/// A what-if entry. With a rhythm it recurs like a fixed cost; without one
/// it is a single dated occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEntry {
    pub id: String,
    pub label: String,
    pub amount: f64,
    pub direction: Direction,
    pub anchor_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub rhythm: Option<Rhythm>,
    pub scenario_id: Option<String>,
}

impl SimulationEntry {
    pub fn generate_id() -> String {
        format!("sim::{}", Uuid::new_v4())
    }

    /// Recurring entries expand like any other recurring definition.
    pub fn as_definition(&self) -> Option<RecurringDefinition> {
        self.rhythm.map(|rhythm| RecurringDefinition {
            id: self.id.clone(),
            label: self.label.clone(),
            amount: self.amount,
            direction: self.direction,
            anchor_date: self.anchor_date,
            end_date: self.end_date,
            rhythm,
        })
    }
}

/// A named group of simulation entries, saved for later comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Scenario {
    pub fn generate_id() -> String {
        format!("scn::{}", Uuid::new_v4())
    }
}

/// Adjustment of a single occurrence of a recurring definition.
///
/// Keyed by `(definition_id, original_date)` where `original_date` is the
/// undisturbed schedule date before any weekend/month-end adjustment. The
/// key never changes even when `new_date` relocates the occurrence, so
/// overrides stay stable when recurrence parameters are edited upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceOverride {
    pub definition_id: String,
    pub original_date: NaiveDate,
    pub new_date: Option<NaiveDate>,
    pub new_amount: Option<f64>,
    pub skipped: bool,
    pub notes: String,
}

impl OccurrenceOverride {
    /// An override that neither skips nor substitutes anything is rejected
    /// at construction instead of being stored inert.
    pub fn has_effect(&self) -> bool {
        self.skipped || self.new_date.is_some() || self.new_amount.is_some()
    }
}
