//! Shared DTOs exchanged between the cashflow-planner backend and its clients.
//!
//! All dates on the wire are plain calendar dates in `YYYY-MM-DD` form; the
//! backend owns parsing and validation. Amounts are CHF values as floats,
//! always the unsigned magnitude plus an explicit [`Direction`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a wire date (`YYYY-MM-DD`). Returns `None` for anything else.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Format a date for the wire.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whether money flows into or out of the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// Category tag attached to every normalized transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Regular persisted transaction without any special origin.
    Standard,
    /// Expanded from a fixed-cost definition.
    Fixkosten,
    /// Expanded from a payroll record.
    Lohn,
    /// Expanded from a simulation entry (or a one-off flagged as such).
    Simulation,
    /// Persisted transaction that was edited after import.
    Manual,
}

/// Recurrence rhythm of a fixed cost or recurring simulation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rhythm {
    Monthly,
    Quarterly,
    Semiannual,
    Annual,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// A persisted one-off transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDto {
    pub id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub details: String,
    /// Unsigned magnitude in CHF.
    pub amount: f64,
    pub direction: Direction,
    pub category: Category,
    /// True once the record was edited after creation/import.
    pub modified: bool,
    /// True for directly-entered what-if records.
    pub is_simulation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub date: String,
    pub details: String,
    pub amount: f64,
    pub direction: Direction,
    /// Optional explicit category (e.g. carried over from an import).
    pub category: Option<Category>,
    #[serde(default)]
    pub is_simulation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    pub date: Option<String>,
    pub details: Option<String>,
    pub amount: Option<f64>,
    pub direction: Option<Direction>,
}

/// One already-parsed row handed over by an import collaborator.
/// The backend does no HTML/Excel parsing itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    pub date: String,
    pub details: String,
    pub amount: f64,
    pub direction: Direction,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportTransactionsRequest {
    pub rows: Vec<ImportRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportTransactionsResponse {
    pub imported_count: usize,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteTransactionsRequest {
    pub transaction_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteTransactionsResponse {
    pub deleted_count: usize,
    pub not_found_ids: Vec<String>,
}

/// A pipeline transaction annotated for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancedTransactionDto {
    pub date: String,
    pub details: String,
    pub amount: f64,
    pub signed_amount: f64,
    pub direction: Direction,
    pub category: Category,
    /// Projected account balance after this transaction.
    /// Absent for historical transactions (never reconstructed).
    pub running_balance: Option<f64>,
    /// True when the payment date was moved off a weekend or clamped
    /// to the end of a short month.
    pub was_date_shifted: bool,
    /// True for transactions after the evaluation date.
    pub projected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResponse {
    pub transactions: Vec<BalancedTransactionDto>,
    /// Balance the future fold was seeded with.
    pub starting_balance: f64,
}

// ---------------------------------------------------------------------------
// Fixed costs & occurrence overrides
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCostDto {
    pub id: String,
    pub label: String,
    pub amount: f64,
    pub direction: Direction,
    pub anchor_date: String,
    pub end_date: Option<String>,
    pub rhythm: Rhythm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFixedCostRequest {
    pub label: String,
    pub amount: f64,
    pub direction: Direction,
    pub anchor_date: String,
    pub end_date: Option<String>,
    pub rhythm: Rhythm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateFixedCostRequest {
    pub label: Option<String>,
    pub amount: Option<f64>,
    pub anchor_date: Option<String>,
    /// Setting an end date soft-ends the definition while keeping history.
    pub end_date: Option<String>,
    pub rhythm: Option<Rhythm>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideDto {
    pub definition_id: String,
    /// The undisturbed schedule date this override addresses.
    pub original_date: String,
    pub new_date: Option<String>,
    pub new_amount: Option<f64>,
    pub skipped: bool,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertOverrideRequest {
    pub original_date: String,
    pub new_date: Option<String>,
    pub new_amount: Option<f64>,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default)]
    pub notes: String,
}

// ---------------------------------------------------------------------------
// Payroll
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryDto {
    pub id: String,
    pub employee: String,
    /// Monthly gross salary in CHF, paid on the 25th.
    pub amount: f64,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSalaryRequest {
    pub employee: String,
    pub amount: f64,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSalaryRequest {
    pub employee: Option<String>,
    pub amount: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Simulations & scenarios
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEntryDto {
    pub id: String,
    pub label: String,
    pub amount: f64,
    pub direction: Direction,
    pub anchor_date: String,
    pub end_date: Option<String>,
    /// Absent for one-off entries.
    pub rhythm: Option<Rhythm>,
    pub scenario_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSimulationRequest {
    pub label: String,
    pub amount: f64,
    pub direction: Direction,
    pub anchor_date: String,
    pub end_date: Option<String>,
    pub rhythm: Option<Rhythm>,
    pub scenario_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSimulationRequest {
    pub label: Option<String>,
    pub amount: Option<f64>,
    pub anchor_date: Option<String>,
    pub end_date: Option<String>,
    pub rhythm: Option<Rhythm>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDto {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateScenarioRequest {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Balance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentBalanceDto {
    pub balance: f64,
    pub effective_date: String,
    /// RFC 3339 instant of the last write.
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetBalanceRequest {
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshotDto {
    pub day: String,
    pub balance: f64,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummaryDto {
    /// `YYYY-MM`.
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotalDto {
    pub category: Category,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBalanceDto {
    pub date: String,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayDto {
    pub current_balance: f64,
    pub monthly_burn_rate: f64,
    /// `None` when the burn rate is zero or negative (unbounded runway).
    pub months_of_runway: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_roundtrip() {
        let date = parse_date("2024-01-31").unwrap();
        assert_eq!(format_date(date), "2024-01-31");
        assert!(parse_date("31.01.2024").is_none());
        assert!(parse_date("2024-02-30").is_none());
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&Direction::Incoming).unwrap(),
            "\"incoming\""
        );
        assert_eq!(
            serde_json::to_string(&Category::Fixkosten).unwrap(),
            "\"fixkosten\""
        );
        assert_eq!(
            serde_json::to_string(&Rhythm::Semiannual).unwrap(),
            "\"semiannual\""
        );
    }
}
