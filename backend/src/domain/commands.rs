//! Domain-level command and query types.
//!
//! These structs are used by services inside the domain layer and are not
//! exposed over the public API; the REST layer maps the DTOs from the
//! `shared` crate to these internal types.

pub mod transactions {
    use chrono::NaiveDate;
    use shared::{Category, Direction};

    use crate::domain::models::transaction::BalancedTransaction;

    #[derive(Debug, Clone)]
    pub struct CreateTransactionCommand {
        pub date: NaiveDate,
        pub details: String,
        pub amount: f64,
        pub direction: Direction,
        pub category: Option<Category>,
        pub is_simulation: bool,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateTransactionCommand {
        pub date: Option<NaiveDate>,
        pub details: Option<String>,
        pub amount: Option<f64>,
        pub direction: Option<Direction>,
    }

    /// One already-parsed row from an import collaborator.
    #[derive(Debug, Clone)]
    pub struct ImportRowCommand {
        pub date: NaiveDate,
        pub details: String,
        pub amount: f64,
        pub direction: Direction,
        pub category: Option<Category>,
    }

    #[derive(Debug, Clone)]
    pub struct ImportTransactionsResult {
        pub imported_count: usize,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteTransactionsResult {
        pub deleted_count: usize,
        pub not_found_ids: Vec<String>,
    }

    /// Window and scope of a cashflow projection.
    #[derive(Debug, Clone)]
    pub struct ProjectionQuery {
        pub start: NaiveDate,
        pub end: NaiveDate,
        pub include_simulations: bool,
        pub scenario_id: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct ProjectionResult {
        pub transactions: Vec<BalancedTransaction>,
        pub starting_balance: f64,
    }
}

pub mod fixed_costs {
    use chrono::NaiveDate;
    use shared::{Direction, Rhythm};

    #[derive(Debug, Clone)]
    pub struct CreateFixedCostCommand {
        pub label: String,
        pub amount: f64,
        pub direction: Direction,
        pub anchor_date: NaiveDate,
        pub end_date: Option<NaiveDate>,
        pub rhythm: Rhythm,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateFixedCostCommand {
        pub label: Option<String>,
        pub amount: Option<f64>,
        pub anchor_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub rhythm: Option<Rhythm>,
    }

    #[derive(Debug, Clone)]
    pub struct UpsertOverrideCommand {
        pub definition_id: String,
        pub original_date: NaiveDate,
        pub new_date: Option<NaiveDate>,
        pub new_amount: Option<f64>,
        pub skipped: bool,
        pub notes: String,
    }
}

pub mod payroll {
    use chrono::NaiveDate;

    #[derive(Debug, Clone)]
    pub struct CreateSalaryCommand {
        pub employee: String,
        pub amount: f64,
        pub start_date: NaiveDate,
        pub end_date: Option<NaiveDate>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateSalaryCommand {
        pub employee: Option<String>,
        pub amount: Option<f64>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
    }
}

pub mod simulations {
    use chrono::NaiveDate;
    use shared::{Direction, Rhythm};

    #[derive(Debug, Clone)]
    pub struct CreateSimulationCommand {
        pub label: String,
        pub amount: f64,
        pub direction: Direction,
        pub anchor_date: NaiveDate,
        pub end_date: Option<NaiveDate>,
        pub rhythm: Option<Rhythm>,
        pub scenario_id: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateSimulationCommand {
        pub label: Option<String>,
        pub amount: Option<f64>,
        pub anchor_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub rhythm: Option<Rhythm>,
    }
}

pub mod reports {
    use chrono::NaiveDate;

    #[derive(Debug, Clone)]
    pub struct ReportRangeQuery {
        pub start: NaiveDate,
        pub end: NaiveDate,
        pub include_simulations: bool,
        pub scenario_id: Option<String>,
    }

    /// Daily balance chart query; `seed_balance` reseeds the fold for
    /// what-if views instead of the stored current balance.
    #[derive(Debug, Clone)]
    pub struct DailyBalanceQuery {
        pub start: NaiveDate,
        pub end: NaiveDate,
        pub include_simulations: bool,
        pub scenario_id: Option<String>,
        pub seed_balance: Option<f64>,
    }

    #[derive(Debug, Clone)]
    pub struct RunwayResult {
        pub current_balance: f64,
        pub monthly_burn_rate: f64,
        pub months_of_runway: f64,
    }
}
