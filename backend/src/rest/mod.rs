//! REST interface.
//!
//! Pure translation layer: handlers map wire DTOs to domain commands, call
//! one service, and translate the outcome back. Domain errors carry their
//! status through [`error_response`]; everything else is a 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::Router;
use tracing::error;

use crate::domain::errors::DomainError;
use crate::AppState;

pub mod balance_apis;
pub mod fixed_cost_apis;
pub mod mappers;
pub mod payroll_apis;
pub mod report_apis;
pub mod simulation_apis;
pub mod transaction_apis;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/transactions",
            get(transaction_apis::list_transactions)
                .post(transaction_apis::create_transaction)
                .delete(transaction_apis::delete_transactions),
        )
        .route("/api/transactions/import", post(transaction_apis::import_transactions))
        .route("/api/transactions/projection", get(transaction_apis::project_cashflow))
        .route(
            "/api/transactions/:id",
            get(transaction_apis::get_transaction).put(transaction_apis::update_transaction),
        )
        .route(
            "/api/fixed-costs",
            get(fixed_cost_apis::list_fixed_costs).post(fixed_cost_apis::create_fixed_cost),
        )
        .route(
            "/api/fixed-costs/:id",
            get(fixed_cost_apis::get_fixed_cost)
                .put(fixed_cost_apis::update_fixed_cost)
                .delete(fixed_cost_apis::delete_fixed_cost),
        )
        .route(
            "/api/fixed-costs/:id/overrides",
            get(fixed_cost_apis::list_overrides).put(fixed_cost_apis::upsert_override),
        )
        .route(
            "/api/fixed-costs/:id/overrides/:date",
            delete(fixed_cost_apis::delete_override),
        )
        .route(
            "/api/payroll",
            get(payroll_apis::list_salaries).post(payroll_apis::create_salary),
        )
        .route(
            "/api/payroll/:id",
            get(payroll_apis::get_salary)
                .put(payroll_apis::update_salary)
                .delete(payroll_apis::delete_salary),
        )
        .route(
            "/api/simulations",
            get(simulation_apis::list_entries).post(simulation_apis::create_entry),
        )
        .route(
            "/api/simulations/:id",
            put(simulation_apis::update_entry).delete(simulation_apis::delete_entry),
        )
        .route(
            "/api/scenarios",
            get(simulation_apis::list_scenarios).post(simulation_apis::create_scenario),
        )
        .route("/api/scenarios/:id", delete(simulation_apis::delete_scenario))
        .route(
            "/api/balance",
            get(balance_apis::get_balance).put(balance_apis::set_balance),
        )
        .route("/api/balance/history", get(balance_apis::balance_history))
        .route("/api/reports/monthly", get(report_apis::monthly_report))
        .route("/api/reports/categories", get(report_apis::category_report))
        .route("/api/reports/daily-balances", get(report_apis::daily_balances))
        .route("/api/reports/runway", get(report_apis::runway))
        .with_state(state)
}

/// Map a service error to a response. [`DomainError`] variants carry their
/// own status; anything else logs and turns into a blanket 500.
pub fn error_response(err: anyhow::Error, context: &str) -> Response {
    match err.downcast_ref::<DomainError>() {
        Some(DomainError::Validation(message)) => {
            (StatusCode::BAD_REQUEST, message.clone()).into_response()
        }
        Some(DomainError::NotFound { .. }) => {
            (StatusCode::NOT_FOUND, err.to_string()).into_response()
        }
        Some(DomainError::Constraint(message)) => {
            (StatusCode::CONFLICT, message.clone()).into_response()
        }
        None => {
            error!("Failed to {}: {:#}", context, err);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", context)).into_response()
        }
    }
}
