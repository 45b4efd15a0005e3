//! REST endpoints for the shared account balance.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use tracing::info;

use shared::SetBalanceRequest;

use super::{error_response, mappers};
use crate::AppState;

pub async fn get_balance(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/balance");

    match state.balance_service.get_current_balance() {
        Ok(Some(balance)) => {
            (StatusCode::OK, Json(mappers::balance_to_dto(&balance))).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "No balance recorded yet").into_response(),
        Err(e) => error_response(e, "get balance"),
    }
}

/// Set the balance as of today. Last write wins.
pub async fn set_balance(
    State(state): State<AppState>,
    Json(request): Json<SetBalanceRequest>,
) -> impl IntoResponse {
    info!("PUT /api/balance - request: {:?}", request);

    let today = chrono::Local::now().date_naive();
    match state.balance_service.set_current_balance(request.balance, today) {
        Ok(balance) => (StatusCode::OK, Json(mappers::balance_to_dto(&balance))).into_response(),
        Err(e) => error_response(e, "set balance"),
    }
}

pub async fn balance_history(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/balance/history");

    match state.balance_service.list_snapshots() {
        Ok(snapshots) => {
            let dtos: Vec<_> = snapshots.iter().map(mappers::snapshot_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e, "get balance history"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::CsvConnection;

    fn state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let conn = CsvConnection::new(dir.path()).unwrap();
        (dir, AppState::new(conn))
    }

    #[tokio::test]
    async fn empty_store_is_not_found() {
        let (_dir, state) = state();
        let response = get_balance(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn set_then_get() {
        let (_dir, state) = state();
        let response = set_balance(
            State(state.clone()),
            Json(SetBalanceRequest { balance: 42_000.0 }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = get_balance(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn non_finite_balance_is_bad_request() {
        let (_dir, state) = state();
        let response = set_balance(State(state), Json(SetBalanceRequest { balance: f64::NAN }))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
