//! REST endpoints for the reporting surface.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use tracing::info;

use super::{error_response, mappers};
use crate::domain::commands::reports::{DailyBalanceQuery, ReportRangeQuery};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportRangeParams {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub include_simulations: bool,
    pub scenario_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DailyBalanceParams {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub include_simulations: bool,
    pub scenario_id: Option<String>,
    pub seed_balance: Option<f64>,
}

pub async fn monthly_report(
    State(state): State<AppState>,
    Query(params): Query<ReportRangeParams>,
) -> impl IntoResponse {
    info!("GET /api/reports/monthly - params: {:?}", params);

    let query = match range_query(&params) {
        Ok(query) => query,
        Err(e) => return error_response(e, "monthly report"),
    };
    match state.report_service.monthly_report(query) {
        Ok(summaries) => {
            let dtos: Vec<_> = summaries.iter().map(mappers::monthly_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e, "monthly report"),
    }
}

pub async fn category_report(
    State(state): State<AppState>,
    Query(params): Query<ReportRangeParams>,
) -> impl IntoResponse {
    info!("GET /api/reports/categories - params: {:?}", params);

    let query = match range_query(&params) {
        Ok(query) => query,
        Err(e) => return error_response(e, "category report"),
    };
    match state.report_service.category_report(query) {
        Ok(totals) => {
            let dtos: Vec<_> = totals.iter().map(mappers::category_total_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e, "category report"),
    }
}

pub async fn daily_balances(
    State(state): State<AppState>,
    Query(params): Query<DailyBalanceParams>,
) -> impl IntoResponse {
    info!("GET /api/reports/daily-balances - params: {:?}", params);

    let query = match daily_query(&params) {
        Ok(query) => query,
        Err(e) => return error_response(e, "daily balances"),
    };
    match state.report_service.daily_balances(query) {
        Ok(points) => {
            let dtos: Vec<_> = points.iter().map(mappers::daily_point_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e, "daily balances"),
    }
}

pub async fn runway(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/reports/runway");

    match state.report_service.runway() {
        Ok(result) => (StatusCode::OK, Json(mappers::runway_to_dto(&result))).into_response(),
        Err(e) => error_response(e, "runway"),
    }
}

fn range_query(params: &ReportRangeParams) -> anyhow::Result<ReportRangeQuery> {
    Ok(ReportRangeQuery {
        start: mappers::wire_date("start", &params.start)?,
        end: mappers::wire_date("end", &params.end)?,
        include_simulations: params.include_simulations,
        scenario_id: params.scenario_id.clone(),
    })
}

fn daily_query(params: &DailyBalanceParams) -> anyhow::Result<DailyBalanceQuery> {
    Ok(DailyBalanceQuery {
        start: mappers::wire_date("start", &params.start)?,
        end: mappers::wire_date("end", &params.end)?,
        include_simulations: params.include_simulations,
        scenario_id: params.scenario_id.clone(),
        seed_balance: params.seed_balance,
    })
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
    async fn malformed_range_is_bad_request() {
        let (_dir, state) = state();
        let params = ReportRangeParams {
            start: "not-a-date".to_string(),
            end: "2024-06-30".to_string(),
            include_simulations: false,
            scenario_id: None,
        };
        let response = monthly_report(State(state), Query(params)).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn runway_on_empty_books() {
        let (_dir, state) = state();
        let response = runway(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
