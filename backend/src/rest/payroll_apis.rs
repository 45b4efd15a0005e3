//! REST endpoints for payroll records.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use tracing::info;

use shared::{CreateSalaryRequest, UpdateSalaryRequest};

use super::{error_response, mappers};
use crate::AppState;

pub async fn list_salaries(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/payroll");

    match state.payroll_service.list_salaries() {
        Ok(salaries) => {
            let dtos: Vec<_> = salaries.iter().map(mappers::salary_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e, "list salaries"),
    }
}

pub async fn get_salary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/payroll/{}", id);

    match state.payroll_service.get_salary(&id) {
        Ok(salary) => (StatusCode::OK, Json(mappers::salary_to_dto(&salary))).into_response(),
        Err(e) => error_response(e, "get salary"),
    }
}

pub async fn create_salary(
    State(state): State<AppState>,
    Json(request): Json<CreateSalaryRequest>,
) -> impl IntoResponse {
    info!("POST /api/payroll - request: {:?}", request);

    let command = match mappers::create_salary_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(e, "create salary"),
    };
    match state.payroll_service.create_salary(command) {
        Ok(salary) => (StatusCode::CREATED, Json(mappers::salary_to_dto(&salary))).into_response(),
        Err(e) => error_response(e, "create salary"),
    }
}

pub async fn update_salary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSalaryRequest>,
) -> impl IntoResponse {
    info!("PUT /api/payroll/{} - request: {:?}", id, request);

    let command = match mappers::update_salary_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(e, "update salary"),
    };
    match state.payroll_service.update_salary(&id, command) {
        Ok(salary) => (StatusCode::OK, Json(mappers::salary_to_dto(&salary))).into_response(),
        Err(e) => error_response(e, "update salary"),
    }
}

pub async fn delete_salary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/payroll/{}", id);

    match state.payroll_service.delete_salary(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, "delete salary"),
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
    async fn create_salary_validates_dates() {
        let (_dir, state) = state();

        let request = CreateSalaryRequest {
            employee: "Muster".to_string(),
            amount: 6500.0,
            start_date: "2024-01-01".to_string(),
            end_date: Some("2023-12-31".to_string()),
        };
        let response = create_salary(State(state), Json(request)).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_salary_is_not_found() {
        let (_dir, state) = state();
        let response = get_salary(State(state), Path("sal::missing".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
