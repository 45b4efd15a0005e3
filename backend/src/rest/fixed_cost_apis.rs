//! REST endpoints for fixed costs and their occurrence overrides.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use tracing::info;

use shared::{CreateFixedCostRequest, UpdateFixedCostRequest, UpsertOverrideRequest};

use super::{error_response, mappers};
use crate::AppState;

pub async fn list_fixed_costs(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/fixed-costs");

    match state.fixed_cost_service.list_fixed_costs() {
        Ok(fixed_costs) => {
            let dtos: Vec<_> = fixed_costs.iter().map(mappers::fixed_cost_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e, "list fixed costs"),
    }
}

pub async fn get_fixed_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/fixed-costs/{}", id);

    match state.fixed_cost_service.get_fixed_cost(&id) {
        Ok(fixed_cost) => {
            (StatusCode::OK, Json(mappers::fixed_cost_to_dto(&fixed_cost))).into_response()
        }
        Err(e) => error_response(e, "get fixed cost"),
    }
}

pub async fn create_fixed_cost(
    State(state): State<AppState>,
    Json(request): Json<CreateFixedCostRequest>,
) -> impl IntoResponse {
    info!("POST /api/fixed-costs - request: {:?}", request);

    let command = match mappers::create_fixed_cost_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(e, "create fixed cost"),
    };
    match state.fixed_cost_service.create_fixed_cost(command) {
        Ok(fixed_cost) => {
            (StatusCode::CREATED, Json(mappers::fixed_cost_to_dto(&fixed_cost))).into_response()
        }
        Err(e) => error_response(e, "create fixed cost"),
    }
}

pub async fn update_fixed_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateFixedCostRequest>,
) -> impl IntoResponse {
    info!("PUT /api/fixed-costs/{} - request: {:?}", id, request);

    let command = match mappers::update_fixed_cost_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(e, "update fixed cost"),
    };
    match state.fixed_cost_service.update_fixed_cost(&id, command) {
        Ok(fixed_cost) => {
            (StatusCode::OK, Json(mappers::fixed_cost_to_dto(&fixed_cost))).into_response()
        }
        Err(e) => error_response(e, "update fixed cost"),
    }
}

pub async fn delete_fixed_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/fixed-costs/{}", id);

    match state.fixed_cost_service.delete_fixed_cost(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, "delete fixed cost"),
    }
}

pub async fn list_overrides(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/fixed-costs/{}/overrides", id);

    match state.fixed_cost_service.list_overrides(&id) {
        Ok(overrides) => {
            let dtos: Vec<_> = overrides.iter().map(mappers::override_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e, "list overrides"),
    }
}

pub async fn upsert_override(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpsertOverrideRequest>,
) -> impl IntoResponse {
    info!("PUT /api/fixed-costs/{}/overrides - request: {:?}", id, request);

    let command = match mappers::upsert_override_command(id, request) {
        Ok(command) => command,
        Err(e) => return error_response(e, "upsert override"),
    };
    match state.fixed_cost_service.upsert_override(command) {
        Ok(ov) => (StatusCode::OK, Json(mappers::override_to_dto(&ov))).into_response(),
        Err(e) => error_response(e, "upsert override"),
    }
}

pub async fn delete_override(
    State(state): State<AppState>,
    Path((id, date)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/fixed-costs/{}/overrides/{}", id, date);

    let original_date = match mappers::wire_date("original_date", &date) {
        Ok(date) => date,
        Err(e) => return error_response(e, "delete override"),
    };
    match state.fixed_cost_service.delete_override(&id, original_date) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, "delete override"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::CsvConnection;
    use shared::{Direction, Rhythm};

    fn state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let conn = CsvConnection::new(dir.path()).unwrap();
        (dir, AppState::new(conn))
    }

    fn create_request() -> CreateFixedCostRequest {
        CreateFixedCostRequest {
            label: "Miete".to_string(),
            amount: 1200.0,
            direction: Direction::Outgoing,
            anchor_date: "2024-01-31".to_string(),
            end_date: None,
            rhythm: Rhythm::Monthly,
        }
    }

    #[tokio::test]
    async fn create_and_delete_lifecycle() {
        let (_dir, state) = state();

        let response = create_fixed_cost(State(state.clone()), Json(create_request()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = state.fixed_cost_service.list_fixed_costs().unwrap();
        let id = created[0].id.clone();

        let response = delete_fixed_cost(State(state.clone()), Path(id.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = delete_fixed_cost(State(state), Path(id)).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn inert_override_is_bad_request() {
        let (_dir, state) = state();
        let fc = state
            .fixed_cost_service
            .create_fixed_cost(mappers::create_fixed_cost_command(create_request()).unwrap())
            .unwrap();

        let request = UpsertOverrideRequest {
            original_date: "2024-02-29".to_string(),
            new_date: None,
            new_amount: None,
            skipped: false,
            notes: String::new(),
        };
        let response = upsert_override(State(state), Path(fc.id), Json(request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
