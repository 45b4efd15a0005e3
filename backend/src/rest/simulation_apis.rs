//! REST endpoints for simulation entries and scenarios.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use tracing::info;

use shared::{CreateScenarioRequest, CreateSimulationRequest, UpdateSimulationRequest};

use super::{error_response, mappers};
use crate::AppState;

pub async fn list_entries(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/simulations");

    match state.simulation_service.list_entries() {
        Ok(entries) => {
            let dtos: Vec<_> = entries.iter().map(mappers::simulation_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e, "list simulation entries"),
    }
}

pub async fn create_entry(
    State(state): State<AppState>,
    Json(request): Json<CreateSimulationRequest>,
) -> impl IntoResponse {
    info!("POST /api/simulations - request: {:?}", request);

    let command = match mappers::create_simulation_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(e, "create simulation entry"),
    };
    match state.simulation_service.create_entry(command) {
        Ok(entry) => (StatusCode::CREATED, Json(mappers::simulation_to_dto(&entry))).into_response(),
        Err(e) => error_response(e, "create simulation entry"),
    }
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSimulationRequest>,
) -> impl IntoResponse {
    info!("PUT /api/simulations/{} - request: {:?}", id, request);

    let command = match mappers::update_simulation_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(e, "update simulation entry"),
    };
    match state.simulation_service.update_entry(&id, command) {
        Ok(entry) => (StatusCode::OK, Json(mappers::simulation_to_dto(&entry))).into_response(),
        Err(e) => error_response(e, "update simulation entry"),
    }
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/simulations/{}", id);

    match state.simulation_service.delete_entry(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, "delete simulation entry"),
    }
}

pub async fn list_scenarios(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/scenarios");

    match state.simulation_service.list_scenarios() {
        Ok(scenarios) => {
            let dtos: Vec<_> = scenarios.iter().map(mappers::scenario_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e, "list scenarios"),
    }
}

pub async fn create_scenario(
    State(state): State<AppState>,
    Json(request): Json<CreateScenarioRequest>,
) -> impl IntoResponse {
    info!("POST /api/scenarios - request: {:?}", request);

    match state.simulation_service.create_scenario(request.name) {
        Ok(scenario) => {
            (StatusCode::CREATED, Json(mappers::scenario_to_dto(&scenario))).into_response()
        }
        Err(e) => error_response(e, "create scenario"),
    }
}

pub async fn delete_scenario(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/scenarios/{}", id);

    match state.simulation_service.delete_scenario(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, "delete scenario"),
    }
}
