//! REST endpoints for transactions and the cashflow projection.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use tracing::info;

use shared::{
    CreateTransactionRequest, DeleteTransactionsRequest, DeleteTransactionsResponse,
    ImportTransactionsRequest, ImportTransactionsResponse, ProjectionResponse,
    UpdateTransactionRequest,
};

use super::{error_response, mappers};
use crate::domain::commands::transactions::ProjectionQuery;
use crate::AppState;

pub async fn list_transactions(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/transactions");

    match state.transaction_service.list_transactions() {
        Ok(transactions) => {
            let dtos: Vec<_> = transactions.iter().map(mappers::transaction_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e, "list transactions"),
    }
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/transactions/{}", id);

    match state.transaction_service.get_transaction(&id) {
        Ok(transaction) => {
            (StatusCode::OK, Json(mappers::transaction_to_dto(&transaction))).into_response()
        }
        Err(e) => error_response(e, "get transaction"),
    }
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transactions - request: {:?}", request);

    let command = match mappers::create_transaction_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(e, "create transaction"),
    };
    match state.transaction_service.create_transaction(command) {
        Ok(transaction) => {
            (StatusCode::CREATED, Json(mappers::transaction_to_dto(&transaction))).into_response()
        }
        Err(e) => error_response(e, "create transaction"),
    }
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    info!("PUT /api/transactions/{} - request: {:?}", id, request);

    let command = match mappers::update_transaction_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(e, "update transaction"),
    };
    match state.transaction_service.update_transaction(&id, command) {
        Ok(transaction) => {
            (StatusCode::OK, Json(mappers::transaction_to_dto(&transaction))).into_response()
        }
        Err(e) => error_response(e, "update transaction"),
    }
}

pub async fn delete_transactions(
    State(state): State<AppState>,
    Json(request): Json<DeleteTransactionsRequest>,
) -> impl IntoResponse {
    info!(
        "DELETE /api/transactions - {} ids",
        request.transaction_ids.len()
    );

    match state.transaction_service.delete_transactions(&request.transaction_ids) {
        Ok(result) => (
            StatusCode::OK,
            Json(DeleteTransactionsResponse {
                deleted_count: result.deleted_count,
                not_found_ids: result.not_found_ids,
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "delete transactions"),
    }
}

pub async fn import_transactions(
    State(state): State<AppState>,
    Json(request): Json<ImportTransactionsRequest>,
) -> impl IntoResponse {
    info!("POST /api/transactions/import - {} rows", request.rows.len());

    let rows: Result<Vec<_>, _> = request.rows.into_iter().map(mappers::import_row_command).collect();
    let rows = match rows {
        Ok(rows) => rows,
        Err(e) => return error_response(e, "import transactions"),
    };
    match state.transaction_service.import_transactions(rows) {
        Ok(result) => (
            StatusCode::CREATED,
            Json(ImportTransactionsResponse {
                imported_count: result.imported_count,
                success_message: result.success_message,
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "import transactions"),
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectionParams {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub include_simulations: bool,
    pub scenario_id: Option<String>,
}

pub async fn project_cashflow(
    State(state): State<AppState>,
    Query(params): Query<ProjectionParams>,
) -> impl IntoResponse {
    info!("GET /api/transactions/projection - params: {:?}", params);

    let query = match projection_query(&params) {
        Ok(query) => query,
        Err(e) => return error_response(e, "project cashflow"),
    };
    match state.transaction_service.project_cashflow(query) {
        Ok(result) => (
            StatusCode::OK,
            Json(ProjectionResponse {
                transactions: result.transactions.iter().map(mappers::balanced_to_dto).collect(),
                starting_balance: result.starting_balance,
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "project cashflow"),
    }
}

fn projection_query(params: &ProjectionParams) -> anyhow::Result<ProjectionQuery> {
    Ok(ProjectionQuery {
        start: mappers::wire_date("start", &params.start)?,
        end: mappers::wire_date("end", &params.end)?,
        include_simulations: params.include_simulations,
        scenario_id: params.scenario_id.clone(),
    })
}
