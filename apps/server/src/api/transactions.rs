use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use fintrack_core::{
    transactions::{
        Transaction, TransactionDetails, TransactionInput, TransactionQuery, TransactionUpdate,
    },
    users::AuthenticatedUser,
};

use super::shared::{BulkDeleteRequest, BulkDeleteResponse};
use crate::{error::ApiResult, main_lib::AppState};

/// `GET /transactions?from&to&accountId&search`
async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<TransactionQuery>,
) -> ApiResult<Json<Vec<TransactionDetails>>> {
    let transactions = state
        .transaction_service
        .list_transactions(&user.id, query)?;
    Ok(Json(transactions))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(input): Json<TransactionInput>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let created = state
        .transaction_service
        .create_transaction(&user.id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(state.transaction_service.get_transaction(&user.id, &id)?))
}

async fn update_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(update): Json<TransactionUpdate>,
) -> ApiResult<Json<Transaction>> {
    let updated = state
        .transaction_service
        .update_transaction(&user.id, &id, update)
        .await?;
    Ok(Json(updated))
}

async fn delete_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<StatusCode> {
    state
        .transaction_service
        .delete_transaction(&user.id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn bulk_delete_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<BulkDeleteRequest>,
) -> ApiResult<Json<BulkDeleteResponse>> {
    let deleted = state
        .transaction_service
        .delete_transactions(&user.id, body.ids)
        .await?;
    Ok(Json(BulkDeleteResponse { deleted }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/bulk-delete", post(bulk_delete_transactions))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}
