use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use fintrack_core::{
    accounts::{Account, AccountUpdate, NewAccount},
    users::AuthenticatedUser,
};

use super::shared::{BulkDeleteRequest, BulkDeleteResponse, SearchParams};
use crate::{error::ApiResult, main_lib::AppState};

async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Account>>> {
    let accounts = state
        .account_service
        .list_accounts(&user.id, params.search.as_deref())?;
    Ok(Json(accounts))
}

async fn create_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(account): Json<NewAccount>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let created = state.account_service.create_account(&user.id, account).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_account(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Account>> {
    Ok(Json(state.account_service.get_account(&user.id, &id)?))
}

async fn update_account(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(update): Json<AccountUpdate>,
) -> ApiResult<Json<Account>> {
    let updated = state
        .account_service
        .update_account(&user.id, &id, update)
        .await?;
    Ok(Json(updated))
}

async fn delete_account(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<StatusCode> {
    state.account_service.delete_account(&user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn bulk_delete_accounts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<BulkDeleteRequest>,
) -> ApiResult<Json<BulkDeleteResponse>> {
    let deleted = state
        .account_service
        .delete_accounts(&user.id, body.ids)
        .await?;
    Ok(Json(BulkDeleteResponse { deleted }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/bulk-delete", post(bulk_delete_accounts))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
}
