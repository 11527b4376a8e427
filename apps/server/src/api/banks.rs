use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use fintrack_core::{
    accounts::Account,
    banking::{BankAccount, BankSyncResult, ConnectBankInput, LinkToken},
    users::AuthenticatedUser,
};

use crate::{error::ApiResult, main_lib::AppState};

async fn create_link_token(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<LinkToken>> {
    Ok(Json(state.banking_service.create_link_token(&user).await?))
}

async fn connect_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(input): Json<ConnectBankInput>,
) -> ApiResult<Json<Account>> {
    let account = state
        .banking_service
        .connect_account(&user.id, input)
        .await?;
    Ok(Json(account))
}

async fn list_bank_accounts(
    Path(account_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<BankAccount>>> {
    let accounts = state
        .banking_service
        .list_bank_accounts(&user.id, &account_id)
        .await?;
    Ok(Json(accounts))
}

async fn sync_transactions(
    Path(account_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<BankSyncResult>> {
    let result = state
        .banking_service
        .sync_transactions(&user.id, &account_id)
        .await?;
    Ok(Json(result))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/banks/link-token", post(create_link_token))
        .route("/banks/connect", post(connect_account))
        .route("/banks/accounts/{account_id}", get(list_bank_accounts))
        .route("/banks/sync/{account_id}", post(sync_transactions))
}
