use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use fintrack_core::{
    premium::{PaymentConfirmation, PaymentOrder, Premium, PremiumStatus},
    users::AuthenticatedUser,
};

use crate::{error::ApiResult, main_lib::AppState};

async fn get_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<PremiumStatus>> {
    Ok(Json(state.premium_service.status(&user.id)?))
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<PaymentOrder>> {
    Ok(Json(state.premium_service.create_order(&user).await?))
}

async fn confirm_payment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(confirmation): Json<PaymentConfirmation>,
) -> ApiResult<Json<Premium>> {
    let premium = state
        .premium_service
        .confirm_payment(&user.id, confirmation)
        .await?;
    Ok(Json(premium))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/premium", get(get_status))
        .route("/premium/order", post(create_order))
        .route("/premium/confirm", post(confirm_payment))
}
