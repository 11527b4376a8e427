use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use fintrack_core::{
    summary::{Summary, SummaryQuery},
    users::AuthenticatedUser,
};

use crate::{error::ApiResult, main_lib::AppState};

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<Summary>> {
    Ok(Json(state.summary_service.get_summary(&user.id, query)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/summary", get(get_summary))
}
