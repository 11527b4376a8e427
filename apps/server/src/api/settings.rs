use std::sync::Arc;

use axum::{extract::State, routing::put, Extension, Json, Router};
use fintrack_core::users::{AuthenticatedUser, SettingsOutcome, SettingsUpdate};
use serde::Serialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum SettingsResponse {
    Updated { user: AuthenticatedUser },
    VerificationSent { message: String },
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(update): Json<SettingsUpdate>,
) -> ApiResult<Json<SettingsResponse>> {
    let response = match state.user_service.update_settings(&user.id, update).await? {
        SettingsOutcome::Updated(user) => SettingsResponse::Updated { user },
        SettingsOutcome::VerificationSent => SettingsResponse::VerificationSent {
            message: "Verification email sent".to_string(),
        },
    };
    Ok(Json(response))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/settings", put(update_settings))
}
