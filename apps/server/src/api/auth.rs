//! Credential flows: registration, email verification, login with optional
//! two-factor codes, and password reset.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use fintrack_core::users::{
    AuthenticatedUser, LoginInput, LoginOutcome, NewPasswordInput, RegisterInput, ResetInput,
};
use serde::{Deserialize, Serialize};

use super::shared::MessageResponse;
use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Serialize)]
#[serde(
    tag = "status",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum LoginResponse {
    Authenticated {
        access_token: String,
        token_type: String,
        expires_in: u64,
        user: AuthenticatedUser,
    },
    VerificationSent {
        message: String,
    },
    TwoFactorRequired,
}

#[derive(Debug, Deserialize)]
struct VerifyRequest {
    token: String,
}

#[derive(Debug, Deserialize)]
struct NewPasswordRequest {
    #[serde(default)]
    token: String,
    #[serde(flatten)]
    input: NewPasswordInput,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(input): Json<RegisterInput>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    state.user_service.register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Confirmation email sent!")),
    ))
}

async fn verify_email(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.user_service.verify_email(body.token.trim()).await?;
    Ok(Json(MessageResponse::new("Email verified!")))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(input): Json<LoginInput>,
) -> ApiResult<Json<LoginResponse>> {
    let response = match state.user_service.login(input).await? {
        LoginOutcome::Authenticated(user) => {
            let access_token = state.jwt.issue_token(&user.id)?;
            LoginResponse::Authenticated {
                access_token,
                token_type: "Bearer".to_string(),
                expires_in: state.jwt.expires_in().as_secs(),
                user,
            }
        }
        LoginOutcome::VerificationSent => LoginResponse::VerificationSent {
            message: "Confirmation email sent!".to_string(),
        },
        LoginOutcome::TwoFactorRequired => LoginResponse::TwoFactorRequired,
    };
    Ok(Json(response))
}

async fn request_reset(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ResetInput>,
) -> ApiResult<Json<MessageResponse>> {
    state.user_service.request_password_reset(input).await?;
    Ok(Json(MessageResponse::new("Reset email sent!")))
}

async fn new_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .user_service
        .reset_password(&body.token, body.input)
        .await?;
    Ok(Json(MessageResponse::new("Password updated!")))
}

async fn me(Extension(user): Extension<AuthenticatedUser>) -> Json<AuthenticatedUser> {
    Json(user)
}

/// Routes reachable without a session.
pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/verify", post(verify_email))
        .route("/auth/reset", post(request_reset))
        .route("/auth/new-password", post(new_password))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(me))
}
