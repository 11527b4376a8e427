use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fintrack_core::constants::PREMIUM_REQUIRED_MESSAGE;
use fintrack_core::errors::{Error as CoreError, ErrorKind, FieldError};
use serde::Serialize;
use thiserror::Error;

const EXTERNAL_FAILURE_MESSAGE: &str = "An error occurred. Please try again!";
const INTERNAL_FAILURE_MESSAGE: &str = "An error occurred";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    code: u16,
    kind: ErrorKind,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    field_errors: Vec<FieldError>,
}

impl ApiError {
    fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Core(e) => e.kind(),
            ApiError::BadRequest(_) => ErrorKind::Validation,
            ApiError::Unauthorized(_) => ErrorKind::Authorization,
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            // Missing entitlements are forbidden; everything else is an
            // identity failure.
            ErrorKind::Authorization => match self {
                ApiError::Core(CoreError::Unauthorized(msg)) if msg == PREMIUM_REQUIRED_MESSAGE => {
                    StatusCode::FORBIDDEN
                }
                _ => StatusCode::UNAUTHORIZED,
            },
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::ExternalDependency => StatusCode::BAD_GATEWAY,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = match kind {
            ErrorKind::ExternalDependency => {
                tracing::warn!("External dependency failure: {}", self);
                EXTERNAL_FAILURE_MESSAGE.to_string()
            }
            ErrorKind::Internal => {
                tracing::error!("Internal error: {}", self);
                INTERNAL_FAILURE_MESSAGE.to_string()
            }
            _ => self.to_string(),
        };
        let field_errors = match &self {
            ApiError::Core(e) => e.field_errors(),
            _ => Vec::new(),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            kind,
            message,
            field_errors,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
