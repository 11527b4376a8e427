//! Core error types for the Fintrack application.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer,
//! and the HTTP layer renders them through [`Error::kind`] and
//! [`Error::field_errors`].

use chrono::ParseError as ChronoParseError;
use serde::Serialize;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the application.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The caller is not allowed to perform the operation (unauthenticated,
    /// bad credentials or a missing entitlement).
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// A collaborator outside this process (bank aggregator, payment
    /// gateway, mailer, OCR) failed or is not configured.
    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Database-agnostic error type for storage operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| match &e.field {
            Some(field) => format!("{}: {}", field, e.message),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Failed to parse date: {0}")]
    DateTimeParse(#[from] ChronoParseError),

    #[error("Failed to parse decimal: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("{}", join_field_errors(.0))]
    Fields(Vec<FieldError>),
}

/// Discriminant shared by every failure the application reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Authorization,
    Validation,
    NotFound,
    ExternalDependency,
    Conflict,
    Internal,
}

impl Error {
    /// Shorthand for an `InvalidInput` validation error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::Validation(ValidationError::InvalidInput(message.into()))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Unauthorized(_) => ErrorKind::Authorization,
            Error::NotFound(_) | Error::Database(DatabaseError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Error::Conflict(_) | Error::Database(DatabaseError::UniqueViolation(_)) => {
                ErrorKind::Conflict
            }
            Error::ExternalService(_) => ErrorKind::ExternalDependency,
            Error::Database(_) | Error::Unexpected(_) => ErrorKind::Internal,
        }
    }

    /// Field-level messages carried by validation failures.
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            Error::Validation(ValidationError::Fields(errors)) => errors.clone(),
            Error::Validation(ValidationError::MissingField(field)) => {
                vec![FieldError::new(field.clone(), "Required")]
            }
            Error::Validation(other) => vec![FieldError {
                field: None,
                message: other.to_string(),
            }],
            _ => Vec::new(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

impl From<Error> for String {
    fn from(error: Error) -> Self {
        error.to_string()
    }
}
