//! User and authentication token domain models.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH};
use crate::errors::{Error, FieldError, Result, ValidationError};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern"));

/// Domain model representing a registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub email_verified: Option<NaiveDateTime>,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub is_two_factor_enabled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    /// Users without a local password were provisioned by an external
    /// identity provider.
    pub fn is_oauth(&self) -> bool {
        self.password_hash.is_none()
    }
}

/// Input model for persisting a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: Option<String>,
}

/// Partial update of a user row. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<NaiveDateTime>,
    pub password_hash: Option<String>,
    pub is_two_factor_enabled: Option<bool>,
}

/// Identity resolved for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub is_two_factor_enabled: bool,
    #[serde(rename = "isOAuth")]
    pub is_oauth: bool,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            is_two_factor_enabled: user.is_two_factor_enabled,
            is_oauth: user.is_oauth(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterInput {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        check_password("password", &self.password, &mut errors);
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        into_result(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl LoginInput {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }
        into_result(errors)
    }
}

/// Result of a credential login attempt that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(AuthenticatedUser),
    /// The email is not verified yet; a fresh verification link was sent.
    VerificationSent,
    /// A two-factor code was emailed and must be supplied to finish login.
    TwoFactorRequired,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetInput {
    pub email: String,
}

impl ResetInput {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        into_result(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordInput {
    pub password: String,
    pub confirm_password: String,
}

impl NewPasswordInput {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        check_password("password", &self.password, &mut errors);
        check_password("confirmPassword", &self.confirm_password, &mut errors);
        if errors.is_empty() && self.password != self.confirm_password {
            errors.push(FieldError::new("confirmPassword", "Passwords do not match"));
        }
        into_result(errors)
    }
}

/// Profile settings patch submitted by the signed-in user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub new_password: Option<String>,
    pub is_two_factor_enabled: Option<bool>,
}

impl SettingsUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                errors.push(FieldError::new("name", "Name is required"));
            }
        }
        if let Some(email) = &self.email {
            check_email(email, &mut errors);
        }
        match (&self.password, &self.new_password) {
            (Some(_), None) => {
                errors.push(FieldError::new("newPassword", "New password is required!"))
            }
            (None, Some(_)) => errors.push(FieldError::new("password", "Password is required!")),
            (Some(_), Some(new_password)) => {
                check_password("newPassword", new_password, &mut errors)
            }
            (None, None) => {}
        }
        into_result(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOutcome {
    Updated(AuthenticatedUser),
    /// The email change is pending confirmation; nothing else was applied.
    VerificationSent,
}

/// Kinds of single-use tokens delivered by email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    EmailVerification,
    PasswordReset,
    TwoFactor,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::EmailVerification => "EMAIL_VERIFICATION",
            TokenKind::PasswordReset => "PASSWORD_RESET",
            TokenKind::TwoFactor => "TWO_FACTOR",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "EMAIL_VERIFICATION" => Ok(TokenKind::EmailVerification),
            "PASSWORD_RESET" => Ok(TokenKind::PasswordReset),
            "TWO_FACTOR" => Ok(TokenKind::TwoFactor),
            other => Err(Error::Unexpected(format!("Unknown token kind '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub id: String,
    pub kind: TokenKind,
    pub email: String,
    pub token: String,
    pub expires_at: NaiveDateTime,
}

impl AuthToken {
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.expires_at < now
    }
}

#[derive(Debug, Clone)]
pub struct NewAuthToken {
    pub kind: TokenKind,
    pub email: String,
    pub token: String,
    pub expires_at: NaiveDateTime,
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if !EMAIL_REGEX.is_match(email.trim()) {
        errors.push(FieldError::new("email", "Email is required"));
    }
}

fn check_password(field: &str, password: &str, errors: &mut Vec<FieldError>) {
    let length = password.chars().count();
    if length < PASSWORD_MIN_LENGTH {
        errors.push(FieldError::new(
            field,
            format!("Minimum {} characters required", PASSWORD_MIN_LENGTH),
        ));
    } else if length > PASSWORD_MAX_LENGTH {
        errors.push(FieldError::new(
            field,
            format!("Maximum {} characters allowed", PASSWORD_MAX_LENGTH),
        ));
    }
}

fn into_result(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(ValidationError::Fields(errors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_input_reports_every_invalid_field() {
        let input = RegisterInput {
            email: "not-an-email".into(),
            password: "123".into(),
            name: " ".into(),
        };
        let err = input.validate().unwrap_err();
        let fields: Vec<_> = err
            .field_errors()
            .into_iter()
            .filter_map(|f| f.field)
            .collect();
        assert_eq!(fields, vec!["email", "password", "name"]);
    }

    #[test]
    fn password_bounds_are_inclusive() {
        let ok = RegisterInput {
            email: "a@b.co".into(),
            password: "x".repeat(PASSWORD_MIN_LENGTH),
            name: "A".into(),
        };
        assert!(ok.validate().is_ok());

        let too_long = RegisterInput {
            password: "x".repeat(PASSWORD_MAX_LENGTH + 1),
            ..ok.clone()
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn new_password_must_match_confirmation() {
        let input = NewPasswordInput {
            password: "secret-1".into(),
            confirm_password: "secret-2".into(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn settings_require_both_passwords_together() {
        let only_current = SettingsUpdate {
            password: Some("current".into()),
            ..Default::default()
        };
        assert!(only_current.validate().is_err());

        let both = SettingsUpdate {
            password: Some("current".into()),
            new_password: Some("replacement".into()),
            ..Default::default()
        };
        assert!(both.validate().is_ok());
    }

    #[test]
    fn token_expiry_is_strict() {
        let now = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let token = AuthToken {
            id: "t".into(),
            kind: TokenKind::TwoFactor,
            email: "a@b.co".into(),
            token: "123456".into(),
            expires_at: now,
        };
        assert!(!token.is_expired(now));
        assert!(token.is_expired(now + chrono::Duration::seconds(1)));
    }
}
