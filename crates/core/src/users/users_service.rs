use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use log::{debug, warn};
use rand::Rng;

use super::password::{hash_password, verify_password};
use super::users_model::{
    AuthToken, AuthenticatedUser, LoginInput, LoginOutcome, NewAuthToken, NewPasswordInput,
    NewUser, RegisterInput, ResetInput, SettingsOutcome, SettingsUpdate, TokenKind, UserUpdate,
};
use super::users_traits::{AuthTokenRepositoryTrait, UserRepositoryTrait, UserServiceTrait};
use crate::constants::{EMAIL_TOKEN_TTL_MINUTES, TWO_FACTOR_TOKEN_TTL_MINUTES};
use crate::errors::{Error, FieldError, Result, ValidationError};
use crate::notifications::{
    password_reset_email, two_factor_email, verification_email, EmailMessage, EmailSenderTrait,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password!";

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn field_error(field: &str, message: &str) -> Error {
    Error::Validation(ValidationError::Fields(vec![FieldError::new(field, message)]))
}

/// Registration, login and account self-service flows.
pub struct UserService {
    user_repository: Arc<dyn UserRepositoryTrait>,
    token_repository: Arc<dyn AuthTokenRepositoryTrait>,
    email_sender: Arc<dyn EmailSenderTrait>,
    frontend_url: String,
}

impl UserService {
    pub fn new(
        user_repository: Arc<dyn UserRepositoryTrait>,
        token_repository: Arc<dyn AuthTokenRepositoryTrait>,
        email_sender: Arc<dyn EmailSenderTrait>,
        frontend_url: String,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            email_sender,
            frontend_url,
        }
    }

    async fn issue_token(&self, kind: TokenKind, email: &str) -> Result<AuthToken> {
        let (token, ttl) = match kind {
            TokenKind::TwoFactor => (
                rand::thread_rng().gen_range(100_000..1_000_000).to_string(),
                Duration::minutes(TWO_FACTOR_TOKEN_TTL_MINUTES),
            ),
            TokenKind::EmailVerification | TokenKind::PasswordReset => (
                uuid::Uuid::new_v4().to_string(),
                Duration::minutes(EMAIL_TOKEN_TTL_MINUTES),
            ),
        };
        self.token_repository
            .replace(NewAuthToken {
                kind,
                email: email.to_string(),
                token,
                expires_at: now() + ttl,
            })
            .await
    }

    async fn send_verification(&self, email: &str) -> Result<()> {
        let token = self.issue_token(TokenKind::EmailVerification, email).await?;
        self.send(verification_email(&self.frontend_url, email, &token.token))
            .await
    }

    async fn send(&self, message: EmailMessage) -> Result<()> {
        debug!("Sending '{}' email to {}", message.subject, message.to);
        self.email_sender.send(message).await
    }

    /// Looks up a live token of the given kind.
    fn live_token(&self, kind: TokenKind, token: &str) -> Result<AuthToken> {
        let found = self
            .token_repository
            .find_by_token(kind, token)?
            .ok_or_else(|| Error::invalid("Invalid token!"))?;
        if found.is_expired(now()) {
            return Err(Error::invalid("Token has expired!"));
        }
        Ok(found)
    }

    async fn confirm_two_factor(&self, user_id: &str, email: &str, code: &str) -> Result<()> {
        let token = self
            .token_repository
            .find_by_email(TokenKind::TwoFactor, email)?
            .ok_or_else(|| field_error("code", "Invalid code!"))?;
        if token.token != code {
            return Err(field_error("code", "Invalid code!"));
        }
        if token.is_expired(now()) {
            return Err(field_error("code", "Code expired!"));
        }
        self.token_repository.delete(&token.id).await?;
        self.token_repository
            .upsert_two_factor_confirmation(user_id)
            .await
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, input: RegisterInput) -> Result<()> {
        input.validate()?;
        let email = input.email.trim().to_string();

        if self.user_repository.get_by_email(&email)?.is_some() {
            return Err(Error::Conflict("Email already in use".to_string()));
        }

        let user = self
            .user_repository
            .create(NewUser {
                name: Some(input.name.trim().to_string()),
                email: email.clone(),
                password_hash: Some(hash_password(&input.password)?),
            })
            .await?;

        if let Err(err) = self.send_verification(&email).await {
            warn!("Verification email for new user {} failed: {}", user.id, err);
            self.user_repository.delete(&user.id).await?;
            return Err(Error::ExternalService(
                "An error occurred. Please try again!".to_string(),
            ));
        }
        Ok(())
    }

    async fn verify_email(&self, token: &str) -> Result<()> {
        let token = self.live_token(TokenKind::EmailVerification, token)?;

        // The token email may differ from the account email during an email change.
        let user = match self.user_repository.get_by_email(&token.email)? {
            Some(user) => user,
            None => return Err(Error::NotFound("Email does not exist!".to_string())),
        };

        self.user_repository
            .update(UserUpdate {
                id: user.id,
                email: Some(token.email.clone()),
                email_verified: Some(now()),
                ..Default::default()
            })
            .await?;
        self.token_repository.delete(&token.id).await
    }

    async fn login(&self, input: LoginInput) -> Result<LoginOutcome> {
        input.validate()?;

        let user = self
            .user_repository
            .get_by_email(input.email.trim())?
            .ok_or_else(|| Error::Unauthorized(INVALID_CREDENTIALS.to_string()))?;
        let hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| Error::Unauthorized(INVALID_CREDENTIALS.to_string()))?;
        if !verify_password(&input.password, hash)? {
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if user.email_verified.is_none() {
            self.send_verification(&user.email).await?;
            return Ok(LoginOutcome::VerificationSent);
        }

        if user.is_two_factor_enabled {
            let code = input
                .code
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty());
            match code {
                Some(code) => self.confirm_two_factor(&user.id, &user.email, code).await?,
                None => {
                    let token = self.issue_token(TokenKind::TwoFactor, &user.email).await?;
                    self.send(two_factor_email(&user.email, &token.token))
                        .await?;
                    return Ok(LoginOutcome::TwoFactorRequired);
                }
            }

            if !self
                .token_repository
                .take_two_factor_confirmation(&user.id)
                .await?
            {
                return Err(Error::Unauthorized(
                    "Two-factor confirmation is missing".to_string(),
                ));
            }
        }

        Ok(LoginOutcome::Authenticated(AuthenticatedUser::from(&user)))
    }

    async fn request_password_reset(&self, input: ResetInput) -> Result<()> {
        input.validate()?;
        let user = self
            .user_repository
            .get_by_email(input.email.trim())?
            .ok_or_else(|| Error::NotFound("Email not found!".to_string()))?;
        if user.is_oauth() {
            return Err(Error::invalid("Please use provider login"));
        }

        let token = self
            .issue_token(TokenKind::PasswordReset, &user.email)
            .await?;
        self.send(password_reset_email(
            &self.frontend_url,
            &user.email,
            &token.token,
        ))
        .await
    }

    async fn reset_password(&self, token: &str, input: NewPasswordInput) -> Result<()> {
        if token.trim().is_empty() {
            return Err(Error::invalid("Missing token!"));
        }
        input.validate()?;
        let token = self.live_token(TokenKind::PasswordReset, token.trim())?;

        let user = self
            .user_repository
            .get_by_email(&token.email)?
            .ok_or_else(|| Error::NotFound("Email does not exist!".to_string()))?;

        self.user_repository
            .update(UserUpdate {
                id: user.id,
                password_hash: Some(hash_password(&input.password)?),
                ..Default::default()
            })
            .await?;
        self.token_repository.delete(&token.id).await
    }

    async fn update_settings(
        &self,
        user_id: &str,
        mut update: SettingsUpdate,
    ) -> Result<SettingsOutcome> {
        update.validate()?;
        let user = self
            .user_repository
            .get_by_id(user_id)?
            .ok_or_else(|| Error::Unauthorized("Unauthorized".to_string()))?;

        if user.is_oauth() {
            update.email = None;
            update.password = None;
            update.new_password = None;
            update.is_two_factor_enabled = None;
        }

        if let Some(email) = update.email.as_deref().map(str::trim) {
            if email != user.email {
                if let Some(existing) = self.user_repository.get_by_email(email)? {
                    if existing.id != user.id {
                        return Err(Error::Conflict("Email already in use!".to_string()));
                    }
                }
                self.send_verification(email).await?;
                return Ok(SettingsOutcome::VerificationSent);
            }
        }

        let mut password_hash = None;
        if let (Some(current), Some(new_password)) = (&update.password, &update.new_password) {
            let stored = user.password_hash.as_deref().unwrap_or_default();
            if !verify_password(current, stored)? {
                return Err(field_error("password", "Incorrect password!"));
            }
            password_hash = Some(hash_password(new_password)?);
        }

        let updated = self
            .user_repository
            .update(UserUpdate {
                id: user.id.clone(),
                name: update.name.map(|n| n.trim().to_string()),
                password_hash,
                is_two_factor_enabled: update.is_two_factor_enabled,
                ..Default::default()
            })
            .await?;
        Ok(SettingsOutcome::Updated(AuthenticatedUser::from(&updated)))
    }

    fn get_authenticated_user(&self, user_id: &str) -> Result<AuthenticatedUser> {
        self.user_repository
            .get_by_id(user_id)?
            .map(|user| AuthenticatedUser::from(&user))
            .ok_or_else(|| Error::Unauthorized("Unauthorized".to_string()))
    }
}
