//! User, token and identity service traits.

use async_trait::async_trait;

use super::users_model::{
    AuthToken, AuthenticatedUser, LoginInput, LoginOutcome, NewAuthToken, NewPasswordInput,
    NewUser, RegisterInput, ResetInput, SettingsOutcome, SettingsUpdate, TokenKind, User,
    UserUpdate,
};
use crate::errors::Result;

#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_by_id(&self, user_id: &str) -> Result<Option<User>>;

    fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn create(&self, new_user: NewUser) -> Result<User>;

    /// Applies the non-`None` fields of the update.
    async fn update(&self, update: UserUpdate) -> Result<User>;

    async fn delete(&self, user_id: &str) -> Result<usize>;
}

/// Storage for single-use email tokens and two-factor confirmations.
#[async_trait]
pub trait AuthTokenRepositoryTrait: Send + Sync {
    /// Stores a token, removing any previous token of the same kind for the email.
    async fn replace(&self, new_token: NewAuthToken) -> Result<AuthToken>;

    fn find_by_token(&self, kind: TokenKind, token: &str) -> Result<Option<AuthToken>>;

    fn find_by_email(&self, kind: TokenKind, email: &str) -> Result<Option<AuthToken>>;

    async fn delete(&self, token_id: &str) -> Result<()>;

    async fn upsert_two_factor_confirmation(&self, user_id: &str) -> Result<()>;

    /// Removes the user's confirmation and reports whether one existed.
    async fn take_two_factor_confirmation(&self, user_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, input: RegisterInput) -> Result<()>;

    async fn verify_email(&self, token: &str) -> Result<()>;

    async fn login(&self, input: LoginInput) -> Result<LoginOutcome>;

    async fn request_password_reset(&self, input: ResetInput) -> Result<()>;

    async fn reset_password(&self, token: &str, input: NewPasswordInput) -> Result<()>;

    async fn update_settings(
        &self,
        user_id: &str,
        update: SettingsUpdate,
    ) -> Result<SettingsOutcome>;

    /// Resolves the identity behind a session; unknown users are unauthorized.
    fn get_authenticated_user(&self, user_id: &str) -> Result<AuthenticatedUser>;
}
