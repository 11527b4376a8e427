//! Users module - identity models, credential flows and traits.

mod password;
mod users_model;
mod users_service;
mod users_traits;


pub use password::{hash_password, verify_password};
pub use users_model::{
    AuthToken, AuthenticatedUser, LoginInput, LoginOutcome, NewAuthToken, NewPasswordInput,
    NewUser, RegisterInput, ResetInput, SettingsOutcome, SettingsUpdate, TokenKind, User,
    UserUpdate,
};
pub use users_service::UserService;
pub use users_traits::{AuthTokenRepositoryTrait, UserRepositoryTrait, UserServiceTrait};
