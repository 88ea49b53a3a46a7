//! Domain service for authentication and account access.
//!
//! Handles login, API keys and password changes, enforcing the tenant plan
//! and active-account checks the HTTP layer relies on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::UserRole;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Tenant plan is {0}")]
    TenantUnavailable(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// The authenticated principal carried by the session and request extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub tenant_id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

/// Login result containing the principal and its API key.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user: SessionUser,
    pub api_key: String,
}

/// User info DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the principal.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on a bad email/password pair,
    /// [`AuthError::AccountDisabled`] for inactive accounts and
    /// [`AuthError::TenantUnavailable`] when the tenant plan is suspended or
    /// cancelled.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Verifies an API key and returns the associated principal if valid.
    async fn verify_api_key(&self, api_key: &str) -> Result<Option<SessionUser>, AuthError>;

    /// Gets information for a specific user.
    async fn get_user_info(&self, user_id: &str) -> Result<UserInfo, AuthError>;

    /// Changes a user's password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the current password is incorrect
    /// or the new password does not meet policy.
    async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// Gets the current API key for a user.
    async fn get_api_key(&self, user_id: &str) -> Result<String, AuthError>;

    /// Regenerates the API key for a user and returns the new one.
    async fn regenerate_api_key(&self, user_id: &str) -> Result<String, AuthError>;
}
