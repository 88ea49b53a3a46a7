//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;

use crate::config::SecurityConfig;
use crate::db::{Store, User};
use crate::domain::types::UserRole;
use crate::services::auth_service::{AuthError, AuthService, LoginResult, SessionUser, UserInfo};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn session_user(user: &User) -> Result<SessionUser, AuthError> {
        let role: UserRole = user
            .role
            .parse()
            .map_err(|e: String| AuthError::Internal(e))?;

        Ok(SessionUser {
            id: user.id.clone(),
            tenant_id: user.tenant_id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role,
        })
    }

    async fn check_tenant(&self, tenant_id: &str) -> Result<(), AuthError> {
        let tenant = self
            .store
            .get_tenant(tenant_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        match tenant.plan_status.as_str() {
            "active" | "trial" => Ok(()),
            other => Err(AuthError::TenantUnavailable(other.to_string())),
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let user = self
            .store
            .verify_user_password(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        self.check_tenant(&user.tenant_id).await?;

        self.store.touch_last_login(&user.id).await?;

        Ok(LoginResult {
            user: Self::session_user(&user)?,
            api_key: user.api_key,
        })
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<SessionUser>, AuthError> {
        let Some(user) = self.store.verify_api_key(api_key).await? else {
            return Ok(None);
        };

        if !user.is_active {
            return Ok(None);
        }

        if self.check_tenant(&user.tenant_id).await.is_err() {
            return Ok(None);
        }

        Ok(Some(Self::session_user(&user)?))
    }

    async fn get_user_info(&self, user_id: &str) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let role: UserRole = user
            .role
            .parse()
            .map_err(|e: String| AuthError::Internal(e))?;

        Ok(UserInfo {
            id: user.id,
            email: user.email,
            name: user.name,
            role,
            is_active: user.is_active,
            last_login: user.last_login,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }

    async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.len() < self.security.min_password_length {
            return Err(AuthError::Validation(format!(
                "New password must be at least {} characters",
                self.security.min_password_length
            )));
        }

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // Verify current password
        let verified = self
            .store
            .verify_user_password(&user.email, current_password)
            .await?;

        if verified.is_none() {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        self.store
            .update_user_password(user_id, new_password, &self.security)
            .await?;

        Ok(())
    }

    async fn get_api_key(&self, user_id: &str) -> Result<String, AuthError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user.api_key)
    }

    async fn regenerate_api_key(&self, user_id: &str) -> Result<String, AuthError> {
        let new_api_key = self.store.regenerate_user_api_key(user_id).await?;

        Ok(new_api_key)
    }
}
