use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::{prelude::*, users};

/// User data returned from the repository (without the password hash).
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub tenant_id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
    pub api_key: String,
    pub avatar_url: Option<String>,
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            email: model.email,
            name: model.name,
            role: model.role,
            is_active: model.is_active,
            api_key: model.api_key,
            avatar_url: model.avatar_url,
            last_login: model.last_login,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Login lookup is by email alone; emails are only guaranteed unique per
    /// tenant, so the first active match wins.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    pub async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<User>> {
        let users = Users::find()
            .filter(users::Column::TenantId.eq(tenant_id))
            .order_by_asc(users::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    pub async fn count_active_admins(&self, tenant_id: &str) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        Users::find()
            .filter(users::Column::TenantId.eq(tenant_id))
            .filter(users::Column::Role.eq("company_admin"))
            .filter(users::Column::IsActive.eq(true))
            .count(&self.conn)
            .await
            .context("Failed to count active admins")
    }

    pub async fn create(
        &self,
        tenant_id: &str,
        email: &str,
        name: &str,
        role: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<User> {
        let password = password.to_string();
        let config = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let model = users::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            tenant_id: Set(tenant_id.to_string()),
            email: Set(email.to_string()),
            name: Set(name.to_string()),
            role: Set(role.to_string()),
            is_active: Set(true),
            password_hash: Set(password_hash),
            api_key: Set(generate_api_key()),
            avatar_url: Set(None),
            last_login: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let inserted = model.insert(&self.conn).await.context("Failed to create user")?;
        Ok(User::from(inserted))
    }

    pub async fn update(
        &self,
        id: &str,
        name: &str,
        role: &str,
        is_active: bool,
    ) -> Result<Option<User>> {
        let Some(user) = Users::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();
        active.name = Set(name.to_string());
        active.role = Set(role.to_string());
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.conn).await?;
        Ok(Some(User::from(updated)))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Users::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn touch_last_login(&self, id: &str) -> Result<()> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let mut active: users::ActiveModel = user.into();
        active.last_login = Set(Some(chrono::Utc::now().to_rfc3339()));
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Verify password for a user.
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid.then(|| User::from(user)))
    }

    pub async fn update_password(
        &self,
        id: &str,
        new_password: &str,
        security: &SecurityConfig,
    ) -> Result<()> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for password update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let password = new_password.to_string();
        let config = security.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Verify API key and return the associated user
    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::ApiKey.eq(api_key))
            .one(&self.conn)
            .await
            .context("Failed to query user by API key")?;

        Ok(user.map(User::from))
    }

    pub async fn regenerate_api_key(&self, id: &str) -> Result<String> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for API key regeneration")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let new_api_key = generate_api_key();

        let mut active: users::ActiveModel = user.into();
        active.api_key = Set(new_api_key.clone());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(new_api_key)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Generate a random API key (64 character hex string)
#[must_use]
pub fn generate_api_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
