use anyhow::Result;
use tokio::sync::broadcast;

use crate::config::SecurityConfig;
use crate::db::{Store, User, parse_settings};
use crate::domain::events::DomainEvent;
use crate::domain::types::{TenantSettings, UserRole};
use crate::entities::tenants;

/// Tenant profile together with its decoded settings blob.
#[derive(Debug, Clone)]
pub struct TenantProfile {
    pub tenant: tenants::Model,
    pub settings: TenantSettings,
}

/// Tenant configuration and user administration.
pub struct TenantService {
    store: Store,
    security: SecurityConfig,
    event_bus: broadcast::Sender<DomainEvent>,
}

impl TenantService {
    #[must_use]
    pub const fn new(
        store: Store,
        security: SecurityConfig,
        event_bus: broadcast::Sender<DomainEvent>,
    ) -> Self {
        Self {
            store,
            security,
            event_bus,
        }
    }

    pub async fn get_profile(&self, tenant_id: &str) -> Result<Option<TenantProfile>> {
        let Some(tenant) = self.store.get_tenant(tenant_id).await? else {
            return Ok(None);
        };

        let settings = parse_settings(tenant.settings.as_deref());
        Ok(Some(TenantProfile { tenant, settings }))
    }

    /// Updates name, contact and the settings blob. CNPJ and plan status are
    /// not touched here; the plan is managed from the operator CLI.
    pub async fn update_profile(
        &self,
        tenant_id: &str,
        name: &str,
        contact_email: Option<&str>,
        settings: TenantSettings,
        actor_name: &str,
    ) -> Result<TenantProfile> {
        if name.trim().is_empty() {
            anyhow::bail!("Tenant name cannot be empty");
        }

        let tenant = self
            .store
            .update_tenant_profile(tenant_id, name.trim(), contact_email, &settings)
            .await?;

        let _ = self.event_bus.send(DomainEvent::TenantSettingsUpdated {
            tenant_id: tenant_id.to_string(),
            actor: actor_name.to_string(),
        });

        Ok(TenantProfile { tenant, settings })
    }

    pub async fn provision(
        &self,
        cnpj: &str,
        name: &str,
        plan_status: &str,
        contact_email: Option<&str>,
    ) -> Result<tenants::Model> {
        if !is_valid_cnpj(cnpj) {
            anyhow::bail!("Invalid CNPJ format, expected XX.XXX.XXX/XXXX-XX");
        }

        if self.store.get_tenant_by_cnpj(cnpj).await?.is_some() {
            anyhow::bail!("A tenant with CNPJ {cnpj} already exists");
        }

        self.store
            .create_tenant(cnpj, name, plan_status, contact_email)
            .await
    }

    // ---- Users ----

    pub async fn list_users(&self, tenant_id: &str) -> Result<Vec<User>> {
        self.store.list_users(tenant_id).await
    }

    pub async fn create_user(
        &self,
        tenant_id: &str,
        email: &str,
        name: &str,
        role: UserRole,
        password: &str,
    ) -> Result<User> {
        let email = email.trim().to_lowercase();

        if email.is_empty() || !email.contains('@') {
            anyhow::bail!("A valid email address is required");
        }
        if name.trim().is_empty() {
            anyhow::bail!("Name is required");
        }
        if password.len() < self.security.min_password_length {
            anyhow::bail!(
                "Password must be at least {} characters",
                self.security.min_password_length
            );
        }

        let existing = self.store.get_user_by_email(&email).await?;
        if existing.is_some_and(|u| u.tenant_id == tenant_id) {
            anyhow::bail!("A user with email {email} already exists");
        }

        self.store
            .create_user(
                tenant_id,
                &email,
                name.trim(),
                &role.to_string(),
                password,
                &self.security,
            )
            .await
    }

    /// Updates role, name and active flag. Refuses to demote or deactivate
    /// the tenant's last active admin so the account can't lock itself out.
    pub async fn update_user(
        &self,
        tenant_id: &str,
        user_id: &str,
        name: &str,
        role: UserRole,
        is_active: bool,
        actor_name: &str,
    ) -> Result<Option<User>> {
        let Some(target) = self.store.get_user(user_id).await? else {
            return Ok(None);
        };

        if target.tenant_id != tenant_id {
            return Ok(None);
        }

        let loses_admin = target.role == UserRole::CompanyAdmin.to_string()
            && target.is_active
            && (role != UserRole::CompanyAdmin || !is_active);

        if loses_admin && self.store.count_active_admins(tenant_id).await? <= 1 {
            anyhow::bail!("Cannot remove the last active administrator");
        }

        let was_active = target.is_active;
        let updated = self
            .store
            .update_user(user_id, name.trim(), &role.to_string(), is_active)
            .await?;

        if was_active && !is_active {
            let _ = self.event_bus.send(DomainEvent::UserDeactivated {
                tenant_id: tenant_id.to_string(),
                user_id: user_id.to_string(),
                actor: actor_name.to_string(),
            });
        }

        Ok(updated)
    }

    pub async fn delete_user(&self, tenant_id: &str, user_id: &str) -> Result<bool> {
        let Some(target) = self.store.get_user(user_id).await? else {
            return Ok(false);
        };

        if target.tenant_id != tenant_id {
            return Ok(false);
        }

        if target.role == UserRole::CompanyAdmin.to_string()
            && target.is_active
            && self.store.count_active_admins(tenant_id).await? <= 1
        {
            anyhow::bail!("Cannot delete the last active administrator");
        }

        self.store.delete_user(user_id).await
    }
}

/// CNPJ format check: `XX.XXX.XXX/XXXX-XX`. Format only, no check-digit
/// validation; registration numbers are treated as opaque identifiers.
#[must_use]
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    static PATTERN: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();

    let re = PATTERN.get_or_init(|| {
        regex::Regex::new(r"^\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}$").expect("valid CNPJ pattern")
    });

    re.is_match(cnpj)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_formatted_cnpj() {
        assert!(is_valid_cnpj("12.345.678/0001-90"));
        assert!(is_valid_cnpj("00.000.000/0001-00"));
    }

    #[test]
    fn rejects_unformatted_cnpj() {
        assert!(!is_valid_cnpj("12345678000190"));
        assert!(!is_valid_cnpj("12.345.678/001-90"));
        assert!(!is_valid_cnpj("12.345.678/0001-9"));
        assert!(!is_valid_cnpj(""));
    }
}
