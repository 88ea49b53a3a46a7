use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::types::TenantSettings;
use crate::entities::{prelude::*, tenants};

pub struct TenantRepository {
    conn: DatabaseConnection,
}

impl TenantRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: &str) -> Result<Option<tenants::Model>> {
        Tenants::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query tenant")
    }

    pub async fn get_by_cnpj(&self, cnpj: &str) -> Result<Option<tenants::Model>> {
        Tenants::find()
            .filter(tenants::Column::Cnpj.eq(cnpj))
            .one(&self.conn)
            .await
            .context("Failed to query tenant by CNPJ")
    }

    pub async fn list(&self) -> Result<Vec<tenants::Model>> {
        Tenants::find()
            .order_by_asc(tenants::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list tenants")
    }

    pub async fn create(
        &self,
        cnpj: &str,
        name: &str,
        plan_status: &str,
        contact_email: Option<&str>,
    ) -> Result<tenants::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = tenants::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            cnpj: Set(cnpj.to_string()),
            name: Set(name.to_string()),
            plan_status: Set(plan_status.to_string()),
            contact_email: Set(contact_email.map(ToString::to_string)),
            settings: Set(None),
            created_at: Set(now),
        };

        model.insert(&self.conn).await.context("Failed to create tenant")
    }

    /// Updates the mutable profile fields. CNPJ and creation date are fixed
    /// for the lifetime of the tenant.
    pub async fn update_profile(
        &self,
        id: &str,
        name: &str,
        contact_email: Option<&str>,
        settings: &TenantSettings,
    ) -> Result<tenants::Model> {
        let tenant = Tenants::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query tenant for update")?
            .ok_or_else(|| anyhow::anyhow!("Tenant not found: {id}"))?;

        let settings_json =
            serde_json::to_string(settings).context("Failed to serialize tenant settings")?;

        let mut active: tenants::ActiveModel = tenant.into();
        active.name = Set(name.to_string());
        active.contact_email = Set(contact_email.map(ToString::to_string));
        active.settings = Set(Some(settings_json));

        active.update(&self.conn).await.context("Failed to update tenant")
    }

    pub async fn set_plan_status(&self, id: &str, plan_status: &str) -> Result<()> {
        let tenant = Tenants::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Tenant not found: {id}"))?;

        let mut active: tenants::ActiveModel = tenant.into();
        active.plan_status = Set(plan_status.to_string());
        active.update(&self.conn).await?;

        Ok(())
    }
}

/// Parses the settings JSON blob, treating an absent or malformed blob as
/// default settings.
#[must_use]
pub fn parse_settings(raw: Option<&str>) -> TenantSettings {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}
