use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{prelude::*, ropa_entries};

/// Input for creating or replacing a ROPA entry.
#[derive(Debug, Clone)]
pub struct RopaInput {
    pub process_name: String,
    pub department: String,
    pub data_types: Vec<String>,
    pub data_subjects: String,
    pub legal_basis: String,
    pub retention_period: String,
    pub security_measures: Option<String>,
}

pub struct RopaRepository {
    conn: DatabaseConnection,
}

impl RopaRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<ropa_entries::Model>> {
        RopaEntries::find()
            .filter(ropa_entries::Column::TenantId.eq(tenant_id))
            .order_by_asc(ropa_entries::Column::ProcessName)
            .all(&self.conn)
            .await
            .context("Failed to list ROPA entries")
    }

    pub async fn get(&self, tenant_id: &str, id: &str) -> Result<Option<ropa_entries::Model>> {
        RopaEntries::find_by_id(id)
            .filter(ropa_entries::Column::TenantId.eq(tenant_id))
            .one(&self.conn)
            .await
            .context("Failed to query ROPA entry")
    }

    pub async fn create(&self, tenant_id: &str, input: RopaInput) -> Result<ropa_entries::Model> {
        let data_types =
            serde_json::to_string(&input.data_types).context("Failed to encode data types")?;

        let model = ropa_entries::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            tenant_id: Set(tenant_id.to_string()),
            process_name: Set(input.process_name),
            department: Set(input.department),
            data_types: Set(data_types),
            data_subjects: Set(input.data_subjects),
            legal_basis: Set(input.legal_basis),
            retention_period: Set(input.retention_period),
            security_measures: Set(input.security_measures),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        model.insert(&self.conn).await.context("Failed to create ROPA entry")
    }

    pub async fn update(
        &self,
        tenant_id: &str,
        id: &str,
        input: RopaInput,
    ) -> Result<Option<ropa_entries::Model>> {
        let Some(entry) = self.get(tenant_id, id).await? else {
            return Ok(None);
        };

        let data_types =
            serde_json::to_string(&input.data_types).context("Failed to encode data types")?;

        let mut active: ropa_entries::ActiveModel = entry.into();
        active.process_name = Set(input.process_name);
        active.department = Set(input.department);
        active.data_types = Set(data_types);
        active.data_subjects = Set(input.data_subjects);
        active.legal_basis = Set(input.legal_basis);
        active.retention_period = Set(input.retention_period);
        active.security_measures = Set(input.security_measures);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.conn).await?;
        Ok(Some(updated))
    }

    pub async fn delete(&self, tenant_id: &str, id: &str) -> Result<bool> {
        let result = RopaEntries::delete_many()
            .filter(ropa_entries::Column::Id.eq(id))
            .filter(ropa_entries::Column::TenantId.eq(tenant_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Distinct data categories mapped across the tenant's register, used to
    /// seed document generation.
    pub async fn data_types_for_tenant(&self, tenant_id: &str) -> Result<Vec<String>> {
        let entries = self.list_for_tenant(tenant_id).await?;

        let mut seen = Vec::new();
        for entry in entries {
            let types: Vec<String> = serde_json::from_str(&entry.data_types).unwrap_or_default();
            for t in types {
                if !seen.contains(&t) {
                    seen.push(t);
                }
            }
        }

        Ok(seen)
    }
}
