use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{prelude::*, vendors};

#[derive(Debug, Clone)]
pub struct VendorInput {
    pub name: String,
    pub service_provided: String,
    pub risk_level: String,
    pub has_signed_dpa: bool,
}

pub struct VendorRepository {
    conn: DatabaseConnection,
}

impl VendorRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<vendors::Model>> {
        Vendors::find()
            .filter(vendors::Column::TenantId.eq(tenant_id))
            .order_by_asc(vendors::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list vendors")
    }

    pub async fn get(&self, tenant_id: &str, id: &str) -> Result<Option<vendors::Model>> {
        Vendors::find_by_id(id)
            .filter(vendors::Column::TenantId.eq(tenant_id))
            .one(&self.conn)
            .await
            .context("Failed to query vendor")
    }

    pub async fn create(&self, tenant_id: &str, input: VendorInput) -> Result<vendors::Model> {
        let model = vendors::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            tenant_id: Set(tenant_id.to_string()),
            name: Set(input.name),
            service_provided: Set(input.service_provided),
            risk_level: Set(input.risk_level),
            has_signed_dpa: Set(input.has_signed_dpa),
        };

        model.insert(&self.conn).await.context("Failed to create vendor")
    }

    pub async fn update(
        &self,
        tenant_id: &str,
        id: &str,
        input: VendorInput,
    ) -> Result<Option<vendors::Model>> {
        let Some(vendor) = self.get(tenant_id, id).await? else {
            return Ok(None);
        };

        let mut active: vendors::ActiveModel = vendor.into();
        active.name = Set(input.name);
        active.service_provided = Set(input.service_provided);
        active.risk_level = Set(input.risk_level);
        active.has_signed_dpa = Set(input.has_signed_dpa);

        let updated = active.update(&self.conn).await?;
        Ok(Some(updated))
    }

    pub async fn delete(&self, tenant_id: &str, id: &str) -> Result<bool> {
        let result = Vendors::delete_many()
            .filter(vendors::Column::Id.eq(id))
            .filter(vendors::Column::TenantId.eq(tenant_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
