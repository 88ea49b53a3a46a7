use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{dsar_requests, prelude::*};

#[derive(Debug, Clone)]
pub struct DsarInput {
    pub subject_name: String,
    pub subject_email: String,
    pub request_type: String,
    pub deadline: String,
}

pub struct DsarRepository {
    conn: DatabaseConnection,
}

impl DsarRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<dsar_requests::Model>> {
        DsarRequests::find()
            .filter(dsar_requests::Column::TenantId.eq(tenant_id))
            .order_by_desc(dsar_requests::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list DSAR requests")
    }

    pub async fn get(&self, tenant_id: &str, id: &str) -> Result<Option<dsar_requests::Model>> {
        DsarRequests::find_by_id(id)
            .filter(dsar_requests::Column::TenantId.eq(tenant_id))
            .one(&self.conn)
            .await
            .context("Failed to query DSAR request")
    }

    pub async fn create(
        &self,
        tenant_id: &str,
        input: DsarInput,
    ) -> Result<dsar_requests::Model> {
        let now = chrono::Utc::now();
        let year = now.format("%Y");

        // Sequence is per-tenant within the year; gaps after deletions are fine.
        let existing = DsarRequests::find()
            .filter(dsar_requests::Column::TenantId.eq(tenant_id))
            .filter(dsar_requests::Column::ProtocolNumber.starts_with(format!("DSAR-{year}-")))
            .count(&self.conn)
            .await?;

        let protocol_number = format!("DSAR-{year}-{:04}", existing + 1);

        let model = dsar_requests::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            tenant_id: Set(tenant_id.to_string()),
            protocol_number: Set(protocol_number),
            subject_name: Set(input.subject_name),
            subject_email: Set(input.subject_email),
            request_type: Set(input.request_type),
            status: Set("new".to_string()),
            deadline: Set(input.deadline),
            response_content: Set(None),
            created_at: Set(now.to_rfc3339()),
        };

        model.insert(&self.conn).await.context("Failed to create DSAR request")
    }

    pub async fn set_status(
        &self,
        tenant_id: &str,
        id: &str,
        status: &str,
    ) -> Result<Option<dsar_requests::Model>> {
        let Some(request) = self.get(tenant_id, id).await? else {
            return Ok(None);
        };

        let mut active: dsar_requests::ActiveModel = request.into();
        active.status = Set(status.to_string());

        let updated = active.update(&self.conn).await?;
        Ok(Some(updated))
    }

    /// Records the response and completes the request.
    pub async fn respond(
        &self,
        tenant_id: &str,
        id: &str,
        response_content: &str,
    ) -> Result<Option<dsar_requests::Model>> {
        let Some(request) = self.get(tenant_id, id).await? else {
            return Ok(None);
        };

        let mut active: dsar_requests::ActiveModel = request.into();
        active.response_content = Set(Some(response_content.to_string()));
        active.status = Set("completed".to_string());

        let updated = active.update(&self.conn).await?;
        Ok(Some(updated))
    }

    /// Open requests whose deadline has passed, across all tenants.
    pub async fn list_overdue(&self, now: &str) -> Result<Vec<dsar_requests::Model>> {
        DsarRequests::find()
            .filter(dsar_requests::Column::Status.is_not_in(["completed", "rejected"]))
            .filter(dsar_requests::Column::Deadline.lt(now))
            .order_by_asc(dsar_requests::Column::Deadline)
            .all(&self.conn)
            .await
            .context("Failed to list overdue DSAR requests")
    }
}
