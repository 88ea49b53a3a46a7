use crate::entities::{audit_logs, prelude::*};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

pub struct AuditRepository {
    conn: DatabaseConnection,
}

impl AuditRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(
        &self,
        tenant_id: Option<&str>,
        event_type: &str,
        level: &str,
        message: &str,
        details: Option<String>,
    ) -> Result<()> {
        let active_model = audit_logs::ActiveModel {
            tenant_id: Set(tenant_id.map(ToString::to_string)),
            event_type: Set(event_type.to_string()),
            level: Set(level.to_string()),
            message: Set(message.to_string()),
            details: Set(details),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        AuditLogs::insert(active_model).exec(&self.conn).await?;
        Ok(())
    }

    pub async fn get_logs(
        &self,
        tenant_id: &str,
        page: u64,
        page_size: u64,
        level_filter: Option<String>,
        event_type_filter: Option<String>,
    ) -> Result<(Vec<audit_logs::Model>, u64)> {
        let mut query = AuditLogs::find()
            .filter(audit_logs::Column::TenantId.eq(tenant_id))
            .order_by_desc(audit_logs::Column::Id);

        if let Some(level) = level_filter {
            query = query.filter(audit_logs::Column::Level.eq(level));
        }

        if let Some(event_type) = event_type_filter {
            query = query.filter(audit_logs::Column::EventType.contains(event_type));
        }

        let paginator = query.paginate(&self.conn, page_size);
        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total_pages))
    }

    pub async fn get_all_logs(&self, tenant_id: &str) -> Result<Vec<audit_logs::Model>> {
        let items = AuditLogs::find()
            .filter(audit_logs::Column::TenantId.eq(tenant_id))
            .order_by_desc(audit_logs::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(items)
    }

    pub async fn clear_logs(&self, tenant_id: &str) -> Result<()> {
        AuditLogs::delete_many()
            .filter(audit_logs::Column::TenantId.eq(tenant_id))
            .exec(&self.conn)
            .await?;

        Ok(())
    }
}
