use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{legal_documents, prelude::*};

pub struct DocumentRepository {
    conn: DatabaseConnection,
}

impl DocumentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<legal_documents::Model>> {
        LegalDocuments::find()
            .filter(legal_documents::Column::TenantId.eq(tenant_id))
            .order_by_desc(legal_documents::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list documents")
    }

    pub async fn get(&self, tenant_id: &str, id: &str) -> Result<Option<legal_documents::Model>> {
        LegalDocuments::find_by_id(id)
            .filter(legal_documents::Column::TenantId.eq(tenant_id))
            .one(&self.conn)
            .await
            .context("Failed to query document")
    }

    pub async fn create(
        &self,
        tenant_id: &str,
        title: &str,
        content: &str,
        doc_type: &str,
    ) -> Result<legal_documents::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = legal_documents::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            tenant_id: Set(tenant_id.to_string()),
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            doc_type: Set(doc_type.to_string()),
            version: Set(1),
            is_published: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        model.insert(&self.conn).await.context("Failed to create document")
    }

    /// Replaces title/content; the version bumps only when the content
    /// actually changed.
    pub async fn update(
        &self,
        tenant_id: &str,
        id: &str,
        title: &str,
        content: &str,
    ) -> Result<Option<legal_documents::Model>> {
        let Some(doc) = self.get(tenant_id, id).await? else {
            return Ok(None);
        };

        let content_changed = doc.content != content;
        let next_version = if content_changed { doc.version + 1 } else { doc.version };

        let mut active: legal_documents::ActiveModel = doc.into();
        active.title = Set(title.to_string());
        active.content = Set(content.to_string());
        active.version = Set(next_version);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.conn).await?;
        Ok(Some(updated))
    }

    pub async fn set_published(
        &self,
        tenant_id: &str,
        id: &str,
        is_published: bool,
    ) -> Result<Option<legal_documents::Model>> {
        let Some(doc) = self.get(tenant_id, id).await? else {
            return Ok(None);
        };

        let mut active: legal_documents::ActiveModel = doc.into();
        active.is_published = Set(is_published);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.conn).await?;
        Ok(Some(updated))
    }

    pub async fn delete(&self, tenant_id: &str, id: &str) -> Result<bool> {
        let result = LegalDocuments::delete_many()
            .filter(legal_documents::Column::Id.eq(id))
            .filter(legal_documents::Column::TenantId.eq(tenant_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
