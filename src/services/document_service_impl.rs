//! `SeaORM` implementation of the `DocumentService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::db::Store;
use crate::domain::events::DomainEvent;
use crate::domain::types::DocType;
use crate::entities::legal_documents;
use crate::services::document_service::{
    DocumentError, DocumentInput, DocumentService, GeneratedDocument,
};
use crate::services::generation::GenerationService;

/// Industry line fed to the drafting prompt; the register does not model the
/// tenant's industry, so the original's generic descriptor is kept.
const DEFAULT_INDUSTRY: &str = "Tecnologia e Serviços";

pub struct SeaOrmDocumentService {
    store: Store,
    generation: Arc<GenerationService>,
    event_bus: broadcast::Sender<DomainEvent>,
}

impl SeaOrmDocumentService {
    #[must_use]
    pub const fn new(
        store: Store,
        generation: Arc<GenerationService>,
        event_bus: broadcast::Sender<DomainEvent>,
    ) -> Self {
        Self {
            store,
            generation,
            event_bus,
        }
    }
}

#[async_trait]
impl DocumentService for SeaOrmDocumentService {
    async fn list(&self, tenant_id: &str) -> Result<Vec<legal_documents::Model>, DocumentError> {
        Ok(self.store.list_documents(tenant_id).await?)
    }

    async fn get(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<legal_documents::Model, DocumentError> {
        self.store
            .get_document(tenant_id, id)
            .await?
            .ok_or(DocumentError::NotFound)
    }

    async fn create(
        &self,
        tenant_id: &str,
        input: DocumentInput,
    ) -> Result<legal_documents::Model, DocumentError> {
        if input.title.trim().is_empty() {
            return Err(DocumentError::Validation("Title is required".to_string()));
        }

        let document = self
            .store
            .create_document(
                tenant_id,
                input.title.trim(),
                &input.content,
                &input.doc_type.to_string(),
            )
            .await?;

        Ok(document)
    }

    async fn update(
        &self,
        tenant_id: &str,
        id: &str,
        title: &str,
        content: &str,
    ) -> Result<legal_documents::Model, DocumentError> {
        if title.trim().is_empty() {
            return Err(DocumentError::Validation("Title is required".to_string()));
        }

        self.store
            .update_document(tenant_id, id, title.trim(), content)
            .await?
            .ok_or(DocumentError::NotFound)
    }

    async fn set_published(
        &self,
        tenant_id: &str,
        id: &str,
        is_published: bool,
    ) -> Result<legal_documents::Model, DocumentError> {
        let document = self
            .store
            .set_document_published(tenant_id, id, is_published)
            .await?
            .ok_or(DocumentError::NotFound)?;

        if is_published {
            let _ = self.event_bus.send(DomainEvent::DocumentPublished {
                tenant_id: tenant_id.to_string(),
                document_id: document.id.clone(),
                title: document.title.clone(),
                version: document.version,
            });
        }

        Ok(document)
    }

    async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), DocumentError> {
        let deleted = self.store.delete_document(tenant_id, id).await?;

        if deleted {
            Ok(())
        } else {
            Err(DocumentError::NotFound)
        }
    }

    async fn generate(
        &self,
        tenant_id: &str,
        title: &str,
        doc_type: DocType,
    ) -> Result<GeneratedDocument, DocumentError> {
        if title.trim().is_empty() {
            return Err(DocumentError::Validation("Title is required".to_string()));
        }

        let tenant = self
            .store
            .get_tenant(tenant_id)
            .await?
            .ok_or_else(|| DocumentError::Internal("Tenant not found".to_string()))?;

        let data_types = self.store.ropa_data_types(tenant_id).await?;

        let draft = self
            .generation
            .draft_document(title.trim(), doc_type, &tenant.name, DEFAULT_INDUSTRY, &data_types)
            .await;

        let document = self
            .store
            .create_document(
                tenant_id,
                title.trim(),
                &draft.content,
                &doc_type.to_string(),
            )
            .await?;

        let _ = self.event_bus.send(DomainEvent::DocumentGenerated {
            tenant_id: tenant_id.to_string(),
            document_id: document.id.clone(),
            title: document.title.clone(),
            ai_assisted: draft.ai_assisted,
        });

        Ok(GeneratedDocument {
            document,
            ai_assisted: draft.ai_assisted,
        })
    }
}
