//! Domain service for legal/compliance documents.

use thiserror::Error;

use crate::domain::types::DocType;
use crate::entities::legal_documents;

/// Errors specific to document operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for DocumentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for DocumentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Input for manually creating or editing a document.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub title: String,
    pub content: String,
    pub doc_type: DocType,
}

/// Outcome of an AI-drafted document.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub document: legal_documents::Model,
    pub ai_assisted: bool,
}

/// Domain service trait for document management.
#[async_trait::async_trait]
pub trait DocumentService: Send + Sync {
    /// Lists the tenant's documents, newest first.
    async fn list(&self, tenant_id: &str) -> Result<Vec<legal_documents::Model>, DocumentError>;

    async fn get(&self, tenant_id: &str, id: &str)
    -> Result<legal_documents::Model, DocumentError>;

    /// Creates a manually-authored document at version 1, unpublished.
    async fn create(
        &self,
        tenant_id: &str,
        input: DocumentInput,
    ) -> Result<legal_documents::Model, DocumentError>;

    /// Replaces title/content. The version bumps only when the content
    /// actually changed.
    async fn update(
        &self,
        tenant_id: &str,
        id: &str,
        title: &str,
        content: &str,
    ) -> Result<legal_documents::Model, DocumentError>;

    async fn set_published(
        &self,
        tenant_id: &str,
        id: &str,
        is_published: bool,
    ) -> Result<legal_documents::Model, DocumentError>;

    async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), DocumentError>;

    /// Drafts a new document with the generative model, grounded on the
    /// tenant's profile and mapped ROPA data categories. Saved unpublished
    /// at version 1; placeholder content is saved when the model is
    /// unavailable, matching the pass-through semantics.
    async fn generate(
        &self,
        tenant_id: &str,
        title: &str,
        doc_type: DocType,
    ) -> Result<GeneratedDocument, DocumentError>;
}
