use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::types::{DocumentDto, GeneratedDocumentDto};
use crate::domain::types::DocType;
use crate::services::{DocumentInput, SessionUser};

#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub content: String,
    pub doc_type: DocType,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub is_published: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateDocumentRequest {
    pub title: String,
    #[serde(default = "default_doc_type")]
    pub doc_type: DocType,
}

const fn default_doc_type() -> DocType {
    DocType::PrivacyPolicy
}

fn require_compliance_role(user: &SessionUser) -> Result<(), ApiError> {
    if user.role.can_manage_compliance() {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "Managing legal documents requires a DPO or admin role",
        ))
    }
}

pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<Vec<DocumentDto>>>, ApiError> {
    require_compliance_role(&user)?;

    let documents = state.document_service.list(&user.tenant_id).await?;
    let dtos = documents.into_iter().map(DocumentDto::from).collect();

    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DocumentDto>>, ApiError> {
    require_compliance_role(&user)?;

    let document = state.document_service.get(&user.tenant_id, &id).await?;

    Ok(Json(ApiResponse::success(DocumentDto::from(document))))
}

pub async fn create_document(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<CreateDocumentRequest>,
) -> Result<Json<ApiResponse<DocumentDto>>, ApiError> {
    require_compliance_role(&user)?;

    let document = state
        .document_service
        .create(
            &user.tenant_id,
            DocumentInput {
                title: payload.title,
                content: payload.content,
                doc_type: payload.doc_type,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(DocumentDto::from(document))))
}

/// PUT /documents/{id}: the version bumps only when the content changed.
pub async fn update_document(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateDocumentRequest>,
) -> Result<Json<ApiResponse<DocumentDto>>, ApiError> {
    require_compliance_role(&user)?;

    let document = state
        .document_service
        .update(&user.tenant_id, &id, &payload.title, &payload.content)
        .await?;

    Ok(Json(ApiResponse::success(DocumentDto::from(document))))
}

pub async fn set_published(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(payload): Json<PublishRequest>,
) -> Result<Json<ApiResponse<DocumentDto>>, ApiError> {
    require_compliance_role(&user)?;

    let document = state
        .document_service
        .set_published(&user.tenant_id, &id, payload.is_published)
        .await?;

    Ok(Json(ApiResponse::success(DocumentDto::from(document))))
}

pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_compliance_role(&user)?;

    state.document_service.delete(&user.tenant_id, &id).await?;

    Ok(Json(ApiResponse::success(())))
}

/// POST /documents/generate: drafts a document with the generative model,
/// grounded on the tenant profile and its mapped ROPA data categories. Saved
/// unpublished; placeholder content is saved when the model is unavailable.
pub async fn generate_document(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<GenerateDocumentRequest>,
) -> Result<Json<ApiResponse<GeneratedDocumentDto>>, ApiError> {
    require_compliance_role(&user)?;

    let generated = state
        .document_service
        .generate(&user.tenant_id, &payload.title, payload.doc_type)
        .await?;

    Ok(Json(ApiResponse::success(GeneratedDocumentDto {
        document: DocumentDto::from(generated.document),
        ai_assisted: generated.ai_assisted,
    })))
}
