use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::types::DsarRequestDto;
use crate::domain::types::DsarStatus;
use crate::services::SessionUser;

#[derive(Debug, Deserialize)]
pub struct CreateDsarRequest {
    pub subject_name: String,
    pub subject_email: String,
    pub request_type: String,
    #[serde(default)]
    pub deadline: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DsarStatusRequest {
    pub status: DsarStatus,
}

#[derive(Debug, Deserialize)]
pub struct DsarResponseRequest {
    pub response_content: String,
}

fn require_compliance_role(user: &SessionUser) -> Result<(), ApiError> {
    if user.role.can_manage_compliance() {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "Managing data-subject requests requires a DPO or admin role",
        ))
    }
}

pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<Vec<DsarRequestDto>>>, ApiError> {
    require_compliance_role(&user)?;

    let requests = state.dsar_service.list(&user.tenant_id).await?;
    let dtos = requests.into_iter().map(DsarRequestDto::from).collect();

    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn create_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<CreateDsarRequest>,
) -> Result<Json<ApiResponse<DsarRequestDto>>, ApiError> {
    require_compliance_role(&user)?;

    let request = state
        .dsar_service
        .create(
            &user.tenant_id,
            &payload.subject_name,
            &payload.subject_email,
            &payload.request_type,
            payload.deadline,
        )
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;

    Ok(Json(ApiResponse::success(DsarRequestDto::from(request))))
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(payload): Json<DsarStatusRequest>,
) -> Result<Json<ApiResponse<DsarRequestDto>>, ApiError> {
    require_compliance_role(&user)?;

    let request = state
        .dsar_service
        .set_status(&user.tenant_id, &id, payload.status)
        .await?
        .ok_or_else(|| ApiError::not_found("DSAR request", &id))?;

    Ok(Json(ApiResponse::success(DsarRequestDto::from(request))))
}

/// POST /dsar/{id}/respond: records the answer and completes the request.
pub async fn respond(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(payload): Json<DsarResponseRequest>,
) -> Result<Json<ApiResponse<DsarRequestDto>>, ApiError> {
    require_compliance_role(&user)?;

    if payload.response_content.trim().is_empty() {
        return Err(ApiError::validation("Response content is required"));
    }

    let request = state
        .dsar_service
        .respond(&user.tenant_id, &id, &payload.response_content)
        .await?
        .ok_or_else(|| ApiError::not_found("DSAR request", &id))?;

    Ok(Json(ApiResponse::success(DsarRequestDto::from(request))))
}
