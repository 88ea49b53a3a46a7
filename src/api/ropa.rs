use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::types::{ExportQuery, RopaEntryDto};
use crate::db::RopaInput;
use crate::services::SessionUser;
use crate::services::export::{ExportFormat, render_ropa_register};

#[derive(Debug, Deserialize)]
pub struct RopaEntryRequest {
    pub process_name: String,
    pub department: String,
    pub data_types: Vec<String>,
    pub data_subjects: String,
    pub legal_basis: String,
    pub retention_period: String,
    #[serde(default)]
    pub security_measures: Option<String>,
}

impl RopaEntryRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.process_name.trim().is_empty() {
            return Err(ApiError::validation("Process name is required"));
        }
        if self.department.trim().is_empty() {
            return Err(ApiError::validation("Department is required"));
        }
        if self.legal_basis.trim().is_empty() {
            return Err(ApiError::validation("Legal basis is required"));
        }
        Ok(())
    }

    fn into_input(self) -> RopaInput {
        RopaInput {
            process_name: self.process_name.trim().to_string(),
            department: self.department.trim().to_string(),
            data_types: self.data_types,
            data_subjects: self.data_subjects,
            legal_basis: self.legal_basis,
            retention_period: self.retention_period,
            security_measures: self.security_measures,
        }
    }
}

fn require_compliance_role(user: &SessionUser) -> Result<(), ApiError> {
    if user.role.can_manage_compliance() {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "Managing the ROPA register requires a DPO or admin role",
        ))
    }
}

pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<Vec<RopaEntryDto>>>, ApiError> {
    require_compliance_role(&user)?;

    let entries = state.ropa_service.list(&user.tenant_id).await?;
    let dtos = entries.into_iter().map(RopaEntryDto::from).collect();

    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<RopaEntryRequest>,
) -> Result<Json<ApiResponse<RopaEntryDto>>, ApiError> {
    require_compliance_role(&user)?;
    payload.validate()?;

    let entry = state
        .ropa_service
        .create(&user.tenant_id, payload.into_input())
        .await?;

    Ok(Json(ApiResponse::success(RopaEntryDto::from(entry))))
}

pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(payload): Json<RopaEntryRequest>,
) -> Result<Json<ApiResponse<RopaEntryDto>>, ApiError> {
    require_compliance_role(&user)?;
    payload.validate()?;

    let entry = state
        .ropa_service
        .update(&user.tenant_id, &id, payload.into_input())
        .await?
        .ok_or_else(|| ApiError::not_found("ROPA entry", &id))?;

    Ok(Json(ApiResponse::success(RopaEntryDto::from(entry))))
}

pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_compliance_role(&user)?;

    let deleted = state.ropa_service.delete(&user.tenant_id, &id).await?;

    if deleted {
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(ApiError::not_found("ROPA entry", &id))
    }
}

/// GET /ropa/export?format=csv|json: the ROPA report for auditors.
pub async fn export_register(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_compliance_role(&user)?;

    let format: ExportFormat = query
        .format
        .as_deref()
        .unwrap_or("json")
        .parse()
        .map_err(ApiError::validation)?;

    let entries = state.ropa_service.list(&user.tenant_id).await?;
    let body = render_ropa_register(&entries, format);

    Ok(([("Content-Type", format.content_type())], body))
}
