use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::types::VendorDto;
use crate::db::VendorInput;
use crate::domain::types::IncidentSeverity;
use crate::services::SessionUser;

#[derive(Debug, Deserialize)]
pub struct VendorRequest {
    pub name: String,
    pub service_provided: String,
    pub risk_level: IncidentSeverity,
    #[serde(default)]
    pub has_signed_dpa: bool,
}

impl VendorRequest {
    fn into_input(self) -> Result<VendorInput, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation("Vendor name is required"));
        }

        Ok(VendorInput {
            name: self.name.trim().to_string(),
            service_provided: self.service_provided,
            risk_level: self.risk_level.to_string(),
            has_signed_dpa: self.has_signed_dpa,
        })
    }
}

fn require_compliance_role(user: &SessionUser) -> Result<(), ApiError> {
    if user.role.can_manage_compliance() {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "Managing vendors requires a DPO or admin role",
        ))
    }
}

pub async fn list_vendors(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<Vec<VendorDto>>>, ApiError> {
    require_compliance_role(&user)?;

    let vendors = state.store.list_vendors(&user.tenant_id).await?;
    let dtos = vendors.into_iter().map(VendorDto::from).collect();

    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn create_vendor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<VendorRequest>,
) -> Result<Json<ApiResponse<VendorDto>>, ApiError> {
    require_compliance_role(&user)?;

    let vendor = state
        .store
        .create_vendor(&user.tenant_id, payload.into_input()?)
        .await?;

    Ok(Json(ApiResponse::success(VendorDto::from(vendor))))
}

pub async fn update_vendor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(payload): Json<VendorRequest>,
) -> Result<Json<ApiResponse<VendorDto>>, ApiError> {
    require_compliance_role(&user)?;

    let vendor = state
        .store
        .update_vendor(&user.tenant_id, &id, payload.into_input()?)
        .await?
        .ok_or_else(|| ApiError::not_found("Vendor", &id))?;

    Ok(Json(ApiResponse::success(VendorDto::from(vendor))))
}

pub async fn delete_vendor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_compliance_role(&user)?;

    let deleted = state.store.delete_vendor(&user.tenant_id, &id).await?;

    if deleted {
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(ApiError::not_found("Vendor", &id))
    }
}
