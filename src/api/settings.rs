use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::types::{TenantDto, UserDto};
use crate::domain::types::{TenantSettings, UserRole};
use crate::services::SessionUser;

#[derive(Debug, Deserialize)]
pub struct UpdateTenantRequest {
    pub name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub settings: TenantSettings,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub role: UserRole,
    pub is_active: bool,
}

fn require_settings_role(user: &SessionUser) -> Result<(), ApiError> {
    if user.role.can_manage_settings() {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "Tenant settings require an administrator role",
        ))
    }
}

/// GET /settings/tenant: the caller's own tenant, with decoded settings.
pub async fn get_tenant(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<TenantDto>>, ApiError> {
    require_settings_role(&user)?;

    let profile = state
        .tenant_service
        .get_profile(&user.tenant_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tenant", &user.tenant_id))?;

    Ok(Json(ApiResponse::success(TenantDto::from(profile.tenant))))
}

/// PUT /settings/tenant: branding, DPO contact, committee and security
/// policy. CNPJ and plan status are immutable from the API.
pub async fn update_tenant(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<UpdateTenantRequest>,
) -> Result<Json<ApiResponse<TenantDto>>, ApiError> {
    require_settings_role(&user)?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Tenant name is required"));
    }

    let profile = state
        .tenant_service
        .update_profile(
            &user.tenant_id,
            &payload.name,
            payload.contact_email.as_deref(),
            payload.settings,
            &user.name,
        )
        .await?;

    Ok(Json(ApiResponse::success(TenantDto::from(profile.tenant))))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    require_settings_role(&user)?;

    let users = state.tenant_service.list_users(&user.tenant_id).await?;
    let dtos = users.into_iter().map(UserDto::from).collect();

    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    require_settings_role(&user)?;

    let created = state
        .tenant_service
        .create_user(
            &user.tenant_id,
            &payload.email,
            &payload.name,
            payload.role,
            &payload.password,
        )
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;

    Ok(Json(ApiResponse::success(UserDto::from(created))))
}

/// PUT /settings/users/{id}: refuses to demote or deactivate the last
/// active administrator.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    require_settings_role(&user)?;

    let updated = state
        .tenant_service
        .update_user(
            &user.tenant_id,
            &id,
            &payload.name,
            payload.role,
            payload.is_active,
            &user.name,
        )
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("User", &id))?;

    Ok(Json(ApiResponse::success(UserDto::from(updated))))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_settings_role(&user)?;

    if user.id == id {
        return Err(ApiError::validation("You cannot delete your own account"));
    }

    let deleted = state
        .tenant_service
        .delete_user(&user.tenant_id, &id)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;

    if deleted {
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(ApiError::not_found("User", &id))
    }
}
