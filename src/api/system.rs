//! System API endpoints: status, configuration and the tenant audit log.

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::types::{ExportQuery, LogDto, LogResponse, SystemStatus};
use crate::config::Config;
use crate::services::SessionUser;
use crate::services::export::{ExportFormat, render_audit_logs};

/// GET /system/status
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let tenant_id = &user.tenant_id;

    let users = state.store.list_users(tenant_id).await?;
    let ropas = state.store.list_ropa_entries(tenant_id).await?;
    let incidents = state.store.list_incidents(tenant_id).await?;
    let documents = state.store.list_documents(tenant_id).await?;
    let posts = state.store.list_awareness_posts(tenant_id, false).await?;

    let config = state.config.read().await;

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        tenant_users: users.len(),
        mapped_processes: ropas.len(),
        incidents: incidents.len(),
        documents: documents.len(),
        awareness_posts: posts.len(),
        ai_enabled: config.ai.enabled && !config.ai.api_key.is_empty(),
    })))
}

/// GET /system/config: secrets are skipped at serialization time.
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<Config>>, ApiError> {
    if !user.role.can_manage_settings() {
        return Err(ApiError::forbidden(
            "Server configuration requires an administrator role",
        ));
    }

    let config = state.config.read().await.clone();
    Ok(Json(ApiResponse::success(config)))
}

/// PUT /system/config: validates, persists to disk and applies in memory.
pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(new_config): Json<Config>,
) -> Result<Json<ApiResponse<Config>>, ApiError> {
    if !user.role.can_manage_settings() {
        return Err(ApiError::forbidden(
            "Server configuration requires an administrator role",
        ));
    }

    new_config
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    new_config
        .save()
        .map_err(|e| ApiError::internal(format!("Failed to persist config: {e}")))?;

    let mut config = state.config.write().await;
    // The file value never carries the key; keep the one loaded at startup.
    let api_key = config.ai.api_key.clone();
    *config = new_config;
    config.ai.api_key = api_key;

    Ok(Json(ApiResponse::success(config.clone())))
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
}

const fn default_page() -> u64 {
    1
}

const fn default_page_size() -> u64 {
    50
}

/// GET /system/logs: the tenant's audit log, newest first.
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<LogQuery>,
) -> Result<Json<ApiResponse<LogResponse>>, ApiError> {
    let page_size = query.page_size.clamp(1, 500);

    let (logs, total_pages) = state
        .store
        .get_audit_logs(
            &user.tenant_id,
            query.page.max(1),
            page_size,
            query.level,
            query.event_type,
        )
        .await?;

    let logs = logs
        .into_iter()
        .map(|log| LogDto {
            id: log.id,
            event_type: log.event_type,
            level: log.level,
            message: log.message,
            details: log.details,
            created_at: log.created_at,
        })
        .collect();

    Ok(Json(ApiResponse::success(LogResponse { logs, total_pages })))
}

/// GET /system/logs/export
pub async fn export_logs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format: ExportFormat = query
        .format
        .as_deref()
        .unwrap_or("json")
        .parse()
        .map_err(ApiError::validation)?;

    let logs = state.store.get_all_audit_logs(&user.tenant_id).await?;
    let body = render_audit_logs(&logs, format);

    Ok(([("Content-Type", format.content_type())], body))
}

/// DELETE /system/logs
pub async fn clear_logs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !user.role.can_manage_settings() {
        return Err(ApiError::forbidden(
            "Clearing the audit log requires an administrator role",
        ));
    }

    state.store.clear_audit_logs(&user.tenant_id).await?;

    Ok(Json(ApiResponse::success(())))
}
