use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::types::{
    AnalysisDto, ExportQuery, HistoryEntryDto, IncidentDetailDto, IncidentDto,
};
use crate::domain::types::{IncidentSeverity, IncidentStatus};
use crate::services::export::{
    ExportFormat, render_incident_audit, render_incident_register,
};
use crate::services::{ReportIncidentInput, SessionUser};

#[derive(Debug, Deserialize)]
pub struct ReportIncidentRequest {
    pub title: String,
    pub description: String,
    pub severity: IncidentSeverity,
    #[serde(default)]
    pub affected_data_types: Option<Vec<String>>,
    #[serde(default)]
    pub date_occurred: Option<String>,
    #[serde(default)]
    pub analysis_report: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: IncidentStatus,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct RemediationPlanRequest {
    pub plan: String,
}

fn parse_format(query: &ExportQuery) -> Result<ExportFormat, ApiError> {
    query
        .format
        .as_deref()
        .unwrap_or("json")
        .parse()
        .map_err(ApiError::validation)
}

pub async fn list_incidents(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<Vec<IncidentDto>>>, ApiError> {
    let incidents = state.incident_service.list(&user.tenant_id).await?;
    let dtos = incidents.into_iter().map(IncidentDto::from).collect();

    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn get_incident(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<IncidentDetailDto>>, ApiError> {
    let detail = state.incident_service.get(&user.tenant_id, &id).await?;

    Ok(Json(ApiResponse::success(IncidentDetailDto {
        incident: IncidentDto::from(detail.incident),
        history: detail.history.into_iter().map(HistoryEntryDto::from).collect(),
    })))
}

/// POST /incidents: registers the incident with its initial audit entry.
pub async fn report_incident(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<ReportIncidentRequest>,
) -> Result<Json<ApiResponse<IncidentDto>>, ApiError> {
    let incident = state
        .incident_service
        .report(
            &user.tenant_id,
            &user.name,
            ReportIncidentInput {
                title: payload.title,
                description: payload.description,
                severity: payload.severity,
                affected_data_types: payload.affected_data_types,
                date_occurred: payload.date_occurred,
                analysis_report: payload.analysis_report,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(IncidentDto::from(incident))))
}

/// POST /incidents/{id}/status: direct status assignment with a mandatory
/// justification; the only rejected transition is a no-op.
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<ApiResponse<IncidentDetailDto>>, ApiError> {
    let detail = state
        .incident_service
        .update_status(
            &user.tenant_id,
            &id,
            payload.status,
            &payload.description,
            &user.name,
        )
        .await?;

    Ok(Json(ApiResponse::success(IncidentDetailDto {
        incident: IncidentDto::from(detail.incident),
        history: detail.history.into_iter().map(HistoryEntryDto::from).collect(),
    })))
}

/// POST /incidents/analyze: AI severity assessment of a description. Never
/// fails: degrades to a default assessment when the model is unavailable.
pub async fn analyze_incident(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<SessionUser>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<AnalysisDto>>, ApiError> {
    if payload.description.trim().is_empty() {
        return Err(ApiError::validation("Description is required"));
    }

    let analysis = state.incident_service.analyze(&payload.description).await;

    Ok(Json(ApiResponse::success(AnalysisDto {
        severity: analysis.severity,
        analysis: analysis.analysis,
    })))
}

pub async fn set_remediation_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(payload): Json<RemediationPlanRequest>,
) -> Result<Json<ApiResponse<IncidentDto>>, ApiError> {
    let incident = state
        .incident_service
        .set_remediation_plan(&user.tenant_id, &id, &payload.plan)
        .await?;

    Ok(Json(ApiResponse::success(IncidentDto::from(incident))))
}

/// GET /incidents/export: the full incident register.
pub async fn export_register(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format = parse_format(&query)?;

    let incidents = state.incident_service.list(&user.tenant_id).await?;
    let body = render_incident_register(&incidents, format);

    Ok(([("Content-Type", format.content_type())], body))
}

/// GET /incidents/{id}/audit/export: one incident's audit trail.
pub async fn export_audit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format = parse_format(&query)?;

    let detail = state.incident_service.get(&user.tenant_id, &id).await?;
    let body = render_incident_audit(&detail.incident, &detail.history, format);

    Ok(([("Content-Type", format.content_type())], body))
}
