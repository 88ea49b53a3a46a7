use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::types::{BreakdownBucket, DashboardStats};
use crate::domain::types::{DsarStatus, IncidentStatus};
use crate::services::SessionUser;

const SEVERITY_LABELS: [&str; 4] = ["Baixo", "Médio", "Alto", "Crítico"];

/// GET /dashboard/stats: the compliance overview: mapped processes, open and
/// critical incidents, severity and department breakdowns.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<DashboardStats>>, ApiError> {
    let tenant_id = &user.tenant_id;

    let ropas = state.ropa_service.list(tenant_id).await?;
    let incidents = state.incident_service.list(tenant_id).await?;
    let severity_counts = state.incident_service.severity_breakdown(tenant_id).await?;

    // "Open" in the overview means anything not yet resolved.
    let resolved = IncidentStatus::Resolved.to_string();
    let open_incidents = incidents.iter().filter(|i| i.status != resolved).count() as u64;
    let critical_incidents = severity_counts[3];

    let incidents_by_severity = SEVERITY_LABELS
        .iter()
        .zip(severity_counts)
        .filter(|&(_, count)| count > 0)
        .map(|(&name, count)| BreakdownBucket {
            name: name.to_string(),
            value: count,
        })
        .collect();

    let mut processes_by_department: Vec<BreakdownBucket> = Vec::new();
    for entry in &ropas {
        match processes_by_department
            .iter_mut()
            .find(|b| b.name == entry.department)
        {
            Some(bucket) => bucket.value += 1,
            None => processes_by_department.push(BreakdownBucket {
                name: entry.department.clone(),
                value: 1,
            }),
        }
    }

    let published_awareness_posts = state
        .store
        .count_published_awareness_posts(tenant_id)
        .await?;

    let completed = DsarStatus::Completed.to_string();
    let rejected = DsarStatus::Rejected.to_string();
    let open_dsar_requests = state
        .store
        .list_dsar_requests(tenant_id)
        .await?
        .iter()
        .filter(|r| r.status != completed && r.status != rejected)
        .count() as u64;

    Ok(Json(ApiResponse::success(DashboardStats {
        mapped_processes: ropas.len() as u64,
        open_incidents,
        critical_incidents,
        incidents_by_severity,
        processes_by_department,
        published_awareness_posts,
        open_dsar_requests,
    })))
}
