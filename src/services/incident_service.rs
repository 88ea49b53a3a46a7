//! Domain service for incident reporting and triage.
//!
//! The audit trail is append-only: reporting and status changes insert
//! history rows; nothing in this service edits or removes one.

use thiserror::Error;

use crate::domain::types::{IncidentSeverity, IncidentStatus};
use crate::entities::{incident_history, incidents};
use crate::services::generation::IncidentAnalysis;

/// Errors specific to incident operations.
#[derive(Debug, Error)]
pub enum IncidentError {
    #[error("Incident not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for IncidentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for IncidentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Input for reporting a new incident.
#[derive(Debug, Clone)]
pub struct ReportIncidentInput {
    pub title: String,
    pub description: String,
    pub severity: IncidentSeverity,
    pub affected_data_types: Option<Vec<String>>,
    pub date_occurred: Option<String>,
    /// The AI assessment text, when the reporter ran an analysis first.
    pub analysis_report: Option<String>,
}

/// An incident together with its full audit trail.
#[derive(Debug, Clone)]
pub struct IncidentDetail {
    pub incident: incidents::Model,
    pub history: Vec<incident_history::Model>,
}

/// Domain service trait for incident management.
#[async_trait::async_trait]
pub trait IncidentService: Send + Sync {
    /// Lists the tenant's incidents, newest first.
    async fn list(&self, tenant_id: &str) -> Result<Vec<incidents::Model>, IncidentError>;

    /// Loads one incident with its audit trail.
    async fn get(&self, tenant_id: &str, id: &str) -> Result<IncidentDetail, IncidentError>;

    /// Registers a new incident with its initial audit-trail entry.
    async fn report(
        &self,
        tenant_id: &str,
        actor_name: &str,
        input: ReportIncidentInput,
    ) -> Result<incidents::Model, IncidentError>;

    /// Moves the incident to a new status, appending a justified audit-trail
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`IncidentError::Validation`] when the justification is empty
    /// or the incident is already in the requested status.
    async fn update_status(
        &self,
        tenant_id: &str,
        id: &str,
        status: IncidentStatus,
        justification: &str,
        actor_name: &str,
    ) -> Result<IncidentDetail, IncidentError>;

    /// Stores a remediation plan on the incident.
    async fn set_remediation_plan(
        &self,
        tenant_id: &str,
        id: &str,
        plan: &str,
    ) -> Result<incidents::Model, IncidentError>;

    /// Runs the AI severity assessment over a free-form description.
    /// Infallible by design: degrades to a default assessment.
    async fn analyze(&self, description: &str) -> IncidentAnalysis;

    /// Severity distribution for the tenant, in enum order low..critical.
    async fn severity_breakdown(&self, tenant_id: &str) -> Result<[u64; 4], IncidentError>;
}

/// Formats the audit-trail action line for a status change.
#[must_use]
pub fn status_change_action(status: IncidentStatus) -> String {
    format!("Status alterado para {}", status.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_change_action_uses_labels() {
        assert_eq!(
            status_change_action(IncidentStatus::Investigating),
            "Status alterado para Investigando"
        );
        assert_eq!(
            status_change_action(IncidentStatus::FalsePositive),
            "Status alterado para Falso Positivo"
        );
    }
}
