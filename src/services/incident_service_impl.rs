//! `SeaORM` implementation of the `IncidentService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::db::{HistoryEntry, IncidentInput, Store};
use crate::domain::events::DomainEvent;
use crate::domain::types::{IncidentSeverity, IncidentStatus};
use crate::entities::incidents;
use crate::services::generation::{GenerationService, IncidentAnalysis};
use crate::services::incident_service::{
    IncidentDetail, IncidentError, IncidentService, ReportIncidentInput, status_change_action,
};

pub struct SeaOrmIncidentService {
    store: Store,
    generation: Arc<GenerationService>,
    event_bus: broadcast::Sender<DomainEvent>,
}

impl SeaOrmIncidentService {
    #[must_use]
    pub const fn new(
        store: Store,
        generation: Arc<GenerationService>,
        event_bus: broadcast::Sender<DomainEvent>,
    ) -> Self {
        Self {
            store,
            generation,
            event_bus,
        }
    }
}

#[async_trait]
impl IncidentService for SeaOrmIncidentService {
    async fn list(&self, tenant_id: &str) -> Result<Vec<incidents::Model>, IncidentError> {
        Ok(self.store.list_incidents(tenant_id).await?)
    }

    async fn get(&self, tenant_id: &str, id: &str) -> Result<IncidentDetail, IncidentError> {
        let incident = self
            .store
            .get_incident(tenant_id, id)
            .await?
            .ok_or(IncidentError::NotFound)?;

        let history = self.store.incident_history(id).await?;

        Ok(IncidentDetail { incident, history })
    }

    async fn report(
        &self,
        tenant_id: &str,
        actor_name: &str,
        input: ReportIncidentInput,
    ) -> Result<incidents::Model, IncidentError> {
        if input.title.trim().is_empty() {
            return Err(IncidentError::Validation("Title is required".to_string()));
        }
        if input.description.trim().is_empty() {
            return Err(IncidentError::Validation(
                "Description is required".to_string(),
            ));
        }

        let incident = self
            .store
            .report_incident(
                tenant_id,
                IncidentInput {
                    title: input.title,
                    description: input.description,
                    severity: input.severity.to_string(),
                    affected_data_types: input.affected_data_types,
                    date_occurred: input.date_occurred,
                    analysis_report: input.analysis_report,
                },
                HistoryEntry {
                    action: "Incidente Reportado".to_string(),
                    description: "Registro inicial do incidente.".to_string(),
                    user: actor_name.to_string(),
                },
            )
            .await?;

        let _ = self.event_bus.send(DomainEvent::IncidentReported {
            tenant_id: tenant_id.to_string(),
            incident_id: incident.id.clone(),
            title: incident.title.clone(),
            severity: incident.severity.clone(),
        });

        Ok(incident)
    }

    async fn update_status(
        &self,
        tenant_id: &str,
        id: &str,
        status: IncidentStatus,
        justification: &str,
        actor_name: &str,
    ) -> Result<IncidentDetail, IncidentError> {
        if justification.trim().is_empty() {
            return Err(IncidentError::Validation(
                "A justification for the status change is required".to_string(),
            ));
        }

        let current = self
            .store
            .get_incident(tenant_id, id)
            .await?
            .ok_or(IncidentError::NotFound)?;

        if current.status == status.to_string() {
            return Err(IncidentError::Validation(format!(
                "Incident is already in status '{status}'"
            )));
        }

        let previous_status = current.status.clone();

        let updated = self
            .store
            .set_incident_status(
                tenant_id,
                id,
                &status.to_string(),
                HistoryEntry {
                    action: status_change_action(status),
                    description: justification.trim().to_string(),
                    user: actor_name.to_string(),
                },
            )
            .await?
            .ok_or(IncidentError::NotFound)?;

        let _ = self.event_bus.send(DomainEvent::IncidentStatusChanged {
            tenant_id: tenant_id.to_string(),
            incident_id: updated.id.clone(),
            from: previous_status,
            to: updated.status.clone(),
            actor: actor_name.to_string(),
        });

        let history = self.store.incident_history(id).await?;

        Ok(IncidentDetail {
            incident: updated,
            history,
        })
    }

    async fn set_remediation_plan(
        &self,
        tenant_id: &str,
        id: &str,
        plan: &str,
    ) -> Result<incidents::Model, IncidentError> {
        if plan.trim().is_empty() {
            return Err(IncidentError::Validation(
                "Remediation plan cannot be empty".to_string(),
            ));
        }

        self.store
            .set_incident_remediation_plan(tenant_id, id, plan)
            .await?
            .ok_or(IncidentError::NotFound)
    }

    async fn analyze(&self, description: &str) -> IncidentAnalysis {
        self.generation.analyze_incident(description).await
    }

    async fn severity_breakdown(&self, tenant_id: &str) -> Result<[u64; 4], IncidentError> {
        let incidents = self.store.list_incidents(tenant_id).await?;

        let mut counts = [0u64; 4];
        for incident in &incidents {
            let index = match incident.severity.parse::<IncidentSeverity>() {
                Ok(IncidentSeverity::Low) => 0,
                Ok(IncidentSeverity::Medium) | Err(_) => 1,
                Ok(IncidentSeverity::High) => 2,
                Ok(IncidentSeverity::Critical) => 3,
            };
            counts[index] += 1;
        }

        Ok(counts)
    }
}
