use crate::db::Store;
use crate::domain::events::DomainEvent;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::error;

/// Persists domain events into the audit log. Runs as a background listener
/// on the event bus so handlers never wait on log writes.
pub struct AuditService {
    store: Store,
    event_bus: broadcast::Sender<DomainEvent>,
}

impl AuditService {
    #[must_use]
    pub const fn new(store: Store, event_bus: broadcast::Sender<DomainEvent>) -> Self {
        Self { store, event_bus }
    }

    pub fn start_listener(self: Arc<Self>) {
        let mut rx = self.event_bus.subscribe();
        let service = self;

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if let Err(e) = service.handle_event(event).await {
                            error!(error = %e, "Failed to save audit log");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        error!(count, "Audit listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        error!("Audit listener event bus closed");
                        break;
                    }
                }
            }
        });
    }

    async fn handle_event(&self, event: DomainEvent) -> anyhow::Result<()> {
        let details = serde_json::to_string(&event).ok();

        let (tenant_id, event_type, level, message) = match &event {
            DomainEvent::IncidentReported {
                tenant_id,
                title,
                severity,
                ..
            } => (
                tenant_id.clone(),
                "IncidentReported",
                "warn",
                format!("Incident reported: {title} ({severity})"),
            ),
            DomainEvent::IncidentStatusChanged {
                tenant_id,
                from,
                to,
                actor,
                ..
            } => (
                tenant_id.clone(),
                "IncidentStatusChanged",
                "info",
                format!("Incident status changed {from} -> {to} by {actor}"),
            ),
            DomainEvent::RopaEntryCreated {
                tenant_id,
                process_name,
            } => (
                tenant_id.clone(),
                "RopaEntryCreated",
                "info",
                format!("Processing activity mapped: {process_name}"),
            ),
            DomainEvent::RopaEntryDeleted {
                tenant_id,
                process_name,
            } => (
                tenant_id.clone(),
                "RopaEntryDeleted",
                "info",
                format!("Processing activity removed: {process_name}"),
            ),
            DomainEvent::DocumentGenerated {
                tenant_id,
                title,
                ai_assisted,
                ..
            } => (
                tenant_id.clone(),
                "DocumentGenerated",
                "info",
                if *ai_assisted {
                    format!("Document drafted with AI assistance: {title}")
                } else {
                    format!("Document drafted (AI unavailable, placeholder content): {title}")
                },
            ),
            DomainEvent::DocumentPublished {
                tenant_id,
                title,
                version,
                ..
            } => (
                tenant_id.clone(),
                "DocumentPublished",
                "info",
                format!("Document published: {title} v{version}"),
            ),
            DomainEvent::AwarenessPostPublished {
                tenant_id, title, ..
            } => (
                tenant_id.clone(),
                "AwarenessPostPublished",
                "info",
                format!("Awareness post published: {title}"),
            ),
            DomainEvent::DsarOverdue {
                tenant_id,
                protocol_number,
                deadline,
            } => (
                tenant_id.clone(),
                "DsarOverdue",
                "warn",
                format!("DSAR {protocol_number} missed its deadline ({deadline})"),
            ),
            DomainEvent::UserDeactivated {
                tenant_id,
                user_id,
                actor,
            } => (
                tenant_id.clone(),
                "UserDeactivated",
                "warn",
                format!("User {user_id} deactivated by {actor}"),
            ),
            DomainEvent::TenantSettingsUpdated { tenant_id, actor } => (
                tenant_id.clone(),
                "TenantSettingsUpdated",
                "info",
                format!("Tenant settings updated by {actor}"),
            ),
        };

        self.store
            .add_audit_log(Some(&tenant_id), event_type, level, &message, details)
            .await
    }
}
