use anyhow::Result;
use tokio::sync::broadcast;
use tracing::warn;

use crate::db::{DsarInput, Store};
use crate::domain::events::DomainEvent;
use crate::domain::types::DsarStatus;
use crate::entities::dsar_requests;

/// LGPD grants controllers 15 days to answer a data-subject request.
const DEFAULT_DEADLINE_DAYS: i64 = 15;

/// Data-subject request intake, triage and deadline tracking.
pub struct DsarService {
    store: Store,
    event_bus: broadcast::Sender<DomainEvent>,
}

impl DsarService {
    #[must_use]
    pub const fn new(store: Store, event_bus: broadcast::Sender<DomainEvent>) -> Self {
        Self { store, event_bus }
    }

    pub async fn list(&self, tenant_id: &str) -> Result<Vec<dsar_requests::Model>> {
        self.store.list_dsar_requests(tenant_id).await
    }

    pub async fn get(&self, tenant_id: &str, id: &str) -> Result<Option<dsar_requests::Model>> {
        self.store.get_dsar_request(tenant_id, id).await
    }

    /// Registers a request. Without an explicit deadline the statutory
    /// 15-day window applies.
    pub async fn create(
        &self,
        tenant_id: &str,
        subject_name: &str,
        subject_email: &str,
        request_type: &str,
        deadline: Option<String>,
    ) -> Result<dsar_requests::Model> {
        if subject_name.trim().is_empty() {
            anyhow::bail!("Subject name is required");
        }
        if !subject_email.contains('@') {
            anyhow::bail!("A valid subject email is required");
        }

        let deadline = deadline.unwrap_or_else(|| {
            (chrono::Utc::now() + chrono::Duration::days(DEFAULT_DEADLINE_DAYS)).to_rfc3339()
        });

        self.store
            .create_dsar_request(
                tenant_id,
                DsarInput {
                    subject_name: subject_name.trim().to_string(),
                    subject_email: subject_email.trim().to_string(),
                    request_type: request_type.trim().to_string(),
                    deadline,
                },
            )
            .await
    }

    pub async fn set_status(
        &self,
        tenant_id: &str,
        id: &str,
        status: DsarStatus,
    ) -> Result<Option<dsar_requests::Model>> {
        self.store
            .set_dsar_status(tenant_id, id, &status.to_string())
            .await
    }

    /// Stores the response content and completes the request.
    pub async fn respond(
        &self,
        tenant_id: &str,
        id: &str,
        response_content: &str,
    ) -> Result<Option<dsar_requests::Model>> {
        if response_content.trim().is_empty() {
            anyhow::bail!("Response content cannot be empty");
        }

        self.store
            .respond_dsar_request(tenant_id, id, response_content)
            .await
    }

    /// Flags every open request past its deadline, once per sweep. Returns
    /// the number of overdue requests found.
    pub async fn sweep_overdue(&self) -> Result<usize> {
        let now = chrono::Utc::now().to_rfc3339();
        let overdue = self.store.list_overdue_dsar_requests(&now).await?;

        for request in &overdue {
            warn!(
                protocol = %request.protocol_number,
                deadline = %request.deadline,
                "DSAR past its response deadline"
            );

            let _ = self.event_bus.send(DomainEvent::DsarOverdue {
                tenant_id: request.tenant_id.clone(),
                protocol_number: request.protocol_number.clone(),
                deadline: request.deadline.clone(),
            });
        }

        Ok(overdue.len())
    }
}
