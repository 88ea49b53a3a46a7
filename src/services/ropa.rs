use anyhow::Result;
use tokio::sync::broadcast;

use crate::db::{RopaInput, Store};
use crate::domain::events::DomainEvent;
use crate::entities::ropa_entries;

/// CRUD over the tenant's Record of Processing Activities.
pub struct RopaService {
    store: Store,
    event_bus: broadcast::Sender<DomainEvent>,
}

impl RopaService {
    #[must_use]
    pub const fn new(store: Store, event_bus: broadcast::Sender<DomainEvent>) -> Self {
        Self { store, event_bus }
    }

    pub async fn list(&self, tenant_id: &str) -> Result<Vec<ropa_entries::Model>> {
        self.store.list_ropa_entries(tenant_id).await
    }

    pub async fn get(&self, tenant_id: &str, id: &str) -> Result<Option<ropa_entries::Model>> {
        self.store.get_ropa_entry(tenant_id, id).await
    }

    pub async fn create(&self, tenant_id: &str, input: RopaInput) -> Result<ropa_entries::Model> {
        let entry = self.store.create_ropa_entry(tenant_id, input).await?;

        let _ = self.event_bus.send(DomainEvent::RopaEntryCreated {
            tenant_id: tenant_id.to_string(),
            process_name: entry.process_name.clone(),
        });

        Ok(entry)
    }

    pub async fn update(
        &self,
        tenant_id: &str,
        id: &str,
        input: RopaInput,
    ) -> Result<Option<ropa_entries::Model>> {
        self.store.update_ropa_entry(tenant_id, id, input).await
    }

    pub async fn delete(&self, tenant_id: &str, id: &str) -> Result<bool> {
        let Some(entry) = self.store.get_ropa_entry(tenant_id, id).await? else {
            return Ok(false);
        };

        let deleted = self.store.delete_ropa_entry(tenant_id, id).await?;

        if deleted {
            let _ = self.event_bus.send(DomainEvent::RopaEntryDeleted {
                tenant_id: tenant_id.to_string(),
                process_name: entry.process_name,
            });
        }

        Ok(deleted)
    }
}
