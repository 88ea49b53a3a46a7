//! Domain events broadcast across the system.
//!
//! Every mutation the compliance register cares about is published here and
//! persisted into the audit log by the listener in `services::audit`.

use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum DomainEvent {
    IncidentReported {
        tenant_id: String,
        incident_id: String,
        title: String,
        severity: String,
    },
    IncidentStatusChanged {
        tenant_id: String,
        incident_id: String,
        from: String,
        to: String,
        actor: String,
    },
    RopaEntryCreated {
        tenant_id: String,
        process_name: String,
    },
    RopaEntryDeleted {
        tenant_id: String,
        process_name: String,
    },
    DocumentGenerated {
        tenant_id: String,
        document_id: String,
        title: String,
        ai_assisted: bool,
    },
    DocumentPublished {
        tenant_id: String,
        document_id: String,
        title: String,
        version: i32,
    },
    AwarenessPostPublished {
        tenant_id: String,
        post_id: String,
        title: String,
    },
    DsarOverdue {
        tenant_id: String,
        protocol_number: String,
        deadline: String,
    },
    UserDeactivated {
        tenant_id: String,
        user_id: String,
        actor: String,
    },
    TenantSettingsUpdated {
        tenant_id: String,
        actor: String,
    },
}
