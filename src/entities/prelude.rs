pub use super::audit_logs::Entity as AuditLogs;
pub use super::awareness_posts::Entity as AwarenessPosts;
pub use super::dsar_requests::Entity as DsarRequests;
pub use super::incident_history::Entity as IncidentHistory;
pub use super::incidents::Entity as Incidents;
pub use super::legal_documents::Entity as LegalDocuments;
pub use super::ropa_entries::Entity as RopaEntries;
pub use super::tenants::Entity as Tenants;
pub use super::users::Entity as Users;
pub use super::vendors::Entity as Vendors;
