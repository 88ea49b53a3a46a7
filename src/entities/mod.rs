pub mod prelude;

pub mod audit_logs;
pub mod awareness_posts;
pub mod dsar_requests;
pub mod incident_history;
pub mod incidents;
pub mod legal_documents;
pub mod ropa_entries;
pub mod tenants;
pub mod users;
pub mod vendors;
