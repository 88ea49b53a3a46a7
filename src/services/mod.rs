pub mod audit;
pub use audit::AuditService;

pub mod generation;
pub use generation::GenerationService;

pub mod export;
pub use export::ExportFormat;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult, SessionUser, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod incident_service;
pub mod incident_service_impl;
pub use incident_service::{IncidentDetail, IncidentError, IncidentService, ReportIncidentInput};
pub use incident_service_impl::SeaOrmIncidentService;

pub mod document_service;
pub mod document_service_impl;
pub use document_service::{DocumentError, DocumentInput, DocumentService, GeneratedDocument};
pub use document_service_impl::SeaOrmDocumentService;

pub mod ropa;
pub use ropa::RopaService;

pub mod awareness;
pub use awareness::{AwarenessService, QuizOutcome};

pub mod tenant;
pub use tenant::{TenantProfile, TenantService};

pub mod dsar;
pub use dsar::DsarService;
