use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::clients::gemini::GeminiClient;
use crate::config::Config;
use crate::db::Store;
use crate::domain::events::DomainEvent;
use crate::services::{
    AuditService, AuthService, AwarenessService, DocumentService, DsarService, GenerationService,
    IncidentService, RopaService, SeaOrmAuthService, SeaOrmDocumentService, SeaOrmIncidentService,
    TenantService,
};

pub mod auth;
mod awareness;
mod dashboard;
mod documents;
mod dsar;
mod error;
mod incidents;
mod observability;
mod ropa;
mod settings;
mod system;
pub mod types;
mod vendors;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::{RwLock, broadcast};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub event_bus: broadcast::Sender<DomainEvent>,

    pub auth_service: Arc<dyn AuthService>,

    pub incident_service: Arc<dyn IncidentService>,

    pub document_service: Arc<dyn DocumentService>,

    pub ropa_service: Arc<RopaService>,

    pub awareness_service: Arc<AwarenessService>,

    pub tenant_service: Arc<TenantService>,

    pub dsar_service: Arc<DsarService>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size);

    let audit_service = Arc::new(AuditService::new(store.clone(), event_bus.clone()));
    audit_service.start_listener();

    let gemini = GeminiClient::new(&config.ai)?;
    let generation = Arc::new(GenerationService::new(gemini, config.ai.enabled));

    let auth_service = Arc::new(SeaOrmAuthService::new(
        store.clone(),
        config.security.clone(),
    )) as Arc<dyn AuthService>;

    let incident_service = Arc::new(SeaOrmIncidentService::new(
        store.clone(),
        generation.clone(),
        event_bus.clone(),
    )) as Arc<dyn IncidentService>;

    let document_service = Arc::new(SeaOrmDocumentService::new(
        store.clone(),
        generation.clone(),
        event_bus.clone(),
    )) as Arc<dyn DocumentService>;

    let ropa_service = Arc::new(RopaService::new(store.clone(), event_bus.clone()));

    let awareness_service = Arc::new(AwarenessService::new(
        store.clone(),
        generation,
        event_bus.clone(),
    ));

    let tenant_service = Arc::new(TenantService::new(
        store.clone(),
        config.security.clone(),
        event_bus.clone(),
    ));

    let dsar_service = Arc::new(DsarService::new(store.clone(), event_bus.clone()));

    Ok(Arc::new(AppState {
        config: Arc::new(RwLock::new(config)),
        store,
        event_bus,
        auth_service,
        incident_service,
        document_service,
        ropa_service,
        awareness_service,
        tenant_service,
        dsar_service,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, session_timeout) = {
        let config = state.config.read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            i64::from(config.server.session_timeout_minutes),
        )
    };

    let protected_routes = create_protected_router(state.clone());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_timeout,
        )));

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/password", put(auth::change_password))
        .route("/auth/api-key", get(auth::get_api_key))
        .route("/auth/api-key/regenerate", post(auth::regenerate_api_key))
        .route("/dashboard/stats", get(dashboard::get_stats))
        .route("/ropa", get(ropa::list_entries))
        .route("/ropa", post(ropa::create_entry))
        .route("/ropa/export", get(ropa::export_register))
        .route("/ropa/{id}", put(ropa::update_entry))
        .route("/ropa/{id}", delete(ropa::delete_entry))
        .route("/incidents", get(incidents::list_incidents))
        .route("/incidents", post(incidents::report_incident))
        .route("/incidents/export", get(incidents::export_register))
        .route("/incidents/analyze", post(incidents::analyze_incident))
        .route("/incidents/{id}", get(incidents::get_incident))
        .route("/incidents/{id}/status", post(incidents::update_status))
        .route(
            "/incidents/{id}/remediation",
            put(incidents::set_remediation_plan),
        )
        .route(
            "/incidents/{id}/audit/export",
            get(incidents::export_audit),
        )
        .route("/documents", get(documents::list_documents))
        .route("/documents", post(documents::create_document))
        .route("/documents/generate", post(documents::generate_document))
        .route("/documents/{id}", get(documents::get_document))
        .route("/documents/{id}", put(documents::update_document))
        .route("/documents/{id}", delete(documents::delete_document))
        .route("/documents/{id}/publish", post(documents::set_published))
        .route("/awareness", get(awareness::list_posts))
        .route("/awareness", post(awareness::create_post))
        .route("/awareness/generate", post(awareness::generate_post))
        .route("/awareness/{id}", delete(awareness::delete_post))
        .route("/awareness/{id}/publish", post(awareness::set_published))
        .route("/awareness/{id}/view", post(awareness::record_view))
        .route("/awareness/{id}/quiz", post(awareness::answer_quiz))
        .route("/dsar", get(dsar::list_requests))
        .route("/dsar", post(dsar::create_request))
        .route("/dsar/{id}/status", post(dsar::update_status))
        .route("/dsar/{id}/respond", post(dsar::respond))
        .route("/vendors", get(vendors::list_vendors))
        .route("/vendors", post(vendors::create_vendor))
        .route("/vendors/{id}", put(vendors::update_vendor))
        .route("/vendors/{id}", delete(vendors::delete_vendor))
        .route("/settings/tenant", get(settings::get_tenant))
        .route("/settings/tenant", put(settings::update_tenant))
        .route("/settings/users", get(settings::list_users))
        .route("/settings/users", post(settings::create_user))
        .route("/settings/users/{id}", put(settings::update_user))
        .route("/settings/users/{id}", delete(settings::delete_user))
        .route("/system/status", get(system::get_status))
        .route("/system/config", get(system::get_config))
        .route("/system/config", put(system::update_config))
        .route("/system/logs", get(system::get_logs))
        .route("/system/logs/export", get(system::export_logs))
        .route("/system/logs", delete(system::clear_logs))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
