use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::types::{Quiz, TenantSettings};
use crate::entities::{
    awareness_posts, dsar_requests, incident_history, incidents, legal_documents, ropa_entries,
    tenants, vendors,
};

pub mod migrator;
pub mod repositories;

pub use crate::entities::audit_logs::Model as AuditLog;
pub use repositories::awareness::parse_quiz;
pub use repositories::dsar::DsarInput;
pub use repositories::incident::{HistoryEntry, IncidentInput};
pub use repositories::ropa::RopaInput;
pub use repositories::tenant::parse_settings;
pub use repositories::user::User;
pub use repositories::vendor::VendorInput;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn tenant_repo(&self) -> repositories::tenant::TenantRepository {
        repositories::tenant::TenantRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn ropa_repo(&self) -> repositories::ropa::RopaRepository {
        repositories::ropa::RopaRepository::new(self.conn.clone())
    }

    fn incident_repo(&self) -> repositories::incident::IncidentRepository {
        repositories::incident::IncidentRepository::new(self.conn.clone())
    }

    fn document_repo(&self) -> repositories::document::DocumentRepository {
        repositories::document::DocumentRepository::new(self.conn.clone())
    }

    fn awareness_repo(&self) -> repositories::awareness::AwarenessRepository {
        repositories::awareness::AwarenessRepository::new(self.conn.clone())
    }

    fn dsar_repo(&self) -> repositories::dsar::DsarRepository {
        repositories::dsar::DsarRepository::new(self.conn.clone())
    }

    fn vendor_repo(&self) -> repositories::vendor::VendorRepository {
        repositories::vendor::VendorRepository::new(self.conn.clone())
    }

    fn audit_repo(&self) -> repositories::audit::AuditRepository {
        repositories::audit::AuditRepository::new(self.conn.clone())
    }

    // ---- Tenants ----

    pub async fn get_tenant(&self, id: &str) -> Result<Option<tenants::Model>> {
        self.tenant_repo().get(id).await
    }

    pub async fn get_tenant_by_cnpj(&self, cnpj: &str) -> Result<Option<tenants::Model>> {
        self.tenant_repo().get_by_cnpj(cnpj).await
    }

    pub async fn list_tenants(&self) -> Result<Vec<tenants::Model>> {
        self.tenant_repo().list().await
    }

    pub async fn create_tenant(
        &self,
        cnpj: &str,
        name: &str,
        plan_status: &str,
        contact_email: Option<&str>,
    ) -> Result<tenants::Model> {
        self.tenant_repo()
            .create(cnpj, name, plan_status, contact_email)
            .await
    }

    pub async fn update_tenant_profile(
        &self,
        id: &str,
        name: &str,
        contact_email: Option<&str>,
        settings: &TenantSettings,
    ) -> Result<tenants::Model> {
        self.tenant_repo()
            .update_profile(id, name, contact_email, settings)
            .await
    }

    pub async fn set_tenant_plan_status(&self, id: &str, plan_status: &str) -> Result<()> {
        self.tenant_repo().set_plan_status(id, plan_status).await
    }

    // ---- Users ----

    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn list_users(&self, tenant_id: &str) -> Result<Vec<User>> {
        self.user_repo().list_for_tenant(tenant_id).await
    }

    pub async fn count_active_admins(&self, tenant_id: &str) -> Result<u64> {
        self.user_repo().count_active_admins(tenant_id).await
    }

    pub async fn create_user(
        &self,
        tenant_id: &str,
        email: &str,
        name: &str,
        role: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(tenant_id, email, name, role, password, security)
            .await
    }

    pub async fn update_user(
        &self,
        id: &str,
        name: &str,
        role: &str,
        is_active: bool,
    ) -> Result<Option<User>> {
        self.user_repo().update(id, name, role, is_active).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn touch_last_login(&self, id: &str) -> Result<()> {
        self.user_repo().touch_last_login(id).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn update_user_password(
        &self,
        id: &str,
        new_password: &str,
        security: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(id, new_password, security)
            .await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn regenerate_user_api_key(&self, id: &str) -> Result<String> {
        self.user_repo().regenerate_api_key(id).await
    }

    // ---- ROPA ----

    pub async fn list_ropa_entries(&self, tenant_id: &str) -> Result<Vec<ropa_entries::Model>> {
        self.ropa_repo().list_for_tenant(tenant_id).await
    }

    pub async fn get_ropa_entry(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<ropa_entries::Model>> {
        self.ropa_repo().get(tenant_id, id).await
    }

    pub async fn create_ropa_entry(
        &self,
        tenant_id: &str,
        input: RopaInput,
    ) -> Result<ropa_entries::Model> {
        self.ropa_repo().create(tenant_id, input).await
    }

    pub async fn update_ropa_entry(
        &self,
        tenant_id: &str,
        id: &str,
        input: RopaInput,
    ) -> Result<Option<ropa_entries::Model>> {
        self.ropa_repo().update(tenant_id, id, input).await
    }

    pub async fn delete_ropa_entry(&self, tenant_id: &str, id: &str) -> Result<bool> {
        self.ropa_repo().delete(tenant_id, id).await
    }

    pub async fn ropa_data_types(&self, tenant_id: &str) -> Result<Vec<String>> {
        self.ropa_repo().data_types_for_tenant(tenant_id).await
    }

    // ---- Incidents ----

    pub async fn list_incidents(&self, tenant_id: &str) -> Result<Vec<incidents::Model>> {
        self.incident_repo().list_for_tenant(tenant_id).await
    }

    pub async fn get_incident(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<incidents::Model>> {
        self.incident_repo().get(tenant_id, id).await
    }

    pub async fn incident_history(
        &self,
        incident_id: &str,
    ) -> Result<Vec<incident_history::Model>> {
        self.incident_repo().history(incident_id).await
    }

    pub async fn report_incident(
        &self,
        tenant_id: &str,
        input: IncidentInput,
        initial: HistoryEntry,
    ) -> Result<incidents::Model> {
        self.incident_repo().report(tenant_id, input, initial).await
    }

    pub async fn set_incident_status(
        &self,
        tenant_id: &str,
        id: &str,
        status: &str,
        entry: HistoryEntry,
    ) -> Result<Option<incidents::Model>> {
        self.incident_repo()
            .set_status(tenant_id, id, status, entry)
            .await
    }

    pub async fn set_incident_remediation_plan(
        &self,
        tenant_id: &str,
        id: &str,
        plan: &str,
    ) -> Result<Option<incidents::Model>> {
        self.incident_repo()
            .set_remediation_plan(tenant_id, id, plan)
            .await
    }

    pub async fn count_incidents_by_status(&self, tenant_id: &str, status: &str) -> Result<u64> {
        self.incident_repo().count_by_status(tenant_id, status).await
    }

    // ---- Legal documents ----

    pub async fn list_documents(&self, tenant_id: &str) -> Result<Vec<legal_documents::Model>> {
        self.document_repo().list_for_tenant(tenant_id).await
    }

    pub async fn get_document(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<legal_documents::Model>> {
        self.document_repo().get(tenant_id, id).await
    }

    pub async fn create_document(
        &self,
        tenant_id: &str,
        title: &str,
        content: &str,
        doc_type: &str,
    ) -> Result<legal_documents::Model> {
        self.document_repo()
            .create(tenant_id, title, content, doc_type)
            .await
    }

    pub async fn update_document(
        &self,
        tenant_id: &str,
        id: &str,
        title: &str,
        content: &str,
    ) -> Result<Option<legal_documents::Model>> {
        self.document_repo().update(tenant_id, id, title, content).await
    }

    pub async fn set_document_published(
        &self,
        tenant_id: &str,
        id: &str,
        is_published: bool,
    ) -> Result<Option<legal_documents::Model>> {
        self.document_repo()
            .set_published(tenant_id, id, is_published)
            .await
    }

    pub async fn delete_document(&self, tenant_id: &str, id: &str) -> Result<bool> {
        self.document_repo().delete(tenant_id, id).await
    }

    // ---- Awareness posts ----

    pub async fn list_awareness_posts(
        &self,
        tenant_id: &str,
        published_only: bool,
    ) -> Result<Vec<awareness_posts::Model>> {
        self.awareness_repo()
            .list_for_tenant(tenant_id, published_only)
            .await
    }

    pub async fn get_awareness_post(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<awareness_posts::Model>> {
        self.awareness_repo().get(tenant_id, id).await
    }

    pub async fn create_awareness_post(
        &self,
        tenant_id: &str,
        title: &str,
        content: &str,
        category: &str,
        is_published: bool,
        quiz: Option<&Quiz>,
    ) -> Result<awareness_posts::Model> {
        self.awareness_repo()
            .create(tenant_id, title, content, category, is_published, quiz)
            .await
    }

    pub async fn set_awareness_post_published(
        &self,
        tenant_id: &str,
        id: &str,
        is_published: bool,
    ) -> Result<Option<awareness_posts::Model>> {
        self.awareness_repo()
            .set_published(tenant_id, id, is_published)
            .await
    }

    pub async fn increment_awareness_view_count(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<awareness_posts::Model>> {
        self.awareness_repo()
            .increment_view_count(tenant_id, id)
            .await
    }

    pub async fn delete_awareness_post(&self, tenant_id: &str, id: &str) -> Result<bool> {
        self.awareness_repo().delete(tenant_id, id).await
    }

    pub async fn count_published_awareness_posts(&self, tenant_id: &str) -> Result<u64> {
        self.awareness_repo().count_published(tenant_id).await
    }

    // ---- DSAR ----

    pub async fn list_dsar_requests(&self, tenant_id: &str) -> Result<Vec<dsar_requests::Model>> {
        self.dsar_repo().list_for_tenant(tenant_id).await
    }

    pub async fn get_dsar_request(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<dsar_requests::Model>> {
        self.dsar_repo().get(tenant_id, id).await
    }

    pub async fn create_dsar_request(
        &self,
        tenant_id: &str,
        input: DsarInput,
    ) -> Result<dsar_requests::Model> {
        self.dsar_repo().create(tenant_id, input).await
    }

    pub async fn set_dsar_status(
        &self,
        tenant_id: &str,
        id: &str,
        status: &str,
    ) -> Result<Option<dsar_requests::Model>> {
        self.dsar_repo().set_status(tenant_id, id, status).await
    }

    pub async fn respond_dsar_request(
        &self,
        tenant_id: &str,
        id: &str,
        response_content: &str,
    ) -> Result<Option<dsar_requests::Model>> {
        self.dsar_repo().respond(tenant_id, id, response_content).await
    }

    pub async fn list_overdue_dsar_requests(&self, now: &str) -> Result<Vec<dsar_requests::Model>> {
        self.dsar_repo().list_overdue(now).await
    }

    // ---- Vendors ----

    pub async fn list_vendors(&self, tenant_id: &str) -> Result<Vec<vendors::Model>> {
        self.vendor_repo().list_for_tenant(tenant_id).await
    }

    pub async fn get_vendor(&self, tenant_id: &str, id: &str) -> Result<Option<vendors::Model>> {
        self.vendor_repo().get(tenant_id, id).await
    }

    pub async fn create_vendor(
        &self,
        tenant_id: &str,
        input: VendorInput,
    ) -> Result<vendors::Model> {
        self.vendor_repo().create(tenant_id, input).await
    }

    pub async fn update_vendor(
        &self,
        tenant_id: &str,
        id: &str,
        input: VendorInput,
    ) -> Result<Option<vendors::Model>> {
        self.vendor_repo().update(tenant_id, id, input).await
    }

    pub async fn delete_vendor(&self, tenant_id: &str, id: &str) -> Result<bool> {
        self.vendor_repo().delete(tenant_id, id).await
    }

    // ---- Audit log ----

    pub async fn add_audit_log(
        &self,
        tenant_id: Option<&str>,
        event_type: &str,
        level: &str,
        message: &str,
        details: Option<String>,
    ) -> Result<()> {
        self.audit_repo()
            .add(tenant_id, event_type, level, message, details)
            .await
    }

    pub async fn get_audit_logs(
        &self,
        tenant_id: &str,
        page: u64,
        page_size: u64,
        level_filter: Option<String>,
        event_type_filter: Option<String>,
    ) -> Result<(Vec<AuditLog>, u64)> {
        self.audit_repo()
            .get_logs(tenant_id, page, page_size, level_filter, event_type_filter)
            .await
    }

    pub async fn get_all_audit_logs(&self, tenant_id: &str) -> Result<Vec<AuditLog>> {
        self.audit_repo().get_all_logs(tenant_id).await
    }

    pub async fn clear_audit_logs(&self, tenant_id: &str) -> Result<()> {
        self.audit_repo().clear_logs(tenant_id).await
    }
}
