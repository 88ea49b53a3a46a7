use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Bootstrap tenant created on first start. Further tenants are provisioned
/// through `guardia tenant add`.
pub const BOOTSTRAP_TENANT_ID: &str = "550e8400-e29b-41d4-a716-446655440000";
const BOOTSTRAP_TENANT_CNPJ: &str = "00.000.000/0001-00";

/// Default API key (regenerate after first login)
pub const DEFAULT_API_KEY: &str = "guardia_default_api_key_please_regenerate";

/// Hash the default password using Argon2id
fn hash_default_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let password = b"password";
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password, &salt)
        .expect("Failed to hash default password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Tenants)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(RopaEntries)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Incidents)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(IncidentHistory)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(LegalDocuments)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(AwarenessPosts)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(AuditLogs)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let conn = manager.get_connection();

        // users.email is unique within a tenant, not globally
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_tenant_email ON users(tenant_id, email)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_incident_history_incident ON incident_history(incident_id)",
        )
        .await?;

        // Seed the bootstrap tenant and its admin user
        let now = chrono::Utc::now().to_rfc3339();

        let insert_tenant = sea_orm_migration::sea_query::Query::insert()
            .into_table(Tenants)
            .columns([
                crate::entities::tenants::Column::Id,
                crate::entities::tenants::Column::Cnpj,
                crate::entities::tenants::Column::Name,
                crate::entities::tenants::Column::PlanStatus,
                crate::entities::tenants::Column::CreatedAt,
            ])
            .values_panic([
                BOOTSTRAP_TENANT_ID.into(),
                BOOTSTRAP_TENANT_CNPJ.into(),
                "Default Organization".into(),
                "active".into(),
                now.clone().into(),
            ])
            .to_owned();

        manager.exec_stmt(insert_tenant).await?;

        let password_hash = hash_default_password();

        let insert_admin = sea_orm_migration::sea_query::Query::insert()
            .into_table(Users)
            .columns([
                crate::entities::users::Column::Id,
                crate::entities::users::Column::TenantId,
                crate::entities::users::Column::Email,
                crate::entities::users::Column::Name,
                crate::entities::users::Column::Role,
                crate::entities::users::Column::IsActive,
                crate::entities::users::Column::PasswordHash,
                crate::entities::users::Column::ApiKey,
                crate::entities::users::Column::CreatedAt,
                crate::entities::users::Column::UpdatedAt,
            ])
            .values_panic([
                uuid::Uuid::new_v4().to_string().into(),
                BOOTSTRAP_TENANT_ID.into(),
                "admin@localhost".into(),
                "Administrator".into(),
                "company_admin".into(),
                true.into(),
                password_hash.into(),
                DEFAULT_API_KEY.into(),
                now.clone().into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert_admin).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AwarenessPosts).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LegalDocuments).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncidentHistory).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incidents).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RopaEntries).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenants).to_owned())
            .await?;

        Ok(())
    }
}
