use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entities::{incident_history, incidents, prelude::*};

/// Input for reporting a new incident.
#[derive(Debug, Clone)]
pub struct IncidentInput {
    pub title: String,
    pub description: String,
    pub severity: String,
    pub affected_data_types: Option<Vec<String>>,
    pub date_occurred: Option<String>,
    pub analysis_report: Option<String>,
}

/// A history row to append. `date` is stamped by the repository.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub action: String,
    pub description: String,
    pub user: String,
}

pub struct IncidentRepository {
    conn: DatabaseConnection,
}

impl IncidentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<incidents::Model>> {
        Incidents::find()
            .filter(incidents::Column::TenantId.eq(tenant_id))
            .order_by_desc(incidents::Column::DateReported)
            .all(&self.conn)
            .await
            .context("Failed to list incidents")
    }

    pub async fn get(&self, tenant_id: &str, id: &str) -> Result<Option<incidents::Model>> {
        Incidents::find_by_id(id)
            .filter(incidents::Column::TenantId.eq(tenant_id))
            .one(&self.conn)
            .await
            .context("Failed to query incident")
    }

    pub async fn history(&self, incident_id: &str) -> Result<Vec<incident_history::Model>> {
        IncidentHistory::find()
            .filter(incident_history::Column::IncidentId.eq(incident_id))
            .order_by_asc(incident_history::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to load incident history")
    }

    /// Creates the incident and its initial history row in one transaction.
    pub async fn report(
        &self,
        tenant_id: &str,
        input: IncidentInput,
        initial: HistoryEntry,
    ) -> Result<incidents::Model> {
        let txn = self.conn.begin().await?;

        let now = chrono::Utc::now().to_rfc3339();
        let id = uuid::Uuid::new_v4().to_string();

        let affected = match &input.affected_data_types {
            Some(types) => {
                Some(serde_json::to_string(types).context("Failed to encode data types")?)
            }
            None => None,
        };

        let incident = incidents::ActiveModel {
            id: Set(id.clone()),
            tenant_id: Set(tenant_id.to_string()),
            title: Set(input.title),
            description: Set(input.description),
            severity: Set(input.severity),
            status: Set("open".to_string()),
            affected_data_types: Set(affected),
            date_occurred: Set(input.date_occurred),
            date_reported: Set(now.clone()),
            analysis_report: Set(input.analysis_report),
            remediation_plan: Set(None),
        }
        .insert(&txn)
        .await
        .context("Failed to create incident")?;

        incident_history::ActiveModel {
            incident_id: Set(id),
            date: Set(now),
            action: Set(initial.action),
            description: Set(initial.description),
            user: Set(initial.user),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to record initial history entry")?;

        txn.commit().await?;
        Ok(incident)
    }

    /// Sets the status and appends the audit-trail row atomically. History is
    /// append-only; nothing here ever rewrites an existing row.
    pub async fn set_status(
        &self,
        tenant_id: &str,
        id: &str,
        status: &str,
        entry: HistoryEntry,
    ) -> Result<Option<incidents::Model>> {
        let Some(incident) = self.get(tenant_id, id).await? else {
            return Ok(None);
        };

        let txn = self.conn.begin().await?;

        let mut active: incidents::ActiveModel = incident.into();
        active.status = Set(status.to_string());
        let updated = active.update(&txn).await?;

        incident_history::ActiveModel {
            incident_id: Set(id.to_string()),
            date: Set(chrono::Utc::now().to_rfc3339()),
            action: Set(entry.action),
            description: Set(entry.description),
            user: Set(entry.user),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to append history entry")?;

        txn.commit().await?;
        Ok(Some(updated))
    }

    pub async fn set_remediation_plan(
        &self,
        tenant_id: &str,
        id: &str,
        plan: &str,
    ) -> Result<Option<incidents::Model>> {
        let Some(incident) = self.get(tenant_id, id).await? else {
            return Ok(None);
        };

        let mut active: incidents::ActiveModel = incident.into();
        active.remediation_plan = Set(Some(plan.to_string()));
        let updated = active.update(&self.conn).await?;

        Ok(Some(updated))
    }

    pub async fn count_by_status(&self, tenant_id: &str, status: &str) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        Incidents::find()
            .filter(incidents::Column::TenantId.eq(tenant_id))
            .filter(incidents::Column::Status.eq(status))
            .count(&self.conn)
            .await
            .context("Failed to count incidents")
    }
}
