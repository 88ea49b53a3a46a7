use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::types::Quiz;
use crate::entities::{awareness_posts, prelude::*};

pub struct AwarenessRepository {
    conn: DatabaseConnection,
}

impl AwarenessRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_tenant(
        &self,
        tenant_id: &str,
        published_only: bool,
    ) -> Result<Vec<awareness_posts::Model>> {
        let mut query = AwarenessPosts::find()
            .filter(awareness_posts::Column::TenantId.eq(tenant_id))
            .order_by_desc(awareness_posts::Column::CreatedAt);

        if published_only {
            query = query.filter(awareness_posts::Column::IsPublished.eq(true));
        }

        query.all(&self.conn).await.context("Failed to list awareness posts")
    }

    pub async fn get(&self, tenant_id: &str, id: &str) -> Result<Option<awareness_posts::Model>> {
        AwarenessPosts::find_by_id(id)
            .filter(awareness_posts::Column::TenantId.eq(tenant_id))
            .one(&self.conn)
            .await
            .context("Failed to query awareness post")
    }

    pub async fn create(
        &self,
        tenant_id: &str,
        title: &str,
        content: &str,
        category: &str,
        is_published: bool,
        quiz: Option<&Quiz>,
    ) -> Result<awareness_posts::Model> {
        let quiz_json = match quiz {
            Some(q) => Some(serde_json::to_string(q).context("Failed to encode quiz")?),
            None => None,
        };

        let model = awareness_posts::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            tenant_id: Set(tenant_id.to_string()),
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            category: Set(category.to_string()),
            is_published: Set(is_published),
            view_count: Set(0),
            quiz: Set(quiz_json),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        model.insert(&self.conn).await.context("Failed to create awareness post")
    }

    pub async fn set_published(
        &self,
        tenant_id: &str,
        id: &str,
        is_published: bool,
    ) -> Result<Option<awareness_posts::Model>> {
        let Some(post) = self.get(tenant_id, id).await? else {
            return Ok(None);
        };

        let mut active: awareness_posts::ActiveModel = post.into();
        active.is_published = Set(is_published);

        let updated = active.update(&self.conn).await?;
        Ok(Some(updated))
    }

    pub async fn increment_view_count(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<awareness_posts::Model>> {
        let Some(post) = self.get(tenant_id, id).await? else {
            return Ok(None);
        };

        let next = post.view_count + 1;
        let mut active: awareness_posts::ActiveModel = post.into();
        active.view_count = Set(next);

        let updated = active.update(&self.conn).await?;
        Ok(Some(updated))
    }

    pub async fn delete(&self, tenant_id: &str, id: &str) -> Result<bool> {
        let result = AwarenessPosts::delete_many()
            .filter(awareness_posts::Column::Id.eq(id))
            .filter(awareness_posts::Column::TenantId.eq(tenant_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_published(&self, tenant_id: &str) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        AwarenessPosts::find()
            .filter(awareness_posts::Column::TenantId.eq(tenant_id))
            .filter(awareness_posts::Column::IsPublished.eq(true))
            .count(&self.conn)
            .await
            .context("Failed to count published posts")
    }
}

/// Parses the quiz JSON blob; a malformed blob reads as no quiz.
#[must_use]
pub fn parse_quiz(raw: Option<&str>) -> Option<Quiz> {
    raw.and_then(|s| serde_json::from_str(s).ok())
}
