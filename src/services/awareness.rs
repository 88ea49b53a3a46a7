use anyhow::Result;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::db::{Store, parse_quiz};
use crate::domain::events::DomainEvent;
use crate::domain::types::{AwarenessCategory, Quiz};
use crate::entities::awareness_posts;
use crate::services::generation::{GeneratedPost, GenerationService};

/// Result of answering a post's quiz.
#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub correct: bool,
    pub correct_answer_index: u8,
    pub explanation: String,
}

/// Security-awareness content: posts, publication state, view counts and
/// quiz grading.
pub struct AwarenessService {
    store: Store,
    generation: Arc<GenerationService>,
    event_bus: broadcast::Sender<DomainEvent>,
}

impl AwarenessService {
    #[must_use]
    pub const fn new(
        store: Store,
        generation: Arc<GenerationService>,
        event_bus: broadcast::Sender<DomainEvent>,
    ) -> Self {
        Self {
            store,
            generation,
            event_bus,
        }
    }

    /// Readers without content-management rights only see published posts.
    pub async fn list(
        &self,
        tenant_id: &str,
        include_unpublished: bool,
    ) -> Result<Vec<awareness_posts::Model>> {
        self.store
            .list_awareness_posts(tenant_id, !include_unpublished)
            .await
    }

    pub async fn get(&self, tenant_id: &str, id: &str) -> Result<Option<awareness_posts::Model>> {
        self.store.get_awareness_post(tenant_id, id).await
    }

    pub async fn create(
        &self,
        tenant_id: &str,
        title: &str,
        content: &str,
        category: AwarenessCategory,
        is_published: bool,
        quiz: Option<Quiz>,
    ) -> Result<awareness_posts::Model> {
        if let Some(ref q) = quiz
            && !q.is_valid()
        {
            anyhow::bail!("Quiz must have exactly 4 options and a valid correct answer index");
        }

        let post = self
            .store
            .create_awareness_post(
                tenant_id,
                title,
                content,
                &category.to_string(),
                is_published,
                quiz.as_ref(),
            )
            .await?;

        if post.is_published {
            let _ = self.event_bus.send(DomainEvent::AwarenessPostPublished {
                tenant_id: tenant_id.to_string(),
                post_id: post.id.clone(),
                title: post.title.clone(),
            });
        }

        Ok(post)
    }

    pub async fn set_published(
        &self,
        tenant_id: &str,
        id: &str,
        is_published: bool,
    ) -> Result<Option<awareness_posts::Model>> {
        let post = self
            .store
            .set_awareness_post_published(tenant_id, id, is_published)
            .await?;

        if let Some(ref post) = post
            && is_published
        {
            let _ = self.event_bus.send(DomainEvent::AwarenessPostPublished {
                tenant_id: tenant_id.to_string(),
                post_id: post.id.clone(),
                title: post.title.clone(),
            });
        }

        Ok(post)
    }

    pub async fn record_view(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<awareness_posts::Model>> {
        self.store.increment_awareness_view_count(tenant_id, id).await
    }

    pub async fn delete(&self, tenant_id: &str, id: &str) -> Result<bool> {
        self.store.delete_awareness_post(tenant_id, id).await
    }

    /// Grades a quiz answer. `Ok(None)` when the post is missing or carries
    /// no quiz.
    pub async fn answer_quiz(
        &self,
        tenant_id: &str,
        id: &str,
        answer_index: u8,
    ) -> Result<Option<QuizOutcome>> {
        let Some(post) = self.store.get_awareness_post(tenant_id, id).await? else {
            return Ok(None);
        };

        let Some(quiz) = parse_quiz(post.quiz.as_deref()) else {
            return Ok(None);
        };

        Ok(Some(QuizOutcome {
            correct: answer_index == quiz.correct_answer_index,
            correct_answer_index: quiz.correct_answer_index,
            explanation: quiz.explanation,
        }))
    }

    /// Drafts a training post with the generative model; infallible by
    /// design, falling back to placeholder content.
    pub async fn generate(&self, topic: &str, category: AwarenessCategory) -> GeneratedPost {
        self.generation.generate_awareness_post(topic, category).await
    }
}
