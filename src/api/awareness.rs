use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::types::{AwarenessPostDto, GeneratedPostDto, QuizResultDto};
use crate::domain::types::{AwarenessCategory, Quiz};
use crate::services::SessionUser;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub category: AwarenessCategory,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub quiz: Option<Quiz>,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub is_published: bool,
}

#[derive(Debug, Deserialize)]
pub struct QuizAnswerRequest {
    pub answer_index: u8,
}

#[derive(Debug, Deserialize)]
pub struct GeneratePostRequest {
    pub topic: String,
    pub category: AwarenessCategory,
}

fn require_editor_role(user: &SessionUser) -> Result<(), ApiError> {
    if user.role.can_manage_compliance() {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "Managing awareness content requires a DPO or admin role",
        ))
    }
}

/// GET /awareness: readers only see published posts; editors see drafts too.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<Vec<AwarenessPostDto>>>, ApiError> {
    let include_unpublished = user.role.can_manage_compliance();

    let posts = state
        .awareness_service
        .list(&user.tenant_id, include_unpublished)
        .await?;

    let dtos = posts.into_iter().map(AwarenessPostDto::from).collect();

    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<ApiResponse<AwarenessPostDto>>, ApiError> {
    require_editor_role(&user)?;

    if payload.title.trim().is_empty() {
        return Err(ApiError::validation("Title is required"));
    }

    if let Some(ref quiz) = payload.quiz
        && !quiz.is_valid()
    {
        return Err(ApiError::validation(
            "Quiz must have exactly 4 options and a valid correct answer index",
        ));
    }

    let post = state
        .awareness_service
        .create(
            &user.tenant_id,
            payload.title.trim(),
            &payload.content,
            payload.category,
            payload.is_published,
            payload.quiz,
        )
        .await?;

    Ok(Json(ApiResponse::success(AwarenessPostDto::from(post))))
}

pub async fn set_published(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(payload): Json<PublishRequest>,
) -> Result<Json<ApiResponse<AwarenessPostDto>>, ApiError> {
    require_editor_role(&user)?;

    let post = state
        .awareness_service
        .set_published(&user.tenant_id, &id, payload.is_published)
        .await?
        .ok_or_else(|| ApiError::not_found("Awareness post", &id))?;

    Ok(Json(ApiResponse::success(AwarenessPostDto::from(post))))
}

/// POST /awareness/{id}/view: view counts only ever increment.
pub async fn record_view(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AwarenessPostDto>>, ApiError> {
    let post = state
        .awareness_service
        .record_view(&user.tenant_id, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Awareness post", &id))?;

    Ok(Json(ApiResponse::success(AwarenessPostDto::from(post))))
}

pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_editor_role(&user)?;

    let deleted = state.awareness_service.delete(&user.tenant_id, &id).await?;

    if deleted {
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(ApiError::not_found("Awareness post", &id))
    }
}

/// POST /awareness/{id}/quiz: grades the reader's answer.
pub async fn answer_quiz(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(payload): Json<QuizAnswerRequest>,
) -> Result<Json<ApiResponse<QuizResultDto>>, ApiError> {
    if payload.answer_index > 3 {
        return Err(ApiError::validation("Answer index must be between 0 and 3"));
    }

    let outcome = state
        .awareness_service
        .answer_quiz(&user.tenant_id, &id, payload.answer_index)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post {id} has no quiz")))?;

    Ok(Json(ApiResponse::success(QuizResultDto {
        correct: outcome.correct,
        correct_answer_index: outcome.correct_answer_index,
        explanation: outcome.explanation,
    })))
}

/// POST /awareness/generate: drafts a training post with the generative
/// model. Returns the draft without saving; the editor decides what to keep.
pub async fn generate_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<GeneratePostRequest>,
) -> Result<Json<ApiResponse<GeneratedPostDto>>, ApiError> {
    require_editor_role(&user)?;

    if payload.topic.trim().is_empty() {
        return Err(ApiError::validation("Topic is required"));
    }

    let generated = state
        .awareness_service
        .generate(payload.topic.trim(), payload.category)
        .await;

    Ok(Json(ApiResponse::success(GeneratedPostDto {
        title: generated.title,
        content: generated.content,
        quiz: generated.quiz,
    })))
}
