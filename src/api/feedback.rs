use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{routing::get, routing::post, routing::put, Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentSession;
use crate::core::state::AppState;
use crate::models::records::Feedback;
use crate::models::types::EntityKind;
use crate::schemas::feedback::{
    FeedbackBatchCreate, FeedbackBatchResponse, FeedbackCreate, FeedbackEdit,
};
use crate::services::feedback_authoring;
use crate::services::feedback_index::{self, BackendFeedbackSource};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_feedback))
        .route("/batch", post(create_feedback_batch))
        .route("/:feedback_id", put(update_feedback).delete(delete_feedback))
        .route("/:kind/:entity_id", get(list_feedback))
}

/// Feedback attached to one subject, assignment or student. Nothing recorded reads as `[]`.
async fn list_feedback(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path((kind, entity_id)): Path<(String, String)>,
) -> Result<Json<Vec<Feedback>>, ApiError> {
    let kind = EntityKind::parse(&kind)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown feedback target: {kind}")))?;

    if kind == EntityKind::Student && !session.can_view_student(&entity_id) {
        return Err(ApiError::Forbidden("Not allowed to view this student"));
    }

    let source = BackendFeedbackSource::new(state.backend().clone(), session);
    let feedback = feedback_index::lookup_one(&source, kind, &entity_id).await?;
    Ok(Json(feedback))
}

async fn create_feedback(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<FeedbackCreate>,
) -> Result<(StatusCode, Json<Feedback>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let created = feedback_authoring::create(state.backend(), &session, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_feedback_batch(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<FeedbackBatchCreate>,
) -> Result<(StatusCode, Json<FeedbackBatchResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let created = feedback_authoring::create_batch(state.backend(), &session, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_feedback(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(feedback_id): Path<String>,
    Json(payload): Json<FeedbackEdit>,
) -> Result<Json<Feedback>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let updated = feedback_authoring::edit(state.backend(), &session, &feedback_id, payload).await?;
    Ok(Json(updated))
}

async fn delete_feedback(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(feedback_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    feedback_authoring::remove(state.backend(), &session, &feedback_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
