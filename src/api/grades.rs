use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{routing::post, routing::put, Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentSession;
use crate::core::state::AppState;
use crate::models::records::Grade;
use crate::schemas::grade::GradeForm;
use crate::services::grade_entry;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_grade))
        .route("/:grade_id", put(update_grade).delete(delete_grade))
}

async fn create_grade(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<GradeForm>,
) -> Result<(StatusCode, Json<Grade>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let grade = grade_entry::create(state.backend(), &session, &payload).await?;
    Ok((StatusCode::CREATED, Json(grade)))
}

async fn update_grade(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(grade_id): Path<String>,
    Json(payload): Json<GradeForm>,
) -> Result<Json<Grade>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let grade = grade_entry::update(state.backend(), &session, &grade_id, &payload).await?;
    Ok(Json(grade))
}

async fn delete_grade(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(grade_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    grade_entry::delete(state.backend(), &session, &grade_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
