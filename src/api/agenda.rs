use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{routing::get, routing::put, Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentSession;
use crate::core::state::AppState;
use crate::models::records::Assignment;
use crate::schemas::assignment::AssignmentEdit;
use crate::services::agenda::{self, AgendaEntry};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_agenda))
        .route("/assignments/:assignment_id", put(update_assignment).delete(delete_assignment))
}

async fn list_agenda(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Vec<AgendaEntry>>, ApiError> {
    Ok(Json(agenda::for_caller(state.backend(), &session).await?))
}

async fn update_assignment(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(assignment_id): Path<String>,
    Json(payload): Json<AssignmentEdit>,
) -> Result<Json<Assignment>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let assignment =
        agenda::update_assignment(state.backend(), &session, &assignment_id, &payload).await?;
    Ok(Json(assignment))
}

async fn delete_assignment(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(assignment_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    agenda::delete_assignment(state.backend(), &session, &assignment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
