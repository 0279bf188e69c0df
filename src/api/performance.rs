use axum::extract::{Path, Query, State};
use axum::{routing::get, Json, Router};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentSession;
use crate::core::state::AppState;
use crate::models::records::User;
use crate::schemas::user::SessionResponse;
use crate::services::{directory, performance};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StudentListQuery {
    #[serde(default)]
    search: Option<String>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/me/performance", get(my_performance))
        .route("/students", get(list_students))
        .route("/students/:student_id/performance", get(student_performance))
}

async fn me(CurrentSession(session): CurrentSession) -> Json<SessionResponse> {
    Json(SessionResponse { user_id: session.user_id, role: session.role })
}

async fn my_performance(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<performance::PerformancePage>, ApiError> {
    let page = performance::for_student(
        state.backend(),
        &session,
        &session.user_id,
        state.feedback_concurrency(),
    )
    .await?;
    Ok(Json(page))
}

async fn student_performance(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(student_id): Path<String>,
) -> Result<Json<performance::PerformancePage>, ApiError> {
    let page = performance::for_student(
        state.backend(),
        &session,
        &student_id,
        state.feedback_concurrency(),
    )
    .await?;
    Ok(Json(page))
}

async fn list_students(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<StudentListQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    let students =
        directory::students(state.backend(), &session, params.search.as_deref()).await?;
    Ok(Json(students))
}

#[cfg(test)]
mod tests;
