use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{routing::get, routing::put, Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentSession;
use crate::core::state::AppState;
use crate::models::records::User;
use crate::schemas::user::{AdminUserCreate, AdminUserUpdate, UserListQuery};
use crate::services::directory::{self, SystemAnalytics};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/analytics", get(analytics))
        .route("/users", get(list_users).post(create_user))
        .route("/users/:user_id", put(update_user).delete(delete_user))
}

async fn analytics(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<SystemAnalytics>, ApiError> {
    Ok(Json(directory::analytics(state.backend(), &session).await?))
}

async fn list_users(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<UserListQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = directory::list_users(
        state.backend(),
        &session,
        params.role.as_deref(),
        params.search.as_deref(),
    )
    .await?;
    Ok(Json(users))
}

async fn create_user(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<AdminUserCreate>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let user = directory::create_user(state.backend(), &session, &payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(user_id): Path<String>,
    Json(payload): Json<AdminUserUpdate>,
) -> Result<Json<User>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let user = directory::update_user(state.backend(), &session, &user_id, &payload).await?;
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    directory::delete_user(state.backend(), &session, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests;
