use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{routing::delete, routing::get, Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentSession;
use crate::core::state::AppState;
use crate::models::records::Event;
use crate::schemas::event::{EventListQuery, EventWrite, MeetingListQuery, MeetingRequest};
use crate::services::scheduling;

pub(crate) fn meetings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_meetings).post(schedule_meeting))
        .route("/:meeting_id", delete(cancel_meeting))
}

pub(crate) fn events_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/:event_id", get(get_event).put(update_event).delete(delete_event))
}

async fn list_meetings(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<MeetingListQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let meetings = scheduling::meetings(state.backend(), &session, params.past).await?;
    Ok(Json(meetings))
}

async fn schedule_meeting(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<MeetingRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let meeting = scheduling::schedule(state.backend(), &session, payload).await?;
    Ok((StatusCode::CREATED, Json(meeting)))
}

async fn cancel_meeting(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(meeting_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    scheduling::cancel(state.backend(), &session, &meeting_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_events(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<EventListQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = scheduling::list_events(
        state.backend(),
        &session,
        params.event_type.as_deref(),
        params.past,
    )
    .await?;
    Ok(Json(events))
}

async fn get_event(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(event_id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(scheduling::get_event(state.backend(), &session, &event_id).await?))
}

async fn create_event(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<EventWrite>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let event = scheduling::create_event(state.backend(), &session, &payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn update_event(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(event_id): Path<String>,
    Json(payload): Json<EventWrite>,
) -> Result<Json<Event>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let event = scheduling::update_event(state.backend(), &session, &event_id, &payload).await?;
    Ok(Json(event))
}

async fn delete_event(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(event_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    scheduling::delete_event(state.backend(), &session, &event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
