use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, routing::post, Json, Router};
use serde_json::{json, Value};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentSession;
use crate::core::state::AppState;
use crate::schemas::push::{PublicKeyResponse, SubscribeRequest};
use crate::services::push::{self, NotificationPayload};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/public-key", get(public_key))
        .route("/subscribe", post(subscribe))
        .route("/preview", post(preview))
}

async fn public_key(State(state): State<AppState>) -> Json<PublicKeyResponse> {
    Json(PublicKeyResponse { public_key: state.settings().push().vapid_public_key.clone() })
}

async fn subscribe(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    push::subscribe(state.backend(), &session, payload).await?;
    Ok((StatusCode::CREATED, Json(json!({"subscribed": true}))))
}

/// Notification the browser worker would show for a raw push message body.
async fn preview(body: Bytes) -> Json<NotificationPayload> {
    Json(NotificationPayload::from_push_data(&body))
}

#[cfg(test)]
mod tests;
