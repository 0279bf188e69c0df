use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::clients;
use crate::core::security::{self, Session};
use crate::core::state::AppState;
use crate::models::types::Role;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Caller resolved from the bearer token, once per request.
pub(crate) struct CurrentSession(pub(crate) Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::decode_token(token, app_state.settings()).map_err(|err| {
            tracing::debug!(error = %err, "Rejected session token");
            ApiError::Unauthorized("Invalid authentication credentials")
        })?;

        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let user_id = claims
            .subject()
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?
            .to_string();

        let mut session =
            Session { user_id, role: Role::Student, token: token.to_string(), request_id };

        session.role = match claims.role() {
            Some(role) => role,
            None => lookup_role(&app_state, &session).await,
        };

        Ok(CurrentSession(session))
    }
}

/// Role of a caller whose token carries none. Unknown users count as students.
async fn lookup_role(state: &AppState, session: &Session) -> Role {
    match clients::users::get(state.backend(), session, &session.user_id).await {
        Ok(user) => user.role,
        Err(err) if err.is_not_found() => Role::Student,
        Err(err) => {
            tracing::warn!(user_id = %session.user_id, error = %err, "Role lookup failed");
            Role::Student
        }
    }
}
