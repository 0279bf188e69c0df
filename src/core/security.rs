use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::Settings;
use crate::models::types::Role;

#[derive(Debug, Error)]
pub(crate) enum SecurityError {
    #[error("jwt decoding failed")]
    JwtDecoding,
    #[error("session token carries no user id")]
    MissingSubject,
    #[error("unsupported jwt algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Claims issued by the upstream backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Claims {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub(crate) user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) exp: Option<i64>,
}

impl Claims {
    /// `userId` as issued by the dashboard backend, `sub` for standard issuers.
    pub(crate) fn subject(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or(self.sub.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub(crate) fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }
}

/// Caller identity resolved once per request and passed explicitly to every layer below.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) user_id: String,
    pub(crate) role: Role,
    pub(crate) token: String,
    pub(crate) request_id: String,
}

impl Session {
    pub(crate) fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub(crate) fn is_advisor(&self) -> bool {
        self.role == Role::Advisor
    }

    /// Students see only their own records; advisors and admins see everyone's.
    pub(crate) fn can_view_student(&self, student_id: &str) -> bool {
        match self.role {
            Role::Student => self.user_id == student_id,
            Role::Advisor | Role::Admin => true,
        }
    }
}

/// Decode a session token.
///
/// With `SESSION_TOKEN_SECRET` configured the signature is verified. Without it the token is
/// only decoded and the upstream backend remains the authority on its validity. Expiry is
/// checked in both modes when the token carries `exp`.
pub(crate) fn decode_token(token: &str, settings: &Settings) -> Result<Claims, SecurityError> {
    let algorithm = algorithm_from_settings(settings)?;
    let mut validation = Validation::new(algorithm);
    validation.required_spec_claims.clear();
    validation.validate_exp = true;
    validation.validate_aud = false;

    let key = match settings.security().token_secret.as_deref() {
        Some(secret) => DecodingKey::from_secret(secret.as_bytes()),
        None => {
            validation.insecure_disable_signature_validation();
            DecodingKey::from_secret(&[])
        }
    };

    let claims = decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| SecurityError::JwtDecoding)?;

    if claims.subject().is_none() {
        return Err(SecurityError::MissingSubject);
    }

    Ok(claims)
}

fn algorithm_from_settings(settings: &Settings) -> Result<Algorithm, SecurityError> {
    match settings.security().algorithm.as_str() {
        "HS256" => Ok(Algorithm::HS256),
        other => Err(SecurityError::UnsupportedAlgorithm(other.to_string())),
    }
}
