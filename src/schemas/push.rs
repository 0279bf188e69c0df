use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

#[derive(Debug, Serialize)]
pub(crate) struct PublicKeyResponse {
    #[serde(rename = "publicKey")]
    pub(crate) public_key: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SubscribeRequest {
    pub(crate) subscription: Value,
    #[serde(default, alias = "reminderTime")]
    #[validate(length(min = 1, message = "reminder_time is required"))]
    pub(crate) reminder_time: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 500, message = "message must not be empty"))]
    pub(crate) message: String,
}
