use serde::Serialize;
use serde_json::Value;

use crate::clients::{BackendClient, ClientError};
use crate::core::security::Session;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReminderSubscription {
    pub(crate) subscription: Value,
    #[serde(rename = "reminderTime")]
    pub(crate) reminder_time: String,
    pub(crate) message: String,
}

pub(crate) async fn subscribe(
    backend: &BackendClient,
    session: &Session,
    request: &ReminderSubscription,
) -> Result<(), ClientError> {
    backend.post_discarding(session, &["subscribe"], request).await
}
