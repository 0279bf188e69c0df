use serde::Serialize;
use serde_json::Value;

use crate::clients::push::{self, ReminderSubscription};
use crate::clients::BackendClient;
use crate::core::security::Session;
use crate::schemas::push::SubscribeRequest;
use crate::services::ServiceError;

const FALLBACK_TITLE: &str = "New Reminder";
const DEFAULT_TITLE: &str = "Reminder";
const DEFAULT_BODY: &str = "You have a new reminder!";

/// What the browser worker shows for an incoming push message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct NotificationPayload {
    pub(crate) title: String,
    pub(crate) body: String,
}

impl NotificationPayload {
    /// Unparseable data shows the generic "New Reminder" notice; empty or missing fields fall
    /// back one by one.
    pub(crate) fn from_push_data(data: &[u8]) -> Self {
        let Ok(parsed) = serde_json::from_slice::<Value>(data) else {
            return Self { title: FALLBACK_TITLE.to_string(), body: DEFAULT_BODY.to_string() };
        };

        let text = |key: &str, fallback: &str| {
            parsed
                .get(key)
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };

        Self { title: text("title", DEFAULT_TITLE), body: text("body", DEFAULT_BODY) }
    }
}

fn has_endpoint(subscription: &Value) -> bool {
    subscription
        .get("endpoint")
        .and_then(Value::as_str)
        .is_some_and(|endpoint| !endpoint.trim().is_empty())
}

/// Register a browser push subscription for a reminder.
pub(crate) async fn subscribe(
    backend: &BackendClient,
    session: &Session,
    request: SubscribeRequest,
) -> Result<(), ServiceError> {
    if !has_endpoint(&request.subscription) {
        return Err(ServiceError::Invalid("Push subscription endpoint is required".to_string()));
    }

    let subscription = ReminderSubscription {
        subscription: request.subscription,
        reminder_time: request.reminder_time.trim().to_string(),
        message: request.message.trim().to_string(),
    };
    push::subscribe(backend, session, &subscription).await?;
    tracing::info!(
        user_id = %session.user_id,
        reminder_time = %subscription.reminder_time,
        "Push reminder registered"
    );
    Ok(())
}
