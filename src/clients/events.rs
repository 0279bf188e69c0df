use serde::Serialize;

use crate::clients::{BackendClient, ClientError};
use crate::core::security::Session;
use crate::models::records::{Event, MEETING_EVENT_TYPE};

/// Meeting body in the shape `POST /api/events/meetings` expects.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewMeeting {
    pub(crate) name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    pub(crate) date: String,
    pub(crate) time: String,
    pub(crate) duration: u32,
    #[serde(rename = "advisorId")]
    pub(crate) advisor_id: String,
    #[serde(rename = "studentId")]
    pub(crate) student_id: String,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct EventFilter<'a> {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) event_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) past: Option<&'a str>,
}

impl<'a> EventFilter<'a> {
    pub(crate) fn new(event_type: Option<&'a str>, past: bool) -> Self {
        Self { event_type, past: past.then_some("true") }
    }
}

pub(crate) async fn create<B: Serialize + ?Sized>(
    backend: &BackendClient,
    session: &Session,
    event: &B,
) -> Result<Event, ClientError> {
    backend.post(session, &["api", "events"], event).await
}

pub(crate) async fn get(
    backend: &BackendClient,
    session: &Session,
    event_id: &str,
) -> Result<Event, ClientError> {
    backend.get(session, &["api", "events", event_id]).await
}

pub(crate) async fn update<B: Serialize + ?Sized>(
    backend: &BackendClient,
    session: &Session,
    event_id: &str,
    event: &B,
) -> Result<Event, ClientError> {
    backend.put(session, &["api", "events", event_id], event).await
}

pub(crate) async fn delete(
    backend: &BackendClient,
    session: &Session,
    event_id: &str,
) -> Result<(), ClientError> {
    backend.delete(session, &["api", "events", event_id]).await
}

pub(crate) async fn list_for_user(
    backend: &BackendClient,
    session: &Session,
    user_id: &str,
    filter: &EventFilter<'_>,
) -> Result<Vec<Event>, ClientError> {
    backend.get_with_query(session, &["api", "events", "user", user_id], filter).await
}

pub(crate) async fn schedule_meeting(
    backend: &BackendClient,
    session: &Session,
    meeting: &NewMeeting,
) -> Result<Event, ClientError> {
    backend.post(session, &["api", "events", "meetings"], meeting).await
}

pub(crate) async fn cancel_meeting(
    backend: &BackendClient,
    session: &Session,
    meeting_id: &str,
) -> Result<(), ClientError> {
    backend.delete(session, &["api", "events", "meetings", meeting_id]).await
}

pub(crate) async fn list_meetings(
    backend: &BackendClient,
    session: &Session,
    user_id: &str,
    past: bool,
) -> Result<Vec<Event>, ClientError> {
    list_for_user(backend, session, user_id, &EventFilter::new(Some(MEETING_EVENT_TYPE), past))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_omits_defaults() {
        let query = serde_json::to_value(EventFilter::new(None, false)).unwrap();
        assert_eq!(query, serde_json::json!({}));

        let query = serde_json::to_value(EventFilter::new(Some("Meeting"), true)).unwrap();
        assert_eq!(query, serde_json::json!({"type": "Meeting", "past": "true"}));
    }
}
