use serde::Serialize;

use crate::clients::{BackendClient, ClientError};
use crate::core::security::Session;
use crate::models::records::Feedback;
use crate::models::types::EntityKind;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewFeedback {
    pub(crate) advisor_id: String,
    pub(crate) student_id: String,
    pub(crate) feedback_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) subject_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) assignment_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct FeedbackUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) feedback_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) rating: Option<u8>,
}

pub(crate) async fn create(
    backend: &BackendClient,
    session: &Session,
    feedback: &NewFeedback,
) -> Result<Feedback, ClientError> {
    backend.post(session, &["api", "feedback"], feedback).await
}

pub(crate) async fn update(
    backend: &BackendClient,
    session: &Session,
    feedback_id: &str,
    update: &FeedbackUpdate,
) -> Result<Feedback, ClientError> {
    backend.put(session, &["api", "feedback", feedback_id], update).await
}

pub(crate) async fn delete(
    backend: &BackendClient,
    session: &Session,
    feedback_id: &str,
) -> Result<(), ClientError> {
    backend.delete(session, &["api", "feedback", feedback_id]).await
}

/// `GET /api/feedback/{subject|assignment|student}/:id`. Not-found is returned as an error;
/// [`feedback_index::lookup_one`](crate::services::feedback_index::lookup_one) reads it as an
/// empty list, and `feedback_index::fetch_isolated` does the same while building the index.
pub(crate) async fn list_for(
    backend: &BackendClient,
    session: &Session,
    kind: EntityKind,
    entity_id: &str,
) -> Result<Vec<Feedback>, ClientError> {
    backend.get(session, &["api", "feedback", kind.as_str(), entity_id]).await
}
