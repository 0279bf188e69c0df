use serde::Serialize;

use crate::clients::{BackendClient, ClientError};
use crate::core::security::Session;
use crate::models::records::Assignment;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AssignmentWrite<'a> {
    pub(crate) name: &'a str,
    pub(crate) due_date: &'a str,
    pub(crate) uid: &'a str,
}

pub(crate) async fn list_for_user(
    backend: &BackendClient,
    session: &Session,
    user_id: &str,
) -> Result<Vec<Assignment>, ClientError> {
    backend.get(session, &["api", "assignments", "user", user_id]).await
}

pub(crate) async fn list_all(
    backend: &BackendClient,
    session: &Session,
) -> Result<Vec<Assignment>, ClientError> {
    backend.get(session, &["api", "assignments"]).await
}

pub(crate) async fn update(
    backend: &BackendClient,
    session: &Session,
    assignment_id: &str,
    assignment: &AssignmentWrite<'_>,
) -> Result<Assignment, ClientError> {
    backend.put(session, &["api", "assignments", assignment_id], assignment).await
}

pub(crate) async fn delete(
    backend: &BackendClient,
    session: &Session,
    assignment_id: &str,
) -> Result<(), ClientError> {
    backend.delete(session, &["api", "assignments", assignment_id]).await
}
