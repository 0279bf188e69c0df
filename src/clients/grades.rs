use serde::Serialize;

use crate::clients::{BackendClient, ClientError};
use crate::core::security::Session;
use crate::models::records::Grade;

/// Body accepted by upstream for both create and update.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GradeWrite<'a> {
    pub(crate) grade: f64,
    #[serde(rename = "outOf")]
    pub(crate) out_of: f64,
    pub(crate) s_id: &'a str,
    pub(crate) a_id: &'a str,
    pub(crate) notes: &'a str,
    pub(crate) uid: &'a str,
}

pub(crate) async fn list_for_user(
    backend: &BackendClient,
    session: &Session,
    user_id: &str,
) -> Result<Vec<Grade>, ClientError> {
    backend.get(session, &["api", "grades", "user", user_id]).await
}

pub(crate) async fn create(
    backend: &BackendClient,
    session: &Session,
    grade: &GradeWrite<'_>,
) -> Result<Grade, ClientError> {
    backend.post(session, &["api", "grades"], grade).await
}

pub(crate) async fn update(
    backend: &BackendClient,
    session: &Session,
    grade_id: &str,
    grade: &GradeWrite<'_>,
) -> Result<Grade, ClientError> {
    backend.put(session, &["api", "grades", grade_id], grade).await
}

pub(crate) async fn delete(
    backend: &BackendClient,
    session: &Session,
    grade_id: &str,
) -> Result<(), ClientError> {
    backend.delete(session, &["api", "grades", grade_id]).await
}
