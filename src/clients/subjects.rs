use crate::clients::{BackendClient, ClientError};
use crate::core::security::Session;
use crate::models::records::Subject;

pub(crate) async fn list_for_user(
    backend: &BackendClient,
    session: &Session,
    user_id: &str,
) -> Result<Vec<Subject>, ClientError> {
    backend.get(session, &["api", "subjects", "user", user_id]).await
}

pub(crate) async fn list_all(
    backend: &BackendClient,
    session: &Session,
) -> Result<Vec<Subject>, ClientError> {
    backend.get(session, &["api", "subjects"]).await
}
