use serde::Serialize;

use crate::clients::{BackendClient, ClientError};
use crate::core::security::Session;
use crate::models::records::User;

pub(crate) async fn get(
    backend: &BackendClient,
    session: &Session,
    user_id: &str,
) -> Result<User, ClientError> {
    backend.get(session, &["api", "users", user_id]).await
}

pub(crate) async fn list_all(
    backend: &BackendClient,
    session: &Session,
) -> Result<Vec<User>, ClientError> {
    backend.get(session, &["api", "users"]).await
}

pub(crate) async fn create<B: Serialize + ?Sized>(
    backend: &BackendClient,
    session: &Session,
    user: &B,
) -> Result<User, ClientError> {
    backend.post(session, &["api", "users"], user).await
}

pub(crate) async fn update<B: Serialize + ?Sized>(
    backend: &BackendClient,
    session: &Session,
    user_id: &str,
    user: &B,
) -> Result<User, ClientError> {
    backend.put(session, &["api", "users", user_id], user).await
}

pub(crate) async fn delete(
    backend: &BackendClient,
    session: &Session,
    user_id: &str,
) -> Result<(), ClientError> {
    backend.delete(session, &["api", "users", user_id]).await
}
