pub(crate) mod assignments;
pub(crate) mod backend;
pub(crate) mod events;
pub(crate) mod feedback;
pub(crate) mod grades;
pub(crate) mod push;
pub(crate) mod subjects;
pub(crate) mod users;

pub(crate) use backend::{BackendClient, ClientError};
