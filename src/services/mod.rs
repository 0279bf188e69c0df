use thiserror::Error;

use crate::clients::ClientError;

pub(crate) mod agenda;
pub(crate) mod directory;
pub(crate) mod feedback_authoring;
pub(crate) mod feedback_index;
pub(crate) mod grade_entry;
pub(crate) mod performance;
pub(crate) mod push;
pub(crate) mod scheduling;

#[derive(Debug, Error)]
pub(crate) enum ServiceError {
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Internal(String),
    #[error(transparent)]
    Upstream(#[from] ClientError),
}
