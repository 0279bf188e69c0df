pub(crate) mod admin;
pub(crate) mod agenda;
pub(crate) mod errors;
pub(crate) mod feedback;
pub(crate) mod grades;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod meetings;
pub(crate) mod performance;
pub(crate) mod push;
pub(crate) mod router;
