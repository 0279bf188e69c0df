use std::collections::HashMap;

use serde::Serialize;

pub(crate) mod assignment;
pub(crate) mod event;
pub(crate) mod feedback;
pub(crate) mod grade;
pub(crate) mod push;
pub(crate) mod user;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
    pub(crate) api_prefix: String,
}
