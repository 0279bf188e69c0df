use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct MeetingRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "description is too long"))]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "date is required"))]
    pub(crate) date: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "time is required"))]
    pub(crate) time: String,
    #[serde(default)]
    #[validate(range(min = 1, max = 480, message = "duration must be in range 1..480 minutes"))]
    pub(crate) duration: Option<u32>,
    #[serde(default, alias = "studentId")]
    #[validate(length(min = 1, message = "student_id is required"))]
    pub(crate) student_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MeetingListQuery {
    #[serde(default)]
    pub(crate) past: bool,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EventListQuery {
    #[serde(default, rename = "type")]
    pub(crate) event_type: Option<String>,
    #[serde(default)]
    pub(crate) past: bool,
}

/// Free-form event body; upstream owns the schema beyond `name`.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub(crate) struct EventWrite {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "name must not be empty"))]
    pub(crate) name: String,
    #[serde(flatten)]
    pub(crate) fields: Map<String, Value>,
}
