use serde::Deserialize;
use validator::Validate;

/// Calendar edit of an assignment; the owner is always the caller.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssignmentEdit {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "name must not be empty"))]
    pub(crate) name: String,
    #[serde(default, alias = "dueDate")]
    #[validate(length(min = 1, message = "due_date is required"))]
    pub(crate) due_date: String,
}
