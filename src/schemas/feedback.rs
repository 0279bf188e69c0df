use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::records::Feedback;
use crate::models::types::EntityKind;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct FeedbackCreate {
    #[serde(default, alias = "studentId")]
    #[validate(length(min = 1, message = "student_id is required"))]
    pub(crate) student_id: String,
    pub(crate) kind: EntityKind,
    #[serde(default, alias = "targetId")]
    #[validate(length(min = 1, message = "target_id is required"))]
    pub(crate) target_id: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 5000, message = "feedback_text must not be empty"))]
    pub(crate) feedback_text: String,
    #[serde(default)]
    #[validate(range(max = 5, message = "rating must be in range 1..5"))]
    pub(crate) rating: Option<u8>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct FeedbackBatchCreate {
    #[serde(default, alias = "studentId")]
    #[validate(length(min = 1, message = "student_id is required"))]
    pub(crate) student_id: String,
    #[serde(default, alias = "subjectId")]
    #[validate(length(min = 1, message = "subject_id is required"))]
    pub(crate) subject_id: String,
    #[serde(default, alias = "assignmentIds")]
    pub(crate) assignment_ids: Vec<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 5000, message = "feedback_text must not be empty"))]
    pub(crate) feedback_text: String,
    #[serde(default)]
    #[validate(range(max = 5, message = "rating must be in range 1..5"))]
    pub(crate) rating: Option<u8>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct FeedbackEdit {
    #[serde(default)]
    #[validate(length(min = 1, max = 5000, message = "feedback_text must not be empty"))]
    pub(crate) feedback_text: Option<String>,
    #[serde(default)]
    #[validate(range(max = 5, message = "rating must be in range 1..5"))]
    pub(crate) rating: Option<u8>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FeedbackBatchResponse {
    pub(crate) subject: Feedback,
    pub(crate) assignments: Vec<Feedback>,
    pub(crate) assignments_count: usize,
}
