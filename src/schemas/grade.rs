use serde::Deserialize;
use validator::Validate;

/// Grade form body, used for both create and update.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GradeForm {
    #[serde(default)]
    pub(crate) grade: Option<f64>,
    #[serde(default, alias = "outOf")]
    pub(crate) out_of: Option<f64>,
    #[serde(default)]
    #[validate(length(min = 1, message = "s_id is required"))]
    pub(crate) s_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "a_id is required"))]
    pub(crate) a_id: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "notes are too long"))]
    pub(crate) notes: Option<String>,
}
