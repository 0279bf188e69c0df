use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::refs::EntityRef;
use crate::models::types::{EntityKind, Role};

pub(crate) const DEFAULT_TARGET_GRADE: u8 = 70;
pub(crate) const DEFAULT_MEETING_DURATION_MINUTES: u32 = 30;
pub(crate) const MEETING_EVENT_TYPE: &str = "Meeting";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Subject {
    #[serde(rename = "_id", default)]
    pub(crate) id: String,
    #[serde(rename = "subjectTitle", default)]
    pub(crate) title: String,
    #[serde(rename = "targetGrade", default, skip_serializing_if = "Option::is_none")]
    pub(crate) target_grade: Option<f64>,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl Subject {
    /// Target percentage clamped to 0..=100; absent or zero targets fall back to 70.
    pub(crate) fn resolved_target_grade(&self) -> u8 {
        match self.target_grade {
            Some(value) if value.is_finite() && value != 0.0 => {
                value.round().clamp(0.0, 100.0) as u8
            }
            _ => DEFAULT_TARGET_GRADE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Assignment {
    #[serde(rename = "_id", default)]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) due_date: Option<String>,
    #[serde(default)]
    pub(crate) s_id: EntityRef,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Grade {
    #[serde(rename = "_id", default)]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) grade: f64,
    #[serde(rename = "outOf", default)]
    pub(crate) out_of: f64,
    #[serde(default)]
    pub(crate) s_id: EntityRef,
    #[serde(default)]
    pub(crate) a_id: EntityRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) notes: Option<String>,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Feedback {
    #[serde(rename = "_id", default)]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) feedback_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) rating: Option<u8>,
    #[serde(default)]
    pub(crate) advisor_id: EntityRef,
    #[serde(default)]
    pub(crate) student_id: EntityRef,
    #[serde(default)]
    pub(crate) subject_id: EntityRef,
    #[serde(default)]
    pub(crate) assignment_id: EntityRef,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub(crate) created_at: Option<String>,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FeedbackTarget<'a> {
    pub(crate) kind: EntityKind,
    pub(crate) id: &'a str,
}

impl Feedback {
    /// The most specific entity this feedback is attached to.
    pub(crate) fn target(&self) -> Option<FeedbackTarget<'_>> {
        let candidates = [
            (EntityKind::Assignment, &self.assignment_id),
            (EntityKind::Subject, &self.subject_id),
            (EntityKind::Student, &self.student_id),
        ];

        candidates
            .into_iter()
            .find_map(|(kind, reference)| reference.resolve().map(|id| FeedbackTarget { kind, id }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Event {
    #[serde(rename = "_id", default)]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) duration: Option<u32>,
    #[serde(rename = "type", default)]
    pub(crate) event_type: String,
    #[serde(default)]
    pub(crate) related_id: EntityRef,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl Event {
    pub(crate) fn duration_minutes(&self) -> u32 {
        match self.duration {
            Some(minutes) if minutes > 0 => minutes,
            _ => DEFAULT_MEETING_DURATION_MINUTES,
        }
    }

    pub(crate) fn is_meeting(&self) -> bool {
        self.event_type.eq_ignore_ascii_case(MEETING_EVENT_TYPE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct User {
    #[serde(rename = "_id", default)]
    pub(crate) id: String,
    #[serde(rename = "firstName", default)]
    pub(crate) first_name: String,
    #[serde(rename = "lastName", default)]
    pub(crate) last_name: String,
    #[serde(default)]
    pub(crate) email: String,
    #[serde(default = "default_role")]
    pub(crate) role: Role,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

fn default_role() -> Role {
    Role::Student
}

impl User {
    pub(crate) fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
