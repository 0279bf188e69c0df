use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::clients::{self, BackendClient};
use crate::core::security::Session;
use crate::models::records::{Assignment, Feedback, Grade, Subject, User};
use crate::models::types::{EntityKind, GradeStatus};
use crate::services::feedback_index::{self, BackendFeedbackSource, FeedbackIndex};
use crate::services::ServiceError;

/// Subject enriched with its grade totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SubjectView {
    #[serde(flatten)]
    pub(crate) subject: Subject,
    #[serde(rename = "totalAssignments")]
    pub(crate) total_assignments: usize,
    #[serde(rename = "totalAchieved")]
    pub(crate) total_achieved: f64,
    #[serde(rename = "totalOutOf")]
    pub(crate) total_out_of: f64,
    #[serde(rename = "totalLose")]
    pub(crate) total_lose: f64,
}

impl SubjectView {
    pub(crate) fn id(&self) -> &str {
        &self.subject.id
    }

    /// Placeholder shown in a subject panel that has nothing to list.
    pub(crate) fn empty_panel_message(&self) -> Option<String> {
        (self.total_assignments == 0)
            .then(|| format!("No assignments for {}.", self.subject.title))
    }
}

/// Assignment with the grade recorded against it, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct AssignmentView {
    #[serde(flatten)]
    pub(crate) assignment: Assignment,
    pub(crate) grade: Option<Grade>,
    #[serde(rename = "gradeStatus")]
    pub(crate) grade_status: GradeStatus,
}

impl AssignmentView {
    pub(crate) fn id(&self) -> &str {
        &self.assignment.id
    }

    pub(crate) fn belongs_to(&self, subject_id: &str) -> bool {
        self.assignment.s_id.matches(subject_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct PerformanceView {
    pub(crate) subjects: Vec<SubjectView>,
    pub(crate) assignments: Vec<AssignmentView>,
}

/// Join subjects, assignments and grades into per-subject totals and per-assignment grades.
///
/// References are compared by their resolved id only, so bare and populated forms join the
/// same way and malformed references join nothing. Totals are plain sums: a subject with no
/// grades reports `0/0/0`. The first grade in input order wins for an assignment.
pub(crate) fn aggregate(
    subjects: Vec<Subject>,
    assignments: Vec<Assignment>,
    grades: &[Grade],
) -> PerformanceView {
    let subjects = subjects
        .into_iter()
        .map(|mut subject| {
            let total_assignments = assignments
                .iter()
                .filter(|assignment| assignment.s_id.matches(&subject.id))
                .count();

            let (total_achieved, total_out_of) = grades
                .iter()
                .filter(|grade| grade.s_id.matches(&subject.id))
                .fold((0.0, 0.0), |(achieved, out_of), grade| {
                    (achieved + grade.grade, out_of + grade.out_of)
                });

            subject.target_grade = Some(f64::from(subject.resolved_target_grade()));

            SubjectView {
                subject,
                total_assignments,
                total_achieved,
                total_out_of,
                total_lose: total_out_of - total_achieved,
            }
        })
        .collect();

    let assignments = assignments
        .into_iter()
        .map(|assignment| {
            let grade =
                grades.iter().find(|grade| grade.a_id.matches(&assignment.id)).cloned();
            let grade_status =
                if grade.is_some() { GradeStatus::Graded } else { GradeStatus::NotGraded };
            AssignmentView { assignment, grade, grade_status }
        })
        .collect();

    PerformanceView { subjects, assignments }
}

/// Assignments shown under one subject panel, in input order.
pub(crate) fn assignments_for_subject<'a>(
    views: &'a [AssignmentView],
    subject_id: &'a str,
) -> impl Iterator<Item = &'a AssignmentView> + 'a {
    views.iter().filter(move |view| view.belongs_to(subject_id))
}

/// Per-subject grouping of the assignment table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SubjectPanel {
    pub(crate) subject_id: String,
    pub(crate) assignment_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) empty_message: Option<String>,
    pub(crate) feedback_count: usize,
}

pub(crate) fn panels(view: &PerformanceView, feedback: &FeedbackIndex) -> Vec<SubjectPanel> {
    view.subjects
        .iter()
        .map(|subject| SubjectPanel {
            subject_id: subject.id().to_string(),
            assignment_ids: assignments_for_subject(&view.assignments, subject.id())
                .map(|assignment| assignment.id().to_string())
                .collect(),
            empty_message: subject.empty_panel_message(),
            feedback_count: feedback.get(EntityKind::Subject, subject.id()).len(),
        })
        .collect()
}

/// Grade tracking page: the student, the joined view and the feedback attached to each entity.
#[derive(Debug, Serialize)]
pub(crate) struct PerformancePage {
    pub(crate) student: Option<User>,
    #[serde(flatten)]
    pub(crate) view: PerformanceView,
    pub(crate) panels: Vec<SubjectPanel>,
    pub(crate) feedback: HashMap<EntityKind, HashMap<String, Vec<Feedback>>>,
}

pub(crate) async fn for_student(
    backend: &BackendClient,
    session: &Session,
    student_id: &str,
    feedback_concurrency: usize,
) -> Result<PerformancePage, ServiceError> {
    if !session.can_view_student(student_id) {
        return Err(ServiceError::Forbidden("Not allowed to view this student"));
    }

    let (records, student) = tokio::join!(
        async {
            tokio::try_join!(
                clients::subjects::list_for_user(backend, session, student_id),
                clients::assignments::list_for_user(backend, session, student_id),
                clients::grades::list_for_user(backend, session, student_id),
            )
        },
        student_profile(backend, session, student_id),
    );
    let (subjects, assignments, grades) = records?;

    let source = Arc::new(BackendFeedbackSource::new(backend.clone(), session.clone()));
    let index =
        feedback_index::build(source, &subjects, &assignments, feedback_concurrency).await;
    tracing::debug!(
        student_id,
        subjects = subjects.len(),
        assignments = assignments.len(),
        grades = grades.len(),
        feedback_keys = index.len(),
        "Performance page assembled"
    );

    let view = aggregate(subjects, assignments, &grades);
    let panels = panels(&view, &index);
    Ok(PerformancePage { student, view, panels, feedback: index.into_grouped() })
}

/// The page still renders without the profile; only its header is lost.
async fn student_profile(
    backend: &BackendClient,
    session: &Session,
    student_id: &str,
) -> Option<User> {
    match clients::users::get(backend, session, student_id).await {
        Ok(user) => Some(user),
        Err(err) if err.is_not_found() => {
            tracing::debug!(student_id, "Student profile not found");
            None
        }
        Err(err) => {
            tracing::warn!(student_id, error = %err, "Student profile lookup failed");
            None
        }
    }
}
