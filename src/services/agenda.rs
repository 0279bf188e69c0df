use serde::Serialize;
use serde_json::Value;
use time::{Duration, OffsetDateTime};

use crate::clients::assignments::AssignmentWrite;
use crate::clients::{self, BackendClient};
use crate::core::security::Session;
use crate::core::time::{format_offset, parse_clock, parse_date_or_timestamp};
use crate::models::records::{Assignment, Event};
use crate::schemas::assignment::AssignmentEdit;
use crate::services::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AgendaKind {
    Assignment,
    Meeting,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AgendaEntry {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) start: String,
    pub(crate) end: String,
    pub(crate) kind: AgendaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) meeting: Option<Event>,
}

pub(crate) async fn for_caller(
    backend: &BackendClient,
    session: &Session,
) -> Result<Vec<AgendaEntry>, ServiceError> {
    let (assignments, meetings) = tokio::try_join!(
        clients::assignments::list_for_user(backend, session, &session.user_id),
        clients::events::list_meetings(backend, session, &session.user_id, false),
    )?;

    Ok(build(&assignments, meetings))
}

fn edit_body<'a>(
    session: &'a Session,
    edit: &'a AssignmentEdit,
) -> Result<AssignmentWrite<'a>, ServiceError> {
    let name = edit.name.trim();
    if name.is_empty() {
        return Err(ServiceError::Invalid("Assignment name is required".to_string()));
    }

    let due_date = edit.due_date.trim();
    if parse_date_or_timestamp(due_date).is_none() {
        return Err(ServiceError::Invalid(format!("Invalid due date: {due_date}")));
    }

    Ok(AssignmentWrite { name, due_date, uid: &session.user_id })
}

pub(crate) async fn update_assignment(
    backend: &BackendClient,
    session: &Session,
    assignment_id: &str,
    edit: &AssignmentEdit,
) -> Result<Assignment, ServiceError> {
    let body = edit_body(session, edit)?;
    let assignment = clients::assignments::update(backend, session, assignment_id, &body).await?;
    tracing::info!(assignment_id, user_id = %session.user_id, "Assignment updated from agenda");
    Ok(assignment)
}

pub(crate) async fn delete_assignment(
    backend: &BackendClient,
    session: &Session,
    assignment_id: &str,
) -> Result<(), ServiceError> {
    clients::assignments::delete(backend, session, assignment_id).await?;
    tracing::info!(assignment_id, user_id = %session.user_id, "Assignment deleted from agenda");
    Ok(())
}

/// Assignments first, then meetings, each in upstream order.
pub(crate) fn build(assignments: &[Assignment], meetings: Vec<Event>) -> Vec<AgendaEntry> {
    let mut entries: Vec<AgendaEntry> = assignments.iter().filter_map(assignment_entry).collect();
    entries.extend(meetings.into_iter().filter_map(meeting_entry));
    entries
}

fn assignment_entry(assignment: &Assignment) -> Option<AgendaEntry> {
    let due = assignment.due_date.as_deref().and_then(parse_date_or_timestamp)?;
    let due = format_offset(due);
    Some(AgendaEntry {
        id: assignment.id.clone(),
        title: assignment.name.clone(),
        start: due.clone(),
        end: due,
        kind: AgendaKind::Assignment,
        meeting: None,
    })
}

fn meeting_entry(meeting: Event) -> Option<AgendaEntry> {
    let start = meeting_start(&meeting)?;
    let end = start + Duration::minutes(i64::from(meeting.duration_minutes()));

    Some(AgendaEntry {
        id: meeting.id.clone(),
        title: format!(
            "{}: {} with {}",
            meeting.event_type,
            meeting.name,
            participant_name(&meeting)
        ),
        start: format_offset(start),
        end: format_offset(end),
        kind: AgendaKind::Meeting,
        meeting: Some(meeting),
    })
}

fn meeting_start(meeting: &Event) -> Option<OffsetDateTime> {
    let date = meeting.date.as_deref().and_then(parse_date_or_timestamp)?;
    match meeting.time.as_deref().and_then(parse_clock) {
        Some(clock) => Some(date.replace_time(clock)),
        None => Some(date),
    }
}

fn participant_name(meeting: &Event) -> String {
    if !meeting.related_id.is_expanded() {
        return "Unknown".to_string();
    }

    let part = |key: &str| {
        meeting.related_id.field(key).and_then(Value::as_str).unwrap_or_default().to_string()
    };
    format!("{} {}", part("firstName"), part("lastName"))
}
