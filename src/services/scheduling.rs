use crate::clients::events::{self, EventFilter, NewMeeting};
use crate::clients::BackendClient;
use crate::core::security::Session;
use crate::core::time::{parse_clock, parse_date_or_timestamp};
use crate::models::records::{Event, DEFAULT_MEETING_DURATION_MINUTES};
use crate::schemas::event::{EventWrite, MeetingRequest};
use crate::services::ServiceError;

/// Check a meeting request and shape it into the upstream body.
///
/// The advisor is always the caller; students cannot schedule.
pub(crate) fn prepare_meeting(
    session: &Session,
    request: MeetingRequest,
) -> Result<NewMeeting, ServiceError> {
    if !(session.is_advisor() || session.is_admin()) {
        return Err(ServiceError::Forbidden("Only advisors can schedule meetings"));
    }

    let title = request.title.trim();
    if title.is_empty() {
        return Err(ServiceError::Invalid("Please fill in all required fields".to_string()));
    }

    let date = request.date.trim();
    if parse_date_or_timestamp(date).is_none() {
        return Err(ServiceError::Invalid(format!("Invalid meeting date: {date}")));
    }

    let time = request.time.trim();
    if parse_clock(time).is_none() {
        return Err(ServiceError::Invalid(format!("Invalid meeting time (expected HH:MM): {time}")));
    }

    let student_id = request.student_id.trim();
    if student_id.is_empty() {
        return Err(ServiceError::Invalid("Please select a student".to_string()));
    }

    let description =
        request.description.map(|text| text.trim().to_string()).filter(|text| !text.is_empty());

    Ok(NewMeeting {
        name: title.to_string(),
        description,
        date: date.to_string(),
        time: time.to_string(),
        duration: request.duration.unwrap_or(DEFAULT_MEETING_DURATION_MINUTES),
        advisor_id: session.user_id.clone(),
        student_id: student_id.to_string(),
    })
}

pub(crate) async fn schedule(
    backend: &BackendClient,
    session: &Session,
    request: MeetingRequest,
) -> Result<Event, ServiceError> {
    let meeting = prepare_meeting(session, request)?;
    let event = events::schedule_meeting(backend, session, &meeting).await?;
    tracing::info!(
        meeting_id = %event.id,
        advisor_id = %meeting.advisor_id,
        student_id = %meeting.student_id,
        "Meeting scheduled"
    );
    Ok(event)
}

pub(crate) async fn cancel(
    backend: &BackendClient,
    session: &Session,
    meeting_id: &str,
) -> Result<(), ServiceError> {
    events::cancel_meeting(backend, session, meeting_id).await?;
    tracing::info!(meeting_id, user_id = %session.user_id, "Meeting cancelled");
    Ok(())
}

/// Upcoming meetings of the caller, or past ones when `past` is set.
pub(crate) async fn meetings(
    backend: &BackendClient,
    session: &Session,
    past: bool,
) -> Result<Vec<Event>, ServiceError> {
    let mut meetings = events::list_meetings(backend, session, &session.user_id, past).await?;
    meetings.retain(Event::is_meeting);
    Ok(meetings)
}

pub(crate) async fn list_events(
    backend: &BackendClient,
    session: &Session,
    event_type: Option<&str>,
    past: bool,
) -> Result<Vec<Event>, ServiceError> {
    let filter = EventFilter::new(event_type.map(str::trim).filter(|kind| !kind.is_empty()), past);
    Ok(events::list_for_user(backend, session, &session.user_id, &filter).await?)
}

pub(crate) async fn get_event(
    backend: &BackendClient,
    session: &Session,
    event_id: &str,
) -> Result<Event, ServiceError> {
    Ok(events::get(backend, session, event_id).await?)
}

pub(crate) async fn create_event(
    backend: &BackendClient,
    session: &Session,
    event: &EventWrite,
) -> Result<Event, ServiceError> {
    Ok(events::create(backend, session, event).await?)
}

pub(crate) async fn update_event(
    backend: &BackendClient,
    session: &Session,
    event_id: &str,
    event: &EventWrite,
) -> Result<Event, ServiceError> {
    Ok(events::update(backend, session, event_id, event).await?)
}

pub(crate) async fn delete_event(
    backend: &BackendClient,
    session: &Session,
    event_id: &str,
) -> Result<(), ServiceError> {
    Ok(events::delete(backend, session, event_id).await?)
}
