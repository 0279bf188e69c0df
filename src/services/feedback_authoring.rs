use tokio::task::JoinSet;

use crate::clients::feedback::{self, FeedbackUpdate, NewFeedback};
use crate::clients::{BackendClient, ClientError};
use crate::core::security::Session;
use crate::models::records::Feedback;
use crate::models::types::EntityKind;
use crate::schemas::feedback::{
    FeedbackBatchCreate, FeedbackBatchResponse, FeedbackCreate, FeedbackEdit,
};
use crate::services::ServiceError;

const ADVISORS_ONLY: &str = "Only advisors can give feedback";

fn require_advisor(session: &Session) -> Result<(), ServiceError> {
    if session.is_advisor() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(ADVISORS_ONLY))
    }
}

fn feedback_text(text: &str) -> Result<String, ServiceError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ServiceError::Invalid("Feedback text is required".to_string()));
    }
    Ok(text.to_string())
}

/// A rating of zero comes from an untouched star widget and means "no rating".
fn rating(value: Option<u8>) -> Result<Option<u8>, ServiceError> {
    match value {
        None | Some(0) => Ok(None),
        Some(rating @ 1..=5) => Ok(Some(rating)),
        Some(other) => {
            Err(ServiceError::Invalid(format!("Rating must be between 1 and 5, got {other}")))
        }
    }
}

pub(crate) fn prepare(
    session: &Session,
    request: FeedbackCreate,
) -> Result<NewFeedback, ServiceError> {
    require_advisor(session)?;

    let (subject_id, assignment_id) = match request.kind {
        EntityKind::Subject => (Some(request.target_id), None),
        EntityKind::Assignment => (None, Some(request.target_id)),
        EntityKind::Student => {
            return Err(ServiceError::Invalid(
                "Feedback must target a subject or an assignment".to_string(),
            ))
        }
    };

    Ok(NewFeedback {
        advisor_id: session.user_id.clone(),
        student_id: request.student_id,
        feedback_text: feedback_text(&request.feedback_text)?,
        rating: rating(request.rating)?,
        subject_id,
        assignment_id,
    })
}

pub(crate) async fn create(
    backend: &BackendClient,
    session: &Session,
    request: FeedbackCreate,
) -> Result<Feedback, ServiceError> {
    let body = prepare(session, request)?;
    let created = feedback::create(backend, session, &body).await?;
    tracing::info!(
        feedback_id = %created.id,
        student_id = %body.student_id,
        target = ?created.target(),
        "Feedback created"
    );
    Ok(created)
}

/// One feedback on the subject plus one per selected assignment, all with the same text.
/// Every create must succeed for the batch to succeed.
pub(crate) async fn create_batch(
    backend: &BackendClient,
    session: &Session,
    request: FeedbackBatchCreate,
) -> Result<FeedbackBatchResponse, ServiceError> {
    require_advisor(session)?;
    let text = feedback_text(&request.feedback_text)?;
    let rating = rating(request.rating)?;

    let subject_body = NewFeedback {
        advisor_id: session.user_id.clone(),
        student_id: request.student_id.clone(),
        feedback_text: text,
        rating,
        subject_id: Some(request.subject_id.clone()),
        assignment_id: None,
    };

    let mut assignment_ids: Vec<String> = Vec::new();
    for id in request.assignment_ids {
        let id = id.trim().to_string();
        if !id.is_empty() && !assignment_ids.contains(&id) {
            assignment_ids.push(id);
        }
    }

    let mut tasks = JoinSet::new();
    for (position, assignment_id) in assignment_ids.into_iter().enumerate() {
        let backend = backend.clone();
        let session = session.clone();
        let body = NewFeedback {
            subject_id: None,
            assignment_id: Some(assignment_id),
            ..subject_body.clone()
        };
        tasks.spawn(async move {
            let created = feedback::create(&backend, &session, &body).await;
            (position, created)
        });
    }

    let subject = feedback::create(backend, session, &subject_body).await;

    let mut created: Vec<(usize, Feedback)> = Vec::with_capacity(tasks.len());
    let mut failure: Option<ClientError> = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((position, Ok(feedback))) => created.push((position, feedback)),
            Ok((_, Err(err))) => {
                failure.get_or_insert(err);
            }
            Err(err) => {
                return Err(ServiceError::Internal(format!("Feedback batch aborted: {err}")));
            }
        }
    }

    let subject = subject?;
    if let Some(err) = failure {
        tracing::warn!(
            subject_id = %request.subject_id,
            created = created.len(),
            error = %err,
            "Feedback batch partially failed"
        );
        return Err(err.into());
    }

    created.sort_by_key(|(position, _)| *position);
    let assignments: Vec<Feedback> = created.into_iter().map(|(_, feedback)| feedback).collect();
    tracing::info!(
        subject_id = %request.subject_id,
        student_id = %request.student_id,
        assignments = assignments.len(),
        "Batch feedback created"
    );

    Ok(FeedbackBatchResponse { subject, assignments_count: assignments.len(), assignments })
}

pub(crate) async fn edit(
    backend: &BackendClient,
    session: &Session,
    feedback_id: &str,
    request: FeedbackEdit,
) -> Result<Feedback, ServiceError> {
    require_advisor(session)?;
    let update = FeedbackUpdate {
        feedback_text: request.feedback_text.as_deref().map(feedback_text).transpose()?,
        rating: rating(request.rating)?,
    };
    Ok(feedback::update(backend, session, feedback_id, &update).await?)
}

pub(crate) async fn remove(
    backend: &BackendClient,
    session: &Session,
    feedback_id: &str,
) -> Result<(), ServiceError> {
    require_advisor(session)?;
    feedback::delete(backend, session, feedback_id).await?;
    tracing::info!(feedback_id, "Feedback deleted");
    Ok(())
}
