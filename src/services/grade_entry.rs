use crate::clients::grades::{self, GradeWrite};
use crate::clients::BackendClient;
use crate::core::security::Session;
use crate::models::records::Grade;
use crate::schemas::grade::GradeForm;
use crate::services::ServiceError;

/// Grade values after the form checks: `0 <= grade <= out_of` and `out_of > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Score {
    pub(crate) grade: f64,
    pub(crate) out_of: f64,
}

pub(crate) fn check_score(grade: Option<f64>, out_of: Option<f64>) -> Result<Score, ServiceError> {
    let (Some(grade), Some(out_of)) = (grade, out_of) else {
        return Err(ServiceError::Invalid("Grade and Out of Grade are required".to_string()));
    };

    if !grade.is_finite() || !out_of.is_finite() || grade < 0.0 || out_of < 0.0 {
        return Err(ServiceError::Invalid("Grades must be non-negative numbers".to_string()));
    }
    if out_of == 0.0 {
        return Err(ServiceError::Invalid("Out of Grade must be greater than zero".to_string()));
    }
    if grade > out_of {
        return Err(ServiceError::Invalid(
            "Grade cannot be greater than the Out of Grade".to_string(),
        ));
    }

    Ok(Score { grade, out_of })
}

fn write_body<'a>(
    session: &'a Session,
    form: &'a GradeForm,
) -> Result<GradeWrite<'a>, ServiceError> {
    let score = check_score(form.grade, form.out_of)?;
    Ok(GradeWrite {
        grade: score.grade,
        out_of: score.out_of,
        s_id: form.s_id.trim(),
        a_id: form.a_id.trim(),
        notes: form.notes.as_deref().unwrap_or_default(),
        uid: &session.user_id,
    })
}

pub(crate) async fn create(
    backend: &BackendClient,
    session: &Session,
    form: &GradeForm,
) -> Result<Grade, ServiceError> {
    let body = write_body(session, form)?;
    let grade = grades::create(backend, session, &body).await?;
    tracing::info!(grade_id = %grade.id, assignment_id = body.a_id, "Grade recorded");
    Ok(grade)
}

pub(crate) async fn update(
    backend: &BackendClient,
    session: &Session,
    grade_id: &str,
    form: &GradeForm,
) -> Result<Grade, ServiceError> {
    let body = write_body(session, form)?;
    Ok(grades::update(backend, session, grade_id, &body).await?)
}

pub(crate) async fn delete(
    backend: &BackendClient,
    session: &Session,
    grade_id: &str,
) -> Result<(), ServiceError> {
    grades::delete(backend, session, grade_id).await?;
    tracing::info!(grade_id, "Grade deleted");
    Ok(())
}
