use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::clients::{self, BackendClient, ClientError};
use crate::core::security::Session;
use crate::models::records::{Assignment, Feedback, Subject};
use crate::models::types::EntityKind;

/// Where feedback lists for a single entity come from.
#[async_trait]
pub(crate) trait FeedbackSource: Send + Sync {
    async fn fetch(&self, kind: EntityKind, id: &str) -> Result<Vec<Feedback>, ClientError>;
}

/// Upstream feedback endpoints, called on behalf of one caller.
pub(crate) struct BackendFeedbackSource {
    backend: BackendClient,
    session: Session,
}

impl BackendFeedbackSource {
    pub(crate) fn new(backend: BackendClient, session: Session) -> Self {
        Self { backend, session }
    }
}

#[async_trait]
impl FeedbackSource for BackendFeedbackSource {
    async fn fetch(&self, kind: EntityKind, id: &str) -> Result<Vec<Feedback>, ClientError> {
        clients::feedback::list_for(&self.backend, &self.session, kind, id).await
    }
}

/// Feedback lists keyed by `(kind, id)` for every subject and assignment on a page.
#[derive(Debug, Default)]
pub(crate) struct FeedbackIndex {
    entries: HashMap<(EntityKind, String), Vec<Feedback>>,
}

impl FeedbackIndex {
    /// Missing keys read as an empty list.
    pub(crate) fn get(&self, kind: EntityKind, id: &str) -> &[Feedback] {
        self.entries.get(&(kind, id.to_string())).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Nested `{subject: {id: [...]}, assignment: {id: [...]}}` shape served to the dashboard.
    pub(crate) fn into_grouped(self) -> HashMap<EntityKind, HashMap<String, Vec<Feedback>>> {
        let mut grouped: HashMap<EntityKind, HashMap<String, Vec<Feedback>>> = HashMap::new();
        for ((kind, id), feedback) in self.entries {
            grouped.entry(kind).or_default().insert(id, feedback);
        }
        grouped
    }
}

/// Fetch feedback for every subject and assignment with a usable id.
///
/// At most `concurrency` fetches are in flight. A failed fetch only empties the list of its
/// own entity; the index always ends up with one key per distinct input id.
pub(crate) async fn build(
    source: Arc<dyn FeedbackSource>,
    subjects: &[Subject],
    assignments: &[Assignment],
    concurrency: usize,
) -> FeedbackIndex {
    let mut targets: Vec<(EntityKind, String)> = Vec::new();
    let subject_ids = subjects.iter().map(|subject| (EntityKind::Subject, subject.id.as_str()));
    let assignment_ids =
        assignments.iter().map(|assignment| (EntityKind::Assignment, assignment.id.as_str()));
    for (kind, id) in subject_ids.chain(assignment_ids) {
        if id.trim().is_empty() {
            continue;
        }
        let key = (kind, id.to_string());
        if !targets.contains(&key) {
            targets.push(key);
        }
    }

    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    for (kind, id) in targets.iter().cloned() {
        let source = Arc::clone(&source);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let feedback = match permits.acquire_owned().await {
                Ok(_permit) => fetch_isolated(source.as_ref(), kind, &id).await,
                Err(_) => Vec::new(),
            };
            (kind, id, feedback)
        });
    }

    let mut entries = HashMap::with_capacity(targets.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((kind, id, feedback)) => {
                entries.insert((kind, id), feedback);
            }
            Err(err) => {
                tracing::error!(error = %err, "Feedback fetch task failed");
                metrics::counter!("feedback_index_fetch_failures_total").increment(1);
            }
        }
    }

    // Entities whose task panicked still get their empty slot.
    for key in targets {
        entries.entry(key).or_default();
    }

    FeedbackIndex { entries }
}

/// Feedback for the single entity behind the feedback dialog.
pub(crate) async fn lookup_one(
    source: &dyn FeedbackSource,
    kind: EntityKind,
    id: &str,
) -> Result<Vec<Feedback>, ClientError> {
    match source.fetch(kind, id).await {
        Err(err) if err.is_not_found() => Ok(Vec::new()),
        other => other,
    }
}

async fn fetch_isolated(source: &dyn FeedbackSource, kind: EntityKind, id: &str) -> Vec<Feedback> {
    match source.fetch(kind, id).await {
        Ok(feedback) => feedback,
        Err(err) if err.is_not_found() => {
            tracing::debug!(kind = kind.as_str(), id, "No feedback recorded");
            Vec::new()
        }
        Err(err) => {
            tracing::warn!(kind = kind.as_str(), id, error = %err, "Failed to fetch feedback");
            metrics::counter!("feedback_index_fetch_failures_total").increment(1);
            Vec::new()
        }
    }
}
