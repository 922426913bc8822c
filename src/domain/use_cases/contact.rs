use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::{task::JoinHandle, time::timeout};

use crate::{
    entities::{
        notification::{Notification, Recipients},
        submission::{ContactForm, NotificationOutcome, Submission},
    },
    errors::{ContactError, NotificationError},
    notifier::NotificationTransport,
    repositories::submission_log::SubmissionRepository,
};

/// Transport plus the fixed message parameters for outgoing notifications.
#[derive(Clone)]
pub struct Notifier {
    pub transport: Arc<dyn NotificationTransport>,
    pub recipients: Recipients,
    pub timeout: Duration,
}

/// A persisted submission and, when a transport is configured, the detached
/// task delivering its notification.
pub struct AcceptedSubmission {
    pub submission: Submission,
    pub notification: Option<JoinHandle<()>>,
}

pub struct ContactHandler<R>
where
    R: SubmissionRepository + 'static,
{
    pub submission_repo: Arc<R>,
    notifier: Option<Notifier>,
}

impl<R> ContactHandler<R>
where
    R: SubmissionRepository + 'static,
{
    pub fn new(submission_repo: R) -> Self {
        ContactHandler {
            submission_repo: Arc::new(submission_repo),
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Validates and stores a submission, then starts its notification.
    ///
    /// Returns once the submission is durably in the log. The notification
    /// runs on its own task and only ever updates the stored entry.
    pub async fn submit(&self, form: ContactForm) -> Result<AcceptedSubmission, ContactError> {
        let submission = Submission::try_from(form)?;

        if let Err(e) = self.submission_repo.append(&submission).await {
            tracing::error!(id = %submission.id, "Failed to persist submission: {}", e);
            return Err(e.into());
        }

        tracing::info!(id = %submission.id, "Contact submission stored");

        let notification = self
            .notifier
            .as_ref()
            .map(|notifier| self.dispatch(notifier.clone(), &submission));

        Ok(AcceptedSubmission { submission, notification })
    }

    fn dispatch(&self, notifier: Notifier, submission: &Submission) -> JoinHandle<()> {
        let repo = Arc::clone(&self.submission_repo);
        let id = submission.id;
        let message = Notification::for_submission(submission, &notifier.recipients);

        tokio::spawn(async move {
            let transport = notifier.transport.name();

            let result = match timeout(notifier.timeout, notifier.transport.send(&message)).await {
                Ok(result) => result,
                Err(_) => Err(NotificationError::Timeout(notifier.timeout)),
            };

            let outcome = match result {
                Ok(()) => {
                    tracing::info!(%id, transport, "Notification sent");
                    NotificationOutcome::Sent { at: Utc::now() }
                }
                Err(e) => {
                    tracing::warn!(%id, transport, "Notification failed: {}", e);
                    NotificationOutcome::Failed { error: e.to_string() }
                }
            };

            if let Err(e) = repo.record_outcome(&id, &outcome).await {
                tracing::error!(%id, "Failed to record notification outcome: {}", e);
            }
        })
    }
}
