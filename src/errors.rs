use std::{io, time::Duration};

use derive_more::{Display, Error};
use uuid::Uuid;
use validator::ValidationErrors;

/// Failures of the submission pipeline that reach the caller.
#[derive(Debug, Display, Error)]
pub enum ContactError {
    #[display("All fields are required")]
    Validation(#[error(not(source))] ValidationErrors),

    #[display("Failed to persist submission: {_0}")]
    Persistence(LogError),
}

impl From<ValidationErrors> for ContactError {
    fn from(errors: ValidationErrors) -> Self {
        ContactError::Validation(errors)
    }
}

impl From<LogError> for ContactError {
    fn from(err: LogError) -> Self {
        ContactError::Persistence(err)
    }
}

/// Errors reading or rewriting the submission log document.
#[derive(Debug, Display, Error)]
pub enum LogError {
    #[display("Submission log I/O failed: {_0}")]
    Io(io::Error),

    #[display("Submission log is not a valid JSON array: {_0}")]
    Corrupt(serde_json::Error),

    #[display("Failed to serialize submission log: {_0}")]
    Serialize(#[error(not(source))] String),

    #[display("Submission {_0} not found in log")]
    UnknownSubmission(#[error(not(source))] Uuid),
}

impl From<io::Error> for LogError {
    fn from(err: io::Error) -> Self {
        LogError::Io(err)
    }
}

/// Errors from a notification transport. Never surfaced to HTTP clients.
#[derive(Debug, Display, Error)]
pub enum NotificationError {
    #[display("Invalid address '{_0}'")]
    InvalidAddress(#[error(not(source))] String),

    #[display("Failed to build message: {_0}")]
    Message(#[error(not(source))] String),

    #[display("Transport error: {_0}")]
    Transport(#[error(not(source))] String),

    #[display("Mail command failed: {_0}")]
    Command(#[error(not(source))] String),

    #[display("Notification timed out after {_0:?}")]
    Timeout(#[error(not(source))] Duration),
}
