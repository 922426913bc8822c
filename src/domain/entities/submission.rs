use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Raw body of a `POST /contact` request.
///
/// Every field is optional at the serde level so that a missing field is
/// reported by validation rather than as a malformed body.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContactForm {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,

    #[validate(required, length(min = 1))]
    pub email: Option<String>,

    #[validate(required, length(min = 1))]
    pub subject: Option<String>,

    #[validate(required, length(min = 1))]
    pub message: Option<String>,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            subject: Some(subject.into()),
            message: Some(message.into()),
        }
    }
}

/// One accepted contact-form event as stored in the submission log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub notification_sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_sent_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn apply_outcome(&mut self, outcome: &NotificationOutcome) {
        match outcome {
            NotificationOutcome::Sent { at } => {
                self.notification_sent = true;
                self.notification_sent_at = Some(*at);
                self.notification_error = None;
            }
            NotificationOutcome::Failed { error } => {
                self.notification_sent = false;
                self.notification_error = Some(error.clone());
            }
        }
    }
}

impl TryFrom<ContactForm> for Submission {
    type Error = validator::ValidationErrors;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        form.validate()?;

        // validate() guarantees every field is present
        let ContactForm { name, email, subject, message } = form;

        Ok(Submission {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            subject: subject.unwrap_or_default(),
            message: message.unwrap_or_default(),
            notification_sent: false,
            notification_error: None,
            notification_sent_at: None,
        })
    }
}

/// Final result of the single notification attempt made for a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationOutcome {
    Sent { at: DateTime<Utc> },
    Failed { error: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
}

impl ContactResponse {
    pub fn ok() -> Self {
        ContactResponse { success: true }
    }
}
