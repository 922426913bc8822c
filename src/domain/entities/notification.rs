use crate::{
    entities::submission::Submission,
    utils::sanitize::{escape_html, escape_text},
};

/// Addresses used for every submission notification.
#[derive(Debug, Clone)]
pub struct Recipients {
    pub to: String,
    pub from: String,
}

/// Message handed to a notification transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: Option<String>,
}

impl Notification {
    /// Builds the notification for a stored submission.
    ///
    /// Every submitted field is escaped before it lands in the payload: entity
    /// encoded in the HTML part, and encoded with whitespace kept in the
    /// subject and plain-text part.
    pub fn for_submission(submission: &Submission, recipients: &Recipients) -> Self {
        let name = escape_html(&submission.name);
        let email = escape_html(&submission.email);
        let subject = escape_html(&submission.subject);
        let message = escape_html(&submission.message);
        let received = submission.timestamp.to_rfc3339();

        let html = format!(
            "<h2>New contact form submission</h2>\
             <p><strong>Name:</strong> {name}</p>\
             <p><strong>Email:</strong> {email}</p>\
             <p><strong>Subject:</strong> {subject}</p>\
             <p><strong>Message:</strong></p>\
             <p style=\"white-space: pre-wrap\">{message}</p>\
             <hr><p><small>Received {received}</small></p>"
        );

        let text = format!(
            "New contact form submission\n\n\
             Name: {}\nEmail: {}\nSubject: {}\n\nMessage:\n{}\n\nReceived {received}\n",
            escape_text(&submission.name),
            escape_text(&submission.email),
            escape_text(&submission.subject),
            escape_text(&submission.message),
        );

        // only an address that needed no escaping is echoed into a header
        let reply_to = Some(submission.email.clone()).filter(|email| escape_text(email) == *email);

        Notification {
            to: recipients.to.clone(),
            from: recipients.from.clone(),
            subject: format!("Contact form: {}", escape_text(&single_line(&submission.subject))),
            html,
            text,
            reply_to,
        }
    }
}

fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
