use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    entities::notification::Notification,
    errors::NotificationError,
    notifier::NotificationTransport,
    settings::AppConfig,
};

/// Sends notifications through an authenticated SMTP relay.
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(config: &AppConfig) -> Result<Self, NotificationError> {
        // secure = TLS from the first byte (usually 465), otherwise STARTTLS (usually 587)
        let builder = if config.smtp_secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| NotificationError::Transport(e.to_string()))?;

        let mailer = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_password.to_string(),
            ))
            .timeout(Some(Duration::from_secs(config.notification_timeout_secs)))
            .build();

        Ok(SmtpNotifier { mailer })
    }
}

#[async_trait]
impl NotificationTransport for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let message = build_message(notification)?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

fn mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse::<Mailbox>()
        .map_err(|_| NotificationError::InvalidAddress(address.to_string()))
}

pub(crate) fn build_message(notification: &Notification) -> Result<Message, NotificationError> {
    let mut builder = Message::builder()
        .from(mailbox(&notification.from)?)
        .to(mailbox(&notification.to)?)
        .subject(notification.subject.clone());

    // an unusable reply-to only costs the convenience of replying directly
    if let Some(reply_to) = &notification.reply_to {
        match mailbox(reply_to) {
            Ok(mbox) => builder = builder.reply_to(mbox),
            Err(e) => tracing::warn!("Dropping Reply-To header: {}", e),
        }
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            notification.text.clone(),
            notification.html.clone(),
        ))
        .map_err(|e| NotificationError::Message(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(reply_to: Option<&str>) -> Notification {
        Notification {
            to: "owner@example.com".into(),
            from: "Site <site@example.com>".into(),
            subject: "Contact form: hello".into(),
            html: "<p>hi</p>".into(),
            text: "hi".into(),
            reply_to: reply_to.map(str::to_string),
        }
    }

    #[test]
    fn builds_multipart_message_with_reply_to() {
        let message = build_message(&notification(Some("visitor@example.com"))).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Reply-To: visitor@example.com"));
        assert!(raw.contains("Subject: Contact form: hello"));
        assert!(raw.contains("multipart/alternative"));
    }

    #[test]
    fn invalid_reply_to_is_dropped() {
        let message = build_message(&notification(Some("not an address"))).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(!raw.contains("Reply-To"));
    }

    #[test]
    fn invalid_recipient_is_an_error() {
        let mut n = notification(None);
        n.to = "nobody".into();

        assert!(matches!(build_message(&n), Err(NotificationError::InvalidAddress(_))));
    }
}
