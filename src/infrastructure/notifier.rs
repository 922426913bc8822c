use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::notification::Notification,
    errors::NotificationError,
    settings::{AppConfig, TransportKind},
};

pub mod mail_command;
pub mod smtp;

use mail_command::MailCommandNotifier;
use smtp::SmtpNotifier;

/// Delivers a submission notification out of band.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Builds the configured transport, or `None` when notifications are disabled.
pub fn from_config(
    config: &AppConfig,
) -> Result<Option<Arc<dyn NotificationTransport>>, NotificationError> {
    if !config.notification_enabled {
        return Ok(None);
    }

    let transport: Arc<dyn NotificationTransport> = match config.notification_transport {
        TransportKind::Smtp => Arc::new(SmtpNotifier::new(config)?),
        TransportKind::MailCommand => Arc::new(MailCommandNotifier::new(&config.mail_command)),
    };
    Ok(Some(transport))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_notifications_build_nothing() {
        let transport = from_config(&AppConfig::default()).unwrap();

        assert!(transport.is_none());
    }

    #[test]
    fn builds_mail_command_transport() {
        let config = AppConfig {
            notification_enabled: true,
            notification_transport: TransportKind::MailCommand,
            mail_to: "owner@example.com".into(),
            ..AppConfig::default()
        };

        let transport = from_config(&config).unwrap().unwrap();

        assert_eq!(transport.name(), "mail_command");
    }
}
