use std::process::Stdio;

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, process::Command};

use crate::{
    entities::notification::Notification,
    errors::NotificationError,
    notifier::NotificationTransport,
};

/// Hands notifications to a local `mail`-compatible command.
///
/// Invoked as `<program> -s <subject> [-r <from>] <to>` with the plain-text
/// body on stdin. Arguments are passed directly, never through a shell.
pub struct MailCommandNotifier {
    program: String,
}

impl MailCommandNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        MailCommandNotifier { program: program.into() }
    }

    fn args(notification: &Notification) -> Vec<String> {
        let mut args = vec!["-s".to_string(), notification.subject.clone()];
        if !notification.from.trim().is_empty() {
            args.push("-r".into());
            args.push(notification.from.clone());
        }
        args.push(notification.to.clone());
        args
    }
}

#[async_trait]
impl NotificationTransport for MailCommandNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let mut child = Command::new(&self.program)
            .args(Self::args(notification))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| NotificationError::Command(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(notification.text.as_bytes())
                .await
                .map_err(|e| NotificationError::Command(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| NotificationError::Command(e.to_string()))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(NotificationError::Command(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )))
        }
    }

    fn name(&self) -> &'static str {
        "mail_command"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification() -> Notification {
        Notification {
            to: "owner@example.com".into(),
            from: "site@example.com".into(),
            subject: "Contact form: hi".into(),
            html: String::new(),
            text: "hello".into(),
            reply_to: None,
        }
    }

    #[test]
    fn builds_mail_arguments() {
        assert_eq!(
            MailCommandNotifier::args(&notification()),
            vec!["-s", "Contact form: hi", "-r", "site@example.com", "owner@example.com"]
        );
    }

    #[test]
    fn omits_sender_when_unset() {
        let mut n = notification();
        n.from = String::new();

        assert_eq!(
            MailCommandNotifier::args(&n),
            vec!["-s", "Contact form: hi", "owner@example.com"]
        );
    }

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let notifier = MailCommandNotifier::new("definitely-not-a-mail-binary-4711");

        let result = notifier.send(&notification()).await;

        assert!(matches!(result, Err(NotificationError::Command(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        let notifier = MailCommandNotifier::new("false");

        let result = notifier.send(&notification()).await;

        assert!(matches!(result, Err(NotificationError::Command(_))));
    }
}
