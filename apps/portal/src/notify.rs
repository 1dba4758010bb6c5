//! User-facing notifications and the yes/no confirmation step.
//!
//! Notifications are transient: each carries an auto-dismiss delay and nothing
//! is kept once it has been shown.

use std::io::{BufRead, Write};
use std::time::Duration;

pub const LOGIN_DISMISS: Duration = Duration::from_millis(1500);
pub const SHORT_DISMISS: Duration = Duration::from_millis(3000);
pub const SUBMISSION_ERROR_DISMISS: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub text: String,
    /// `None` means the notification stays until acknowledged.
    pub dismiss_after: Option<Duration>,
}

impl Notification {
    pub fn success(title: &str, text: impl Into<String>, dismiss_after: Duration) -> Self {
        Self {
            level: Level::Success,
            title: title.to_string(),
            text: text.into(),
            dismiss_after: Some(dismiss_after),
        }
    }

    pub fn error(title: &str, text: impl Into<String>, dismiss_after: Duration) -> Self {
        Self {
            level: Level::Error,
            title: title.to_string(),
            text: text.into(),
            dismiss_after: Some(dismiss_after),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints notifications to the terminal. Errors go to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(
            "notification {:?} (dismiss after {:?})",
            notification.level,
            notification.dismiss_after
        );
        match notification.level {
            Level::Success => println!("✔ {}: {}", notification.title, notification.text),
            Level::Error => eprintln!("✘ {}: {}", notification.title, notification.text),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfirmPrompt {
    pub title: String,
    pub text: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

/// Interactive yes/no gate in front of destructive actions.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

/// Reads the answer from stdin. Anything other than `y`/`yes` declines.
pub struct ConsoleConfirm;

impl Confirm for ConsoleConfirm {
    fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        eprint!(
            "{}\n{}\n[y] {} / [N] {}: ",
            prompt.title, prompt.text, prompt.confirm_label, prompt.cancel_label
        );
        if std::io::stderr().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Skips the prompt (`--yes`).
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        true
    }
}
