use std::time::Duration;

use thiserror::Error;

use crate::biodata::form::FormError;
use crate::gateway::GatewayError;
use crate::notify::Notification;

pub const MISSING_AUTH_MESSAGE: &str = "No authentication token found. Please log in again.";
pub const GENERIC_MESSAGE: &str = "An unexpected error occurred";

/// Application-level error type.
/// Every variant can be turned into a user-facing `Notification` via `to_notification`.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("No authentication token found")]
    MissingAuth,

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Form error: {0}")]
    Form(#[from] FormError),

    #[error("{failed} of {total} requests failed; first error: {first}")]
    PartialBatch {
        failed: usize,
        total: usize,
        first: GatewayError,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PortalError {
    /// The text shown to the user.
    ///
    /// Server-supplied `{message}` bodies are surfaced verbatim; failures without one
    /// fall back to `generic`. A partial batch reports its first-seen failure.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            PortalError::MissingAuth => MISSING_AUTH_MESSAGE.to_string(),
            PortalError::Gateway(e) => e
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| generic.to_string()),
            PortalError::PartialBatch { first, .. } => first
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| generic.to_string()),
            PortalError::Form(e) => e.to_string(),
            PortalError::Validation(msg) => msg.clone(),
            PortalError::Storage(_) | PortalError::Serde(_) | PortalError::Internal(_) => {
                generic.to_string()
            }
        }
    }

    /// Converts the error into an error notification, logging it on the way.
    pub fn to_notification(
        &self,
        title: &str,
        generic: &str,
        dismiss_after: Duration,
    ) -> Notification {
        match self {
            PortalError::MissingAuth => {
                tracing::warn!("Action blocked: no session token");
            }
            PortalError::PartialBatch { failed, total, first } => {
                tracing::error!("Batch failed ({failed}/{total}): {first}");
            }
            other => {
                tracing::error!("{title}: {other}");
            }
        }
        Notification::error(title, self.user_message(generic), dismiss_after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Level;

    fn api(status: u16, message: Option<&str>) -> GatewayError {
        GatewayError::Api {
            status,
            message: message.map(String::from),
        }
    }

    #[test]
    fn test_missing_auth_has_fixed_message() {
        assert_eq!(
            PortalError::MissingAuth.user_message("ignored"),
            MISSING_AUTH_MESSAGE
        );
    }

    #[test]
    fn test_structured_message_surfaced_verbatim() {
        let err = PortalError::Gateway(api(400, Some("KTP number already registered")));
        assert_eq!(err.user_message("fallback"), "KTP number already registered");
    }

    #[test]
    fn test_unstructured_failure_uses_generic() {
        let err = PortalError::Gateway(api(502, None));
        assert_eq!(err.user_message("Failed to fetch users"), "Failed to fetch users");
    }

    #[test]
    fn test_partial_batch_reports_first_error() {
        let err = PortalError::PartialBatch {
            failed: 2,
            total: 5,
            first: api(422, Some("gpa out of range")),
        };
        assert_eq!(err.user_message(GENERIC_MESSAGE), "gpa out of range");
    }

    #[test]
    fn test_notification_is_error_level() {
        let n = PortalError::Validation("bad".into()).to_notification(
            "Error",
            GENERIC_MESSAGE,
            Duration::from_secs(3),
        );
        assert_eq!(n.level, Level::Error);
        assert_eq!(n.text, "bad");
        assert_eq!(n.dismiss_after, Some(Duration::from_secs(3)));
    }
}
