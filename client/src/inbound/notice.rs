//! Transient user notices.
//!
//! Every outcome a screen reports, success or failure, becomes a [`Notice`].
//! Internal failures are redacted; their detail is already in the logs.

use serde::Serialize;
use tracing::error;

use crate::domain::ports::RegistrationOutcome;
use crate::domain::{Destination, Error, ErrorCode, SubmissionOutcome};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Confirmation of a completed action.
    Info,
    /// A failed action.
    Error,
}

/// Short message shown once and then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub text: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    /// Error notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    /// Notice for a completed photo submission.
    ///
    /// # Examples
    /// ```
    /// use paddock::domain::{Destination, RecordId, SubmissionOutcome};
    /// use paddock::inbound::notice::Notice;
    /// use url::Url;
    ///
    /// let outcome = SubmissionOutcome {
    ///     destination: Destination::PendingApproval,
    ///     record_id: RecordId::new("req-1").unwrap(),
    ///     image_url: Url::parse("https://img.invalid/a.jpg").unwrap(),
    /// };
    /// assert_eq!(Notice::submitted(&outcome).text, "Photo submitted for approval!");
    /// ```
    pub fn submitted(outcome: &SubmissionOutcome) -> Self {
        match outcome.destination {
            Destination::Published => Self::info("Photo uploaded successfully!"),
            Destination::PendingApproval => Self::info("Photo submitted for approval!"),
        }
    }

    /// Notice for a push registration attempt.
    pub fn registered(outcome: &RegistrationOutcome) -> Self {
        match outcome {
            RegistrationOutcome::Registered(_) => Self::info("Notifications enabled"),
            RegistrationOutcome::Skipped => Self::info("Sign in to enable notifications"),
        }
    }

    /// Notice shown when the gallery page cannot be fetched.
    pub fn gallery_failed() -> Self {
        Self::error("Failed to load images.")
    }
}

impl From<&Error> for Notice {
    fn from(err: &Error) -> Self {
        match err.code() {
            ErrorCode::InternalError => {
                error!(error = %err, "internal failure reported to user");
                Self::error("Something went wrong. Please try again.")
            }
            _ => Self::error(err.message()),
        }
    }
}

impl From<Error> for Notice {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}
