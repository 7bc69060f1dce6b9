//! Driving port for the moderation queue.

use async_trait::async_trait;

use crate::domain::{Error, Photo, RecordId};

/// Moderation use-cases; only roles that can moderate may call them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationCommand: Send + Sync {
    /// Queued photos, newest first, at most one page.
    async fn pending(&self) -> Result<Vec<Photo>, Error>;

    /// Publish a queued photo and return its new published id.
    async fn approve(&self, id: &RecordId) -> Result<RecordId, Error>;

    /// Drop a queued photo and its blob.
    async fn reject(&self, id: &RecordId) -> Result<(), Error>;
}
