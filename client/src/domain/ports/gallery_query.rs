//! Driving port for reading the public gallery.

use async_trait::async_trait;

use crate::domain::{Error, Photo};

/// Gallery read use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GalleryQuery: Send + Sync {
    /// Newest approved photos, newest first, at most one page.
    async fn latest(&self) -> Result<Vec<Photo>, Error>;
}
