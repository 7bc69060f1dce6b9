//! Driving port for submitting a photo to the gallery.

use async_trait::async_trait;

use crate::domain::{Error, SubmissionOutcome};

/// Raw image payload chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// MIME type reported by the picker, e.g. `image/jpeg`.
    pub content_type: String,
}

impl PhotoUpload {
    /// Build an upload from bytes and a MIME type.
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    /// File extension used in the blob name.
    ///
    /// Unknown types fall back to `jpg`, the format the picker produces.
    ///
    /// # Examples
    /// ```
    /// use paddock::domain::ports::PhotoUpload;
    ///
    /// assert_eq!(PhotoUpload::new(vec![], "image/png").extension(), "png");
    /// assert_eq!(PhotoUpload::new(vec![], "application/octet-stream").extension(), "jpg");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self.content_type.trim().to_ascii_lowercase().as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            "image/heic" => "heic",
            "image/gif" => "gif",
            _ => "jpg",
        }
    }
}

/// Photo submission use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoSubmission: Send + Sync {
    /// Upload `photo` for the signed-in identity and record it in the
    /// collection its role allows.
    async fn submit(&self, photo: PhotoUpload) -> Result<SubmissionOutcome, Error>;
}
