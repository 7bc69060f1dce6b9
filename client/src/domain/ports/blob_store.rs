//! Driven port for hosted object storage.

use async_trait::async_trait;
use url::Url;

use super::define_port_error;

define_port_error! {
    /// Errors raised by blob store adapters.
    pub enum BlobStoreError {
        /// Storage could not be reached.
        Connection { message: String } => "blob store unreachable: {message}",
        /// Storage refused the operation.
        Rejected { message: String } => "blob store rejected the request: {message}",
        /// No object exists at the path.
        NotFound { path: String } => "no blob stored at {path}",
    }
}

/// Port for uploading photos and resolving their retrieval URLs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `path`, replacing any existing object.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobStoreError>;

    /// Public retrieval URL for the object at `path`.
    async fn download_url(&self, path: &str) -> Result<Url, BlobStoreError>;

    /// Remove the object at `path`.
    async fn delete(&self, path: &str) -> Result<(), BlobStoreError>;
}

/// Stateless stand-in that accepts every upload and derives URLs from paths.
#[derive(Debug, Clone)]
pub struct FixtureBlobStore {
    base: Url,
}

impl FixtureBlobStore {
    /// Fixture rooted at `base`; URLs are `base` joined with the object path.
    pub fn new(base: Url) -> Self {
        Self { base }
    }
}

#[async_trait]
impl BlobStore for FixtureBlobStore {
    async fn upload(
        &self,
        _path: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), BlobStoreError> {
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<Url, BlobStoreError> {
        self.base
            .join(path)
            .map_err(|err| BlobStoreError::rejected(err.to_string()))
    }

    async fn delete(&self, _path: &str) -> Result<(), BlobStoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_urls_follow_paths() {
        let base = Url::parse("https://blobs.invalid/").expect("base url");
        let store = FixtureBlobStore::new(base);
        store
            .upload("gallery/u1/a.jpg", vec![1, 2, 3], "image/jpeg")
            .await
            .expect("upload succeeds");
        let url = store
            .download_url("gallery/u1/a.jpg")
            .await
            .expect("url resolves");
        assert_eq!(url.as_str(), "https://blobs.invalid/gallery/u1/a.jpg");
    }
}
