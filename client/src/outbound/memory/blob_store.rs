//! Blob store kept in process memory.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::domain::ports::{BlobStore, BlobStoreError};

#[derive(Debug, Clone)]
struct StoredBlob {
    bytes: Vec<u8>,
    content_type: String,
}

/// [`BlobStore`] that keeps objects in a map and serves URLs under `base`.
pub struct MemoryBlobStore {
    base: Url,
    objects: Mutex<BTreeMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    /// Empty store whose URLs are rooted at `base`.
    pub fn new(base: Url) -> Self {
        Self {
            base,
            objects: Mutex::new(BTreeMap::new()),
        }
    }

    /// Stored paths in lexical order.
    pub fn paths(&self) -> Result<Vec<String>, BlobStoreError> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    /// Bytes and content type stored at `path`.
    pub fn object(&self, path: &str) -> Result<Option<(Vec<u8>, String)>, BlobStoreError> {
        Ok(self
            .lock()?
            .get(path)
            .map(|blob| (blob.bytes.clone(), blob.content_type.clone())))
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, StoredBlob>>, BlobStoreError> {
        self.objects
            .lock()
            .map_err(|_| BlobStoreError::rejected("blob store lock poisoned"))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobStoreError> {
        if path.trim().is_empty() {
            return Err(BlobStoreError::rejected("blob path must not be empty"));
        }
        debug!(blob = path, size = bytes.len(), "stored blob");
        self.lock()?.insert(
            path.to_owned(),
            StoredBlob {
                bytes,
                content_type: content_type.to_owned(),
            },
        );
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<Url, BlobStoreError> {
        if !self.lock()?.contains_key(path) {
            return Err(BlobStoreError::not_found(path));
        }
        self.base
            .join(path)
            .map_err(|err| BlobStoreError::rejected(err.to_string()))
    }

    async fn delete(&self, path: &str) -> Result<(), BlobStoreError> {
        match self.lock()?.remove(path) {
            Some(_) => Ok(()),
            None => Err(BlobStoreError::not_found(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn store() -> MemoryBlobStore {
        MemoryBlobStore::new(Url::parse("https://blobs.invalid/bucket/").expect("base url"))
    }

    #[tokio::test]
    async fn urls_are_only_issued_for_stored_objects() {
        let blobs = store();
        let err = blobs
            .download_url("gallery/u1/missing.jpg")
            .await
            .expect_err("nothing stored");
        assert_eq!(err, BlobStoreError::not_found("gallery/u1/missing.jpg"));

        blobs
            .upload("gallery/u1/a.jpg", vec![1, 2], "image/jpeg")
            .await
            .expect("upload succeeds");
        let url = blobs
            .download_url("gallery/u1/a.jpg")
            .await
            .expect("url issued");
        assert_eq!(url.as_str(), "https://blobs.invalid/bucket/gallery/u1/a.jpg");
        assert_eq!(
            blobs.object("gallery/u1/a.jpg").expect("lock"),
            Some((vec![1, 2], "image/jpeg".to_owned()))
        );
    }

    #[tokio::test]
    async fn delete_removes_object() {
        let blobs = store();
        blobs
            .upload("gallery/u1/a.jpg", vec![1], "image/jpeg")
            .await
            .expect("upload succeeds");
        blobs.delete("gallery/u1/a.jpg").await.expect("delete succeeds");
        assert!(blobs.paths().expect("lock").is_empty());
    }
}
