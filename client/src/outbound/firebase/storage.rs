//! Cloud Storage for Firebase adapter.
//!
//! Objects are addressed as a single URL-encoded path segment under
//! `/v0/b/{bucket}/o`. Retrieval URLs embed the object's first download token.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::debug;

use super::dto::StorageObjectDto;
use super::http::{HttpFailure, authorised, send};
use super::session::SessionHandle;
use crate::domain::ports::{BlobStore, BlobStoreError};

/// [`BlobStore`] backed by the Firebase Storage REST API.
pub struct FirebaseBlobStore {
    client: Client,
    objects: Url,
    session: SessionHandle,
}

impl FirebaseBlobStore {
    /// Adapter for `bucket`, given the storage `v0/` API root.
    ///
    /// # Errors
    ///
    /// Returns an error when the bucket name cannot form a URL.
    pub fn new(
        client: Client,
        root: &Url,
        bucket: &str,
        session: SessionHandle,
    ) -> Result<Self, url::ParseError> {
        let mut objects = root.clone();
        objects
            .path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["b", bucket, "o"]);
        Ok(Self {
            client,
            objects,
            session,
        })
    }

    /// Metadata URL for `path`; slashes inside the path are percent-encoded.
    fn object_url(&self, path: &str) -> Result<Url, BlobStoreError> {
        let mut url = self.objects.clone();
        url.path_segments_mut()
            .map_err(|()| BlobStoreError::rejected("storage root cannot address objects"))?
            .push(path);
        Ok(url)
    }

    fn upload_url(&self, path: &str) -> Url {
        let mut url = self.objects.clone();
        url.query_pairs_mut().append_pair("name", path);
        url
    }
}

fn map_failure(failure: HttpFailure, path: &str) -> BlobStoreError {
    match failure {
        HttpFailure::Missing(_) => BlobStoreError::not_found(path),
        HttpFailure::Refused(message) => BlobStoreError::rejected(message),
        HttpFailure::Unavailable(message) => BlobStoreError::connection(message),
    }
}

fn decode_object(body: &[u8]) -> Result<StorageObjectDto, BlobStoreError> {
    serde_json::from_slice(body).map_err(|err| {
        BlobStoreError::rejected(format!("invalid storage metadata payload: {err}"))
    })
}

#[async_trait]
impl BlobStore for FirebaseBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobStoreError> {
        let size = bytes.len();
        let request = self
            .client
            .post(self.upload_url(path))
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        let body = send(authorised(request, &self.session))
            .await
            .map_err(|failure| map_failure(failure, path))?;
        let object = decode_object(&body)?;
        debug!(blob = %object.name, size, "uploaded object");
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<Url, BlobStoreError> {
        let metadata_url = self.object_url(path)?;
        let body = send(authorised(self.client.get(metadata_url.clone()), &self.session))
            .await
            .map_err(|failure| map_failure(failure, path))?;
        let object = decode_object(&body)?;
        let token = object.first_download_token().ok_or_else(|| {
            BlobStoreError::rejected(format!("object {path} has no download token"))
        })?;

        let mut url = metadata_url;
        url.query_pairs_mut()
            .append_pair("alt", "media")
            .append_pair("token", token);
        Ok(url)
    }

    async fn delete(&self, path: &str) -> Result<(), BlobStoreError> {
        let url = self.object_url(path)?;
        send(authorised(self.client.delete(url), &self.session))
            .await
            .map_err(|failure| map_failure(failure, path))?;
        debug!(blob = %path, "deleted object");
        Ok(())
    }
}
