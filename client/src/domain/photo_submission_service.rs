//! Photo submission pipeline.
//!
//! Upload, resolve the retrieval URL, refresh the role claim, then write one
//! record to the collection the role allows. Each step is awaited before the
//! next is issued, so the claim is always known before the insert.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entity_store::EntityStore;
use crate::domain::ports::{
    BlobStore, BlobStoreError, DocumentStore, IdentityProvider, PhotoSubmission, PhotoUpload,
};
use crate::domain::session_service::{require_identity, resolve_role};
use crate::domain::{Destination, Error, NewPhoto, SubmissionOutcome, UserId};

/// Pipeline implementing [`PhotoSubmission`].
pub struct PhotoSubmissionPipeline<I, B, D> {
    identity: Arc<I>,
    blobs: Arc<B>,
    records: EntityStore<D>,
}

impl<I, B, D> PhotoSubmissionPipeline<I, B, D> {
    /// Wire the pipeline to its collaborators.
    pub fn new(identity: Arc<I>, blobs: Arc<B>, store: Arc<D>) -> Self {
        Self {
            identity,
            blobs,
            records: EntityStore::new(store),
        }
    }
}

pub(crate) fn map_blob_error(error: BlobStoreError) -> Error {
    match error {
        BlobStoreError::Connection { message } => {
            Error::service_unavailable(format!("blob store unavailable: {message}"))
        }
        BlobStoreError::Rejected { message } => {
            Error::service_unavailable(format!("blob store rejected the request: {message}"))
        }
        BlobStoreError::NotFound { path } => Error::not_found(format!("no blob stored at {path}")),
    }
}

/// Blob path for a new upload: `gallery/{uid}/{uuid}.{ext}`.
pub(crate) fn blob_path(uid: &UserId, extension: &str) -> String {
    format!("gallery/{uid}/{}.{extension}", Uuid::new_v4())
}

#[async_trait]
impl<I, B, D> PhotoSubmission for PhotoSubmissionPipeline<I, B, D>
where
    I: IdentityProvider,
    B: BlobStore,
    D: DocumentStore,
{
    async fn submit(&self, photo: PhotoUpload) -> Result<SubmissionOutcome, Error> {
        let identity = require_identity(self.identity.as_ref())?;
        if photo.bytes.is_empty() {
            return Err(Error::invalid_request("Please select an image first"));
        }

        let path = blob_path(&identity.uid, photo.extension());
        self.blobs
            .upload(&path, photo.bytes, &photo.content_type)
            .await
            .map_err(map_blob_error)?;
        let image_url = self
            .blobs
            .download_url(&path)
            .await
            .map_err(map_blob_error)?;

        let role = resolve_role(self.identity.as_ref(), &identity, true).await?;
        let destination = Destination::from(role.trust());

        let record = NewPhoto::new(&identity, image_url.clone(), path.clone());
        let record_id = match self.records.insert_photo(&record, destination).await {
            Ok(id) => id,
            Err(err) => {
                warn!(
                    uid = %identity.uid,
                    blob = %path,
                    error = %err,
                    "photo record insert failed; uploaded blob left orphaned"
                );
                return Err(err);
            }
        };

        info!(
            uid = %identity.uid,
            ?destination,
            record = %record_id,
            "photo submitted"
        );
        Ok(SubmissionOutcome {
            destination,
            record_id,
            image_url,
        })
    }
}
