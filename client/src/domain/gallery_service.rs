//! Gallery read path and moderation queue.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::entity_store::EntityStore;
use crate::domain::photo_submission_service::map_blob_error;
use crate::domain::ports::{
    BlobStore, DocumentStore, GalleryQuery, IdentityProvider, ModerationCommand,
};
use crate::domain::session_service::{require_identity, resolve_role};
use crate::domain::{Error, GALLERY_PAGE_SIZE, Identity, Photo, RecordId};

/// Service implementing [`GalleryQuery`] and [`ModerationCommand`].
pub struct GalleryService<I, B, D> {
    identity: Arc<I>,
    blobs: Arc<B>,
    records: EntityStore<D>,
    page_size: usize,
}

impl<I, B, D> GalleryService<I, B, D> {
    /// Wire the service with the default page size.
    pub fn new(identity: Arc<I>, blobs: Arc<B>, store: Arc<D>) -> Self {
        Self {
            identity,
            blobs,
            records: EntityStore::new(store),
            page_size: GALLERY_PAGE_SIZE,
        }
    }

    /// Shrink the page size. Values are clamped to `1..=GALLERY_PAGE_SIZE`.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, GALLERY_PAGE_SIZE);
        self
    }
}

impl<I, B, D> GalleryService<I, B, D>
where
    I: IdentityProvider,
{
    async fn require_moderator(&self) -> Result<Identity, Error> {
        let identity = require_identity(self.identity.as_ref())?;
        let role = resolve_role(self.identity.as_ref(), &identity, true).await?;
        if role.can_moderate() {
            Ok(identity)
        } else {
            Err(Error::forbidden("moderation requires a team-member or admin role"))
        }
    }
}

#[async_trait]
impl<I, B, D> GalleryQuery for GalleryService<I, B, D>
where
    I: IdentityProvider,
    B: BlobStore,
    D: DocumentStore,
{
    async fn latest(&self) -> Result<Vec<Photo>, Error> {
        self.records.published_photos(self.page_size).await
    }
}

#[async_trait]
impl<I, B, D> ModerationCommand for GalleryService<I, B, D>
where
    I: IdentityProvider,
    B: BlobStore,
    D: DocumentStore,
{
    async fn pending(&self) -> Result<Vec<Photo>, Error> {
        self.require_moderator().await?;
        self.records.pending_photos(self.page_size).await
    }

    async fn approve(&self, id: &RecordId) -> Result<RecordId, Error> {
        let moderator = self.require_moderator().await?;
        let record = self
            .records
            .pending_record(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("pending photo {id} not found")))?;
        let published = self.records.publish_approved(record).await?;
        self.records.delete_pending(id).await?;
        info!(moderator = %moderator.uid, pending = %id, %published, "photo approved");
        Ok(published)
    }

    async fn reject(&self, id: &RecordId) -> Result<(), Error> {
        let moderator = self.require_moderator().await?;
        let record = self.records.pending_record(id).await?;
        self.records.delete_pending(id).await?;
        let storage_path = record.as_ref().and_then(|stored| {
            stored
                .document
                .str_field(crate::domain::photo::STORAGE_PATH)
                .map(str::to_owned)
        });
        if let Some(path) = storage_path {
            if let Err(err) = self.blobs.delete(&path).await.map_err(map_blob_error) {
                warn!(blob = %path, error = %err, "rejected photo blob could not be removed");
            }
        }
        info!(moderator = %moderator.uid, pending = %id, "photo rejected");
        Ok(())
    }
}
