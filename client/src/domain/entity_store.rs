//! Typed gateway over the document store.
//!
//! Every collection access in the domain goes through here so query shapes
//! and wire field names live next to the entity conversions, and store
//! failures are mapped into [`Error`] in exactly one place.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ports::{DocumentStore, DocumentStoreError};
use crate::domain::{
    Collection, Destination, Direction, DocumentQuery, DriverNote, Error, NewPhoto, Photo,
    PushToken, Race, RaceDraft, RecordId, STATS_RECORD_ID, Stats, StoredDocument, UserId, photo,
};

/// Typed record access built on a [`DocumentStore`].
pub struct EntityStore<D> {
    store: Arc<D>,
}

impl<D> Clone for EntityStore<D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<D> EntityStore<D> {
    /// Wrap a store adapter.
    pub fn new(store: Arc<D>) -> Self {
        Self { store }
    }
}

pub(crate) fn map_store_error(collection: Collection, error: DocumentStoreError) -> Error {
    match error {
        DocumentStoreError::Connection { message } => {
            Error::service_unavailable(format!("{collection} unavailable: {message}"))
        }
        DocumentStoreError::Rejected { message } => {
            Error::service_unavailable(format!("{collection} rejected the request: {message}"))
        }
        DocumentStoreError::Decode { message } => {
            Error::internal(format!("{collection} returned malformed data: {message}"))
        }
    }
}

fn decode_page<T, E: std::fmt::Display>(
    collection: Collection,
    records: Vec<StoredDocument>,
    decode: impl Fn(StoredDocument) -> Result<T, E>,
) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| match decode(record) {
            Ok(entity) => Some(entity),
            Err(err) => {
                warn!(%collection, error = %err, "skipping undecodable record");
                None
            }
        })
        .collect()
}

impl<D> EntityStore<D>
where
    D: DocumentStore,
{
    /// Insert a new photo record into the collection for `destination`.
    pub async fn insert_photo(
        &self,
        photo: &NewPhoto,
        destination: Destination,
    ) -> Result<RecordId, Error> {
        let collection = destination.collection();
        self.store
            .insert(collection, photo.to_document(destination))
            .await
            .map_err(|err| map_store_error(collection, err))
    }

    /// Newest approved photos, bounded by `limit`.
    pub async fn published_photos(&self, limit: usize) -> Result<Vec<Photo>, Error> {
        let query = DocumentQuery::new()
            .where_eq(photo::APPROVED, true)
            .order_by(photo::CREATED_AT, Direction::Descending)
            .limit(limit);
        self.photos(Collection::PublishedPhotos, &query).await
    }

    /// Newest queued photos, bounded by `limit`.
    pub async fn pending_photos(&self, limit: usize) -> Result<Vec<Photo>, Error> {
        let query = DocumentQuery::new()
            .order_by(photo::CREATED_AT, Direction::Descending)
            .limit(limit);
        self.photos(Collection::PendingPhotos, &query).await
    }

    async fn photos(
        &self,
        collection: Collection,
        query: &DocumentQuery,
    ) -> Result<Vec<Photo>, Error> {
        let records = self
            .store
            .query(collection, query)
            .await
            .map_err(|err| map_store_error(collection, err))?;
        debug!(%collection, count = records.len(), "photo page fetched");
        Ok(decode_page(collection, records, |record| {
            Photo::decode(collection, record)
        }))
    }

    /// Raw queued record, kept undecoded so approval can copy every field.
    pub async fn pending_record(&self, id: &RecordId) -> Result<Option<StoredDocument>, Error> {
        self.store
            .get(Collection::PendingPhotos, id)
            .await
            .map_err(|err| map_store_error(Collection::PendingPhotos, err))
    }

    /// Publish a copy of a queued record with the approval flag set.
    pub async fn publish_approved(&self, record: StoredDocument) -> Result<RecordId, Error> {
        let mut document = record.document;
        document.insert(photo::APPROVED, true);
        self.store
            .insert(Collection::PublishedPhotos, document)
            .await
            .map_err(|err| map_store_error(Collection::PublishedPhotos, err))
    }

    /// Remove a queued record.
    pub async fn delete_pending(&self, id: &RecordId) -> Result<(), Error> {
        self.store
            .delete(Collection::PendingPhotos, id)
            .await
            .map_err(|err| map_store_error(Collection::PendingPhotos, err))
    }

    /// All races, earliest date first.
    pub async fn races(&self) -> Result<Vec<Race>, Error> {
        let query = DocumentQuery::new().order_by("date", Direction::Ascending);
        let records = self
            .store
            .query(Collection::Races, &query)
            .await
            .map_err(|err| map_store_error(Collection::Races, err))?;
        Ok(decode_page(Collection::Races, records, Race::try_from))
    }

    /// One race, `None` when absent.
    pub async fn race(&self, id: &RecordId) -> Result<Option<Race>, Error> {
        let record = self
            .store
            .get(Collection::Races, id)
            .await
            .map_err(|err| map_store_error(Collection::Races, err))?;
        record
            .map(Race::try_from)
            .transpose()
            .map_err(|err| Error::internal(err.to_string()))
    }

    /// Create a race under a store-assigned id.
    pub async fn insert_race(&self, draft: &RaceDraft) -> Result<RecordId, Error> {
        self.store
            .insert(Collection::Races, draft.to_document())
            .await
            .map_err(|err| map_store_error(Collection::Races, err))
    }

    /// Overwrite the race at `id`.
    pub async fn overwrite_race(&self, id: &RecordId, draft: &RaceDraft) -> Result<(), Error> {
        self.store
            .set(Collection::Races, id, draft.to_document())
            .await
            .map_err(|err| map_store_error(Collection::Races, err))
    }

    /// Remove the race at `id`.
    pub async fn delete_race(&self, id: &RecordId) -> Result<(), Error> {
        self.store
            .delete(Collection::Races, id)
            .await
            .map_err(|err| map_store_error(Collection::Races, err))
    }

    /// `owner`'s note, blank when none is stored.
    pub async fn driver_note(&self, owner: &UserId) -> Result<DriverNote, Error> {
        let id = note_id(owner)?;
        let record = self
            .store
            .get(Collection::DriverNotes, &id)
            .await
            .map_err(|err| map_store_error(Collection::DriverNotes, err))?;
        Ok(record.map_or_else(
            || DriverNote::empty(owner.clone()),
            |stored| DriverNote::from_stored(owner.clone(), &stored),
        ))
    }

    /// Overwrite `owner`'s note.
    pub async fn save_driver_note(&self, owner: &UserId, text: &str) -> Result<(), Error> {
        let id = note_id(owner)?;
        self.store
            .set(
                Collection::DriverNotes,
                &id,
                DriverNote::save_document(owner, text),
            )
            .await
            .map_err(|err| map_store_error(Collection::DriverNotes, err))
    }

    /// Season counters; zeros when the summary record is absent.
    pub async fn stats(&self) -> Result<Stats, Error> {
        let id = RecordId::new(STATS_RECORD_ID)
            .ok_or_else(|| Error::internal("stats record id is invalid"))?;
        let record = self
            .store
            .get(Collection::Stats, &id)
            .await
            .map_err(|err| map_store_error(Collection::Stats, err))?;
        match record {
            Some(stored) => Stats::decode(&stored.id, &stored.document)
                .map_err(|err| Error::internal(err.to_string())),
            None => Ok(Stats::default()),
        }
    }

    /// Record `token` as belonging to `owner`, replacing any earlier owner.
    pub async fn save_push_token(&self, token: &PushToken, owner: &UserId) -> Result<(), Error> {
        self.store
            .set(
                Collection::PushTokens,
                token.record_id(),
                PushToken::registration_document(owner),
            )
            .await
            .map_err(|err| map_store_error(Collection::PushTokens, err))
    }
}

fn note_id(owner: &UserId) -> Result<RecordId, Error> {
    DriverNote::record_id(owner)
        .ok_or_else(|| Error::invalid_request(format!("user id {owner} cannot key a note")))
}
