//! Driven port for the hosted document database.
//!
//! The contract mirrors the store's own primitives: `insert` lets the store
//! pick an id, `set` overwrites a record at a caller-chosen id, and `query`
//! supports equality filters, one ordering, and a limit. Fields holding
//! [`Field::ServerTimestamp`](crate::domain::Field::ServerTimestamp) are
//! resolved by the store when written.

use async_trait::async_trait;

use crate::domain::{Collection, Document, DocumentQuery, RecordId, StoredDocument};

use super::define_port_error;

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached.
        Connection { message: String } => "document store unreachable: {message}",
        /// The store refused the operation (permissions, quota, bad request).
        Rejected { message: String } => "document store rejected the request: {message}",
        /// A stored value could not be translated into a [`Document`].
        Decode { message: String } => "document store payload malformed: {message}",
    }
}

/// Port for record persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a record under a store-assigned id.
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<RecordId, DocumentStoreError>;

    /// Create or fully overwrite the record at `id`.
    async fn set(
        &self,
        collection: Collection,
        id: &RecordId,
        document: Document,
    ) -> Result<(), DocumentStoreError>;

    /// Fetch one record; `None` when absent.
    async fn get(
        &self,
        collection: Collection,
        id: &RecordId,
    ) -> Result<Option<StoredDocument>, DocumentStoreError>;

    /// Run a filtered, ordered, bounded query.
    async fn query(
        &self,
        collection: Collection,
        query: &DocumentQuery,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError>;

    /// Delete the record at `id`. Deleting an absent record succeeds.
    async fn delete(&self, collection: Collection, id: &RecordId)
    -> Result<(), DocumentStoreError>;
}

/// Stateless stand-in: reads find nothing and writes are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDocumentStore;

impl FixtureDocumentStore {
    /// Id returned by every insert.
    pub const INSERTED_ID: &'static str = "fixture-record";
}

#[async_trait]
impl DocumentStore for FixtureDocumentStore {
    async fn insert(
        &self,
        _collection: Collection,
        _document: Document,
    ) -> Result<RecordId, DocumentStoreError> {
        RecordId::new(Self::INSERTED_ID)
            .ok_or_else(|| DocumentStoreError::decode("fixture record id is invalid"))
    }

    async fn set(
        &self,
        _collection: Collection,
        _id: &RecordId,
        _document: Document,
    ) -> Result<(), DocumentStoreError> {
        Ok(())
    }

    async fn get(
        &self,
        _collection: Collection,
        _id: &RecordId,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        Ok(None)
    }

    async fn query(
        &self,
        _collection: Collection,
        _query: &DocumentQuery,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        Ok(Vec::new())
    }

    async fn delete(
        &self,
        _collection: Collection,
        _id: &RecordId,
    ) -> Result<(), DocumentStoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_store_reads_nothing_and_accepts_writes() {
        let store = FixtureDocumentStore;
        let id = store
            .insert(Collection::Races, Document::new().with("name", "Dells"))
            .await
            .expect("insert succeeds");
        assert_eq!(id.as_ref(), FixtureDocumentStore::INSERTED_ID);

        let fetched = store.get(Collection::Races, &id).await.expect("get succeeds");
        assert!(fetched.is_none());

        let listed = store
            .query(Collection::Races, &DocumentQuery::new())
            .await
            .expect("query succeeds");
        assert!(listed.is_empty());
    }
}
