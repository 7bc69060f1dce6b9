//! Document store kept in process memory.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{DocumentStore, DocumentStoreError};
use crate::domain::{
    Collection, Direction, Document, DocumentQuery, Field, RecordId, StoredDocument,
};

type Collections = BTreeMap<Collection, BTreeMap<RecordId, Document>>;

/// [`DocumentStore`] backed by ordered maps.
///
/// Server timestamps resolve to the injected clock. Ordered queries skip
/// records that lack the ordering field, as the hosted store does.
pub struct MemoryDocumentStore {
    clock: Arc<dyn Clock>,
    collections: Mutex<Collections>,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    /// Empty store stamping server timestamps with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            collections: Mutex::new(BTreeMap::new()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Place a record directly, bypassing the write counter.
    pub fn seed(
        &self,
        collection: Collection,
        id: RecordId,
        document: Document,
    ) -> Result<(), DocumentStoreError> {
        let resolved = resolve_timestamps(document, self.clock.utc());
        self.lock()?
            .entry(collection)
            .or_default()
            .insert(id, resolved);
        Ok(())
    }

    /// Snapshot of one collection in id order.
    pub fn records(
        &self,
        collection: Collection,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        Ok(self
            .lock()?
            .get(&collection)
            .map(|records| {
                records
                    .iter()
                    .map(|(id, document)| StoredDocument {
                        id: id.clone(),
                        document: document.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Number of insert, set and delete calls served.
    pub fn write_count(&self) -> usize {
        self.writes.load(AtomicOrdering::SeqCst)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, DocumentStoreError> {
        self.collections
            .lock()
            .map_err(|_| DocumentStoreError::rejected("document store lock poisoned"))
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, AtomicOrdering::SeqCst);
    }
}

fn resolve_field(field: Field, now: DateTime<Utc>) -> Field {
    match field {
        Field::ServerTimestamp => Field::Timestamp(now),
        Field::Array(values) => Field::Array(
            values
                .into_iter()
                .map(|value| resolve_field(value, now))
                .collect(),
        ),
        Field::Map(document) => Field::Map(resolve_timestamps(document, now)),
        other => other,
    }
}

fn resolve_timestamps(mut document: Document, now: DateTime<Utc>) -> Document {
    for (_, value) in document.iter_mut() {
        let current = std::mem::replace(value, Field::Null);
        *value = resolve_field(current, now);
    }
    document
}

/// Cross-type ordering: null, booleans, numbers, timestamps, strings, arrays, maps.
fn type_rank(field: &Field) -> u8 {
    match field {
        Field::Null => 0,
        Field::Bool(_) => 1,
        Field::Integer(_) | Field::Double(_) => 2,
        Field::Timestamp(_) | Field::ServerTimestamp => 3,
        Field::String(_) => 4,
        Field::Array(_) => 5,
        Field::Map(_) => 6,
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "mixed integer and double comparison mirrors the hosted store"
)]
fn compare_fields(left: &Field, right: &Field) -> Ordering {
    match (left, right) {
        (Field::Bool(a), Field::Bool(b)) => a.cmp(b),
        (Field::Integer(a), Field::Integer(b)) => a.cmp(b),
        (Field::Double(a), Field::Double(b)) => a.total_cmp(b),
        (Field::Integer(a), Field::Double(b)) => (*a as f64).total_cmp(b),
        (Field::Double(a), Field::Integer(b)) => a.total_cmp(&(*b as f64)),
        (Field::Timestamp(a), Field::Timestamp(b)) => a.cmp(b),
        (Field::String(a), Field::String(b)) => a.cmp(b),
        _ => type_rank(left).cmp(&type_rank(right)),
    }
}

fn run_query(
    records: &BTreeMap<RecordId, Document>,
    query: &DocumentQuery,
) -> Vec<StoredDocument> {
    let mut matching: Vec<StoredDocument> = records
        .iter()
        .filter(|(_, document)| query.matches(document))
        .map(|(id, document)| StoredDocument {
            id: id.clone(),
            document: document.clone(),
        })
        .collect();
    if let Some((field, direction)) = &query.order_by {
        matching.retain(|stored| stored.document.contains(field));
        matching.sort_by(|a, b| {
            let ordering = match (a.document.get(field), b.document.get(field)) {
                (Some(left), Some(right)) => compare_fields(left, right),
                _ => Ordering::Equal,
            };
            match direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        });
    }
    if let Some(limit) = query.limit {
        matching.truncate(limit);
    }
    matching
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<RecordId, DocumentStoreError> {
        let id = RecordId::new(Uuid::new_v4().simple().to_string())
            .ok_or_else(|| DocumentStoreError::decode("generated record id is invalid"))?;
        let resolved = resolve_timestamps(document, self.clock.utc());
        self.lock()?
            .entry(collection)
            .or_default()
            .insert(id.clone(), resolved);
        self.record_write();
        debug!(%collection, record = %id, "inserted record");
        Ok(id)
    }

    async fn set(
        &self,
        collection: Collection,
        id: &RecordId,
        document: Document,
    ) -> Result<(), DocumentStoreError> {
        let resolved = resolve_timestamps(document, self.clock.utc());
        self.lock()?
            .entry(collection)
            .or_default()
            .insert(id.clone(), resolved);
        self.record_write();
        debug!(%collection, record = %id, "set record");
        Ok(())
    }

    async fn get(
        &self,
        collection: Collection,
        id: &RecordId,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        Ok(self
            .lock()?
            .get(&collection)
            .and_then(|records| records.get(id))
            .map(|document| StoredDocument {
                id: id.clone(),
                document: document.clone(),
            }))
    }

    async fn query(
        &self,
        collection: Collection,
        query: &DocumentQuery,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        Ok(self
            .lock()?
            .get(&collection)
            .map(|records| run_query(records, query))
            .unwrap_or_default())
    }

    async fn delete(
        &self,
        collection: Collection,
        id: &RecordId,
    ) -> Result<(), DocumentStoreError> {
        if let Some(records) = self.lock()?.get_mut(&collection) {
            records.remove(id);
        }
        self.record_write();
        debug!(%collection, record = %id, "deleted record");
        Ok(())
    }
}
