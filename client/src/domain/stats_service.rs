//! Season statistics service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entity_store::EntityStore;
use crate::domain::ports::{DocumentStore, StatsQuery};
use crate::domain::{Error, Stats};

/// Service implementing [`StatsQuery`].
pub struct StatsService<D> {
    records: EntityStore<D>,
}

impl<D> StatsService<D> {
    /// Wire the service to the store.
    pub fn new(store: Arc<D>) -> Self {
        Self {
            records: EntityStore::new(store),
        }
    }
}

#[async_trait]
impl<D> StatsQuery for StatsService<D>
where
    D: DocumentStore,
{
    async fn current(&self) -> Result<Stats, Error> {
        self.records.stats().await
    }
}
