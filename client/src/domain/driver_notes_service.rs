//! Driver notes service. A user only ever reads or writes their own note.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::entity_store::EntityStore;
use crate::domain::ports::{DocumentStore, DriverNotesCommand, IdentityProvider};
use crate::domain::session_service::require_identity;
use crate::domain::{DriverNote, Error};

/// Service implementing [`DriverNotesCommand`].
pub struct DriverNotesService<I, D> {
    identity: Arc<I>,
    records: EntityStore<D>,
}

impl<I, D> DriverNotesService<I, D> {
    /// Wire the service to its collaborators.
    pub fn new(identity: Arc<I>, store: Arc<D>) -> Self {
        Self {
            identity,
            records: EntityStore::new(store),
        }
    }
}

#[async_trait]
impl<I, D> DriverNotesCommand for DriverNotesService<I, D>
where
    I: IdentityProvider,
    D: DocumentStore,
{
    async fn load(&self) -> Result<DriverNote, Error> {
        let identity = require_identity(self.identity.as_ref())?;
        self.records.driver_note(&identity.uid).await
    }

    async fn save(&self, text: &str) -> Result<(), Error> {
        let identity = require_identity(self.identity.as_ref())?;
        self.records.save_driver_note(&identity.uid, text).await?;
        info!(uid = %identity.uid, chars = text.chars().count(), "driver note saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockDocumentStore, MockIdentityProvider};
    use crate::domain::{
        Collection, Document, ErrorCode, Identity, RecordId, StoredDocument, UserId,
    };

    fn signed_in(uid: &'static str) -> MockIdentityProvider {
        let mut provider = MockIdentityProvider::new();
        provider.expect_current_identity().return_const(Some(Identity::new(
            UserId::new(uid).expect("uid"),
            None,
        )));
        provider
    }

    #[tokio::test]
    async fn save_targets_the_owner_record() {
        let mut store = MockDocumentStore::new();
        store
            .expect_set()
            .withf(|collection, id, document| {
                *collection == Collection::DriverNotes
                    && id.as_ref() == "u5"
                    && document.str_field("uid") == Some("u5")
                    && document.str_field("note") == Some("Brake later into T3")
            })
            .times(2)
            .returning(|_, _, _| Ok(()));
        let service = DriverNotesService::new(Arc::new(signed_in("u5")), Arc::new(store));

        service.save("Brake later into T3").await.expect("first save");
        service.save("Brake later into T3").await.expect("second save");
    }

    #[tokio::test]
    async fn load_reads_own_note() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get()
            .withf(|collection, id| *collection == Collection::DriverNotes && id.as_ref() == "u5")
            .times(1)
            .return_once(|_, _| {
                Ok(Some(StoredDocument {
                    id: RecordId::new("u5").expect("id"),
                    document: Document::new().with("note", "Tyres cold on lap 1"),
                }))
            });
        let service = DriverNotesService::new(Arc::new(signed_in("u5")), Arc::new(store));

        let note = service.load().await.expect("load succeeds");
        assert_eq!(note.text, "Tyres cold on lap 1");
    }

    #[tokio::test]
    async fn signed_out_users_cannot_save() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_current_identity()
            .return_const(None::<Identity>);
        let mut store = MockDocumentStore::new();
        store.expect_set().never();
        let service = DriverNotesService::new(Arc::new(provider), Arc::new(store));

        let err = service.save("anything").await.expect_err("no identity");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
