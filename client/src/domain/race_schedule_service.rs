//! Race schedule service.
//!
//! Anyone may read the schedule. Writes require the team-member role and are
//! validated before the store is touched.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::entity_store::EntityStore;
use crate::domain::ports::{DocumentStore, IdentityProvider, RaceForm, RaceScheduleCommand};
use crate::domain::session_service::{require_identity, resolve_role};
use crate::domain::{Error, Race, RaceDraft, RecordId, Role};

/// Service implementing [`RaceScheduleCommand`].
pub struct RaceScheduleService<I, D> {
    identity: Arc<I>,
    records: EntityStore<D>,
}

impl<I, D> RaceScheduleService<I, D> {
    /// Wire the service to its collaborators.
    pub fn new(identity: Arc<I>, store: Arc<D>) -> Self {
        Self {
            identity,
            records: EntityStore::new(store),
        }
    }
}

fn draft_from_form(form: &RaceForm) -> Result<RaceDraft, Error> {
    let draft = RaceDraft::new(&form.name, &form.date)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    Ok(draft
        .with_kind(form.kind.as_deref())
        .with_race_number(form.race_number))
}

impl<I, D> RaceScheduleService<I, D>
where
    I: IdentityProvider,
{
    async fn require_team_member(&self) -> Result<(), Error> {
        let identity = require_identity(self.identity.as_ref())?;
        match resolve_role(self.identity.as_ref(), &identity, false).await? {
            Role::TeamMember => Ok(()),
            Role::Admin | Role::Fan => Err(Error::forbidden(
                "only team members can edit the race schedule",
            )),
        }
    }
}

#[async_trait]
impl<I, D> RaceScheduleCommand for RaceScheduleService<I, D>
where
    I: IdentityProvider,
    D: DocumentStore,
{
    async fn list(&self) -> Result<Vec<Race>, Error> {
        self.records.races().await
    }

    async fn load(&self, id: &RecordId) -> Result<Race, Error> {
        self.records
            .race(id)
            .await?
            .ok_or_else(|| Error::not_found("Error: Race not found."))
    }

    async fn save(&self, form: RaceForm, existing: Option<RecordId>) -> Result<RecordId, Error> {
        let draft = draft_from_form(&form)?;
        self.require_team_member().await?;
        let id = match existing {
            Some(id) => {
                self.records.overwrite_race(&id, &draft).await?;
                id
            }
            None => self.records.insert_race(&draft).await?,
        };
        info!(race = %id, name = draft.name(), "race saved");
        Ok(id)
    }

    async fn delete(&self, id: &RecordId) -> Result<(), Error> {
        self.require_team_member().await?;
        self.records.delete_race(id).await?;
        info!(race = %id, "race deleted");
        Ok(())
    }
}
