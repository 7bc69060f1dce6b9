//! Push token registration.
//!
//! Tokens are stored under their own value, so registering the same token
//! again overwrites the earlier record and a token that moves between
//! accounts follows the latest sign-in.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::entity_store::EntityStore;
use crate::domain::ports::{
    DocumentStore, IdentityProvider, NotificationRegistration, PushRegistrar, PushRegistrarError,
    RegistrationOutcome,
};
use crate::domain::{Error, PushToken};

/// Service implementing [`NotificationRegistration`].
pub struct NotificationRegistrar<I, P, D> {
    identity: Arc<I>,
    registrar: Arc<P>,
    records: EntityStore<D>,
}

impl<I, P, D> NotificationRegistrar<I, P, D> {
    /// Wire the registrar to its collaborators.
    pub fn new(identity: Arc<I>, registrar: Arc<P>, store: Arc<D>) -> Self {
        Self {
            identity,
            registrar,
            records: EntityStore::new(store),
        }
    }
}

fn map_registrar_error(error: PushRegistrarError) -> Error {
    match error {
        PushRegistrarError::PermissionDenied => {
            Error::forbidden("notification permission denied")
        }
        PushRegistrarError::Unavailable { message } => {
            Error::service_unavailable(format!("push token unavailable: {message}"))
        }
    }
}

impl<I, P, D> NotificationRegistrar<I, P, D>
where
    I: IdentityProvider,
    D: DocumentStore,
{
    async fn store_token(&self, token: PushToken) -> Result<RegistrationOutcome, Error> {
        let Some(identity) = self.identity.current_identity() else {
            info!("no signed-in user; push token not registered");
            return Ok(RegistrationOutcome::Skipped);
        };
        self.records.save_push_token(&token, &identity.uid).await?;
        info!(uid = %identity.uid, %token, "push token registered");
        Ok(RegistrationOutcome::Registered(token))
    }
}

#[async_trait]
impl<I, P, D> NotificationRegistration for NotificationRegistrar<I, P, D>
where
    I: IdentityProvider,
    P: PushRegistrar,
    D: DocumentStore,
{
    async fn register(&self) -> Result<RegistrationOutcome, Error> {
        if self.identity.current_identity().is_none() {
            info!("no signed-in user; skipping push token fetch");
            return Ok(RegistrationOutcome::Skipped);
        }
        let token = match self.registrar.token().await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "push token fetch failed");
                return Err(map_registrar_error(err));
            }
        };
        self.store_token(token).await
    }

    async fn register_refreshed(&self, token: PushToken) -> Result<RegistrationOutcome, Error> {
        self.store_token(token).await
    }
}
