//! Signed-in session shared by the Firebase adapters.
//!
//! The identity adapter owns the lifecycle; the Firestore and Storage
//! adapters only read the current ID token to authorise their requests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use zeroize::Zeroizing;

use crate::domain::Identity;

/// Tokens and cached claim for one signed-in user.
pub(super) struct FirebaseSession {
    pub(super) identity: Identity,
    pub(super) id_token: Zeroizing<String>,
    pub(super) refresh_token: Zeroizing<String>,
    /// `None` until the claim has been looked up once.
    pub(super) claim: Option<Option<String>>,
}

/// Cloneable handle onto the process-wide session slot.
#[derive(Clone, Default)]
pub struct SessionHandle {
    slot: Arc<Mutex<Option<FirebaseSession>>>,
}

impl SessionHandle {
    /// Empty handle with no session.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<FirebaseSession>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn replace(&self, session: Option<FirebaseSession>) {
        *self.lock() = session;
    }

    /// Identity of the held session.
    pub fn identity(&self) -> Option<Identity> {
        self.lock().as_ref().map(|session| session.identity.clone())
    }

    /// Bearer token for authorised requests.
    pub(super) fn bearer(&self) -> Option<Zeroizing<String>> {
        self.lock().as_ref().map(|session| session.id_token.clone())
    }

    /// Refresh token and cached claim, if the session belongs to `identity`.
    pub(super) fn snapshot_for(
        &self,
        identity: &Identity,
    ) -> Option<(Zeroizing<String>, Option<Option<String>>)> {
        self.lock()
            .as_ref()
            .filter(|session| session.identity.uid == identity.uid)
            .map(|session| (session.refresh_token.clone(), session.claim.clone()))
    }

    /// Apply `update` to the held session if it still belongs to `identity`.
    pub(super) fn update_for(
        &self,
        identity: &Identity,
        update: impl FnOnce(&mut FirebaseSession),
    ) {
        if let Some(session) = self
            .lock()
            .as_mut()
            .filter(|session| session.identity.uid == identity.uid)
        {
            update(session);
        }
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("identity", &self.identity())
            .finish_non_exhaustive()
    }
}
