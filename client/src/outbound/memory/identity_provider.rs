//! Identity provider kept in process memory.
//!
//! Claims are captured into the session at sign-in, mimicking a cached ID
//! token: a claim granted later is only observed with a forced refresh.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Credentials, Identity, UserId};

#[derive(Debug, Clone)]
struct Account {
    uid: UserId,
    password: String,
    claim: Option<String>,
}

#[derive(Debug, Clone)]
struct Session {
    identity: Identity,
    cached_claim: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    session: Option<Session>,
}

/// [`IdentityProvider`] with an in-memory account table and one session.
#[derive(Debug, Default)]
pub struct MemoryIdentityProvider {
    state: Mutex<State>,
}

impl MemoryIdentityProvider {
    /// Empty provider with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account directly, optionally with a role claim.
    pub fn add_account(
        &self,
        email: &str,
        password: &str,
        claim: Option<&str>,
    ) -> Result<UserId, IdentityProviderError> {
        let mut state = self.lock()?;
        let key = email.trim().to_ascii_lowercase();
        if state.accounts.contains_key(&key) {
            return Err(IdentityProviderError::rejected("EMAIL_EXISTS"));
        }
        let uid = new_uid()?;
        state.accounts.insert(
            key,
            Account {
                uid: uid.clone(),
                password: password.to_owned(),
                claim: claim.map(str::to_owned),
            },
        );
        Ok(uid)
    }

    /// Change the role claim on an existing account.
    pub fn set_claim(
        &self,
        uid: &UserId,
        claim: Option<&str>,
    ) -> Result<(), IdentityProviderError> {
        let mut state = self.lock()?;
        let account = state
            .accounts
            .values_mut()
            .find(|account| &account.uid == uid)
            .ok_or_else(|| IdentityProviderError::rejected("USER_NOT_FOUND"))?;
        account.claim = claim.map(str::to_owned);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, IdentityProviderError> {
        self.state
            .lock()
            .map_err(|_| IdentityProviderError::rejected("identity state lock poisoned"))
    }

    fn open_session(state: &mut State, email: &str, account: &Account) -> Identity {
        let identity = Identity::new(account.uid.clone(), Some(email.to_owned()));
        state.session = Some(Session {
            identity: identity.clone(),
            cached_claim: account.claim.clone(),
        });
        identity
    }
}

fn new_uid() -> Result<UserId, IdentityProviderError> {
    UserId::new(Uuid::new_v4().simple().to_string())
        .map_err(|err| IdentityProviderError::decode(err.to_string()))
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, IdentityProviderError> {
        let mut state = self.lock()?;
        let key = credentials.email().to_ascii_lowercase();
        let account = state
            .accounts
            .get(&key)
            .filter(|account| account.password == credentials.password())
            .cloned()
            .ok_or_else(|| IdentityProviderError::rejected("INVALID_LOGIN_CREDENTIALS"))?;
        debug!(uid = %account.uid, "memory sign-in");
        Ok(Self::open_session(&mut state, credentials.email(), &account))
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Identity, IdentityProviderError> {
        self.add_account(credentials.email(), credentials.password(), None)?;
        let mut state = self.lock()?;
        let key = credentials.email().to_ascii_lowercase();
        let account = state
            .accounts
            .get(&key)
            .cloned()
            .ok_or_else(|| IdentityProviderError::decode("account vanished after sign-up"))?;
        Ok(Self::open_session(&mut state, credentials.email(), &account))
    }

    async fn sign_out(&self) -> Result<(), IdentityProviderError> {
        self.lock()?.session = None;
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.lock()
            .ok()
            .and_then(|state| state.session.as_ref().map(|session| session.identity.clone()))
    }

    async fn privilege_claim(
        &self,
        identity: &Identity,
        force_refresh: bool,
    ) -> Result<Option<String>, IdentityProviderError> {
        let mut state = self.lock()?;
        let fresh = state
            .accounts
            .values()
            .find(|account| account.uid == identity.uid)
            .map(|account| account.claim.clone());
        let session = state
            .session
            .as_mut()
            .filter(|session| session.identity.uid == identity.uid)
            .ok_or_else(IdentityProviderError::no_session)?;
        if force_refresh {
            session.cached_claim = fresh.flatten();
        }
        Ok(session.cached_claim.clone())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials::for_sign_in(email, password).expect("credentials")
    }

    #[tokio::test]
    async fn sign_in_checks_password() {
        let provider = MemoryIdentityProvider::new();
        provider
            .add_account("crew@example.com", "secret1", Some("team-member"))
            .expect("account");

        let err = provider
            .sign_in(&credentials("crew@example.com", "wrong"))
            .await
            .expect_err("bad password");
        assert_eq!(err, IdentityProviderError::rejected("INVALID_LOGIN_CREDENTIALS"));
        assert!(provider.current_identity().is_none());

        let identity = provider
            .sign_in(&credentials("Crew@Example.com", "secret1"))
            .await
            .expect("sign in");
        assert_eq!(provider.current_identity(), Some(identity));
    }

    #[tokio::test]
    async fn granted_claims_need_forced_refresh() {
        let provider = MemoryIdentityProvider::new();
        let uid = provider
            .add_account("fan@example.com", "secret1", None)
            .expect("account");
        let identity = provider
            .sign_in(&credentials("fan@example.com", "secret1"))
            .await
            .expect("sign in");

        provider.set_claim(&uid, Some("team-member")).expect("grant");

        let cached = provider
            .privilege_claim(&identity, false)
            .await
            .expect("cached claim");
        assert_eq!(cached, None);
        let fresh = provider
            .privilege_claim(&identity, true)
            .await
            .expect("fresh claim");
        assert_eq!(fresh.as_deref(), Some("team-member"));
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_rejected() {
        let provider = MemoryIdentityProvider::new();
        provider
            .sign_up(&credentials("fan@example.com", "secret1"))
            .await
            .expect("first sign up");
        let err = provider
            .sign_up(&credentials("fan@example.com", "secret1"))
            .await
            .expect_err("duplicate");
        assert_eq!(err, IdentityProviderError::rejected("EMAIL_EXISTS"));
    }

    #[tokio::test]
    async fn claim_lookup_requires_matching_session() {
        let provider = MemoryIdentityProvider::new();
        let uid = provider
            .add_account("fan@example.com", "secret1", None)
            .expect("account");
        let stranger = Identity::new(uid, None);

        let err = provider
            .privilege_claim(&stranger, true)
            .await
            .expect_err("no session");
        assert_eq!(err, IdentityProviderError::no_session());
    }
}
