//! Driven port for the hosted identity provider.
//!
//! Adapters own the wire protocol and token lifecycle; the domain only sees
//! identities and the raw role claim.

use async_trait::async_trait;

use crate::domain::{Credentials, Identity, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider refused the credentials or account operation.
        Rejected { message: String } => "identity provider rejected the request: {message}",
        /// The provider could not be reached.
        Connection { message: String } => "identity provider unreachable: {message}",
        /// No session is held, or the held session has expired.
        NoSession => "no signed-in session",
        /// The provider answered with a payload the adapter could not read.
        Decode { message: String } => "identity provider response malformed: {message}",
    }
}

/// Port for signing users in and reading their role claim.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in with email and password; the adapter keeps the session.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, IdentityProviderError>;

    /// Create an account and sign it in.
    async fn sign_up(&self, credentials: &Credentials) -> Result<Identity, IdentityProviderError>;

    /// Drop the held session. Signing out without a session is not an error.
    async fn sign_out(&self) -> Result<(), IdentityProviderError>;

    /// The identity of the held session, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// Fetch the raw `role` custom claim for `identity`.
    ///
    /// With `force_refresh` the adapter must bypass any cached token so a
    /// claim granted since sign-in is observed.
    async fn privilege_claim(
        &self,
        identity: &Identity,
        force_refresh: bool,
    ) -> Result<Option<String>, IdentityProviderError>;
}

/// Stateless stand-in that is always signed in as one fan account.
///
/// Use it where identity behaviour is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

impl FixtureIdentityProvider {
    /// Id reported for the fixture account.
    pub const UID: &'static str = "fixture-fan";

    fn identity() -> Result<Identity, IdentityProviderError> {
        UserId::new(Self::UID)
            .map(|uid| Identity::new(uid, Some("fan@paddock.invalid".to_owned())))
            .map_err(|err| IdentityProviderError::decode(err.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn sign_in(&self, _credentials: &Credentials) -> Result<Identity, IdentityProviderError> {
        Self::identity()
    }

    async fn sign_up(&self, _credentials: &Credentials) -> Result<Identity, IdentityProviderError> {
        Self::identity()
    }

    async fn sign_out(&self) -> Result<(), IdentityProviderError> {
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        Self::identity().ok()
    }

    async fn privilege_claim(
        &self,
        _identity: &Identity,
        _force_refresh: bool,
    ) -> Result<Option<String>, IdentityProviderError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_provider_is_signed_in_without_claims() {
        let provider = FixtureIdentityProvider;
        let identity = provider.current_identity().expect("fixture identity");
        assert_eq!(identity.uid.as_ref(), FixtureIdentityProvider::UID);

        let claim = provider
            .privilege_claim(&identity, true)
            .await
            .expect("claim lookup succeeds");
        assert!(claim.is_none());
    }

    #[test]
    fn errors_format_messages() {
        assert_eq!(
            IdentityProviderError::rejected("INVALID_PASSWORD").to_string(),
            "identity provider rejected the request: INVALID_PASSWORD"
        );
        assert_eq!(IdentityProviderError::no_session().to_string(), "no signed-in session");
    }
}
