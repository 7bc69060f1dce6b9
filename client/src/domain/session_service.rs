//! Identity session service.
//!
//! Validates form input locally, then defers to the identity provider. The
//! free helpers are shared with the other services that need the current
//! identity or its role.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{IdentityProvider, IdentityProviderError, SessionCommand};
use crate::domain::{Credentials, Error, Identity, IdentityValidationError, Role};

/// Session service implementing [`SessionCommand`].
pub struct IdentitySession<I> {
    provider: Arc<I>,
}

impl<I> IdentitySession<I> {
    /// Create a session service over `provider`.
    pub fn new(provider: Arc<I>) -> Self {
        Self { provider }
    }
}

pub(crate) fn map_identity_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::Rejected { message } => Error::unauthorized(message),
        IdentityProviderError::NoSession => Error::unauthorized("sign in required"),
        IdentityProviderError::Connection { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
        IdentityProviderError::Decode { message } => {
            Error::internal(format!("identity provider error: {message}"))
        }
    }
}

fn map_validation_error(error: IdentityValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

/// The signed-in identity, or `Unauthorized`.
pub(crate) fn require_identity<I>(provider: &I) -> Result<Identity, Error>
where
    I: IdentityProvider + ?Sized,
{
    provider
        .current_identity()
        .ok_or_else(|| Error::unauthorized("sign in required"))
}

/// Fetch and interpret `identity`'s role claim.
pub(crate) async fn resolve_role<I>(
    provider: &I,
    identity: &Identity,
    force_refresh: bool,
) -> Result<Role, Error>
where
    I: IdentityProvider + ?Sized,
{
    let claim = provider
        .privilege_claim(identity, force_refresh)
        .await
        .map_err(map_identity_error)?;
    let role = Role::from_claim(claim.as_deref());
    debug!(uid = %identity.uid, ?role, "resolved role claim");
    Ok(role)
}

#[async_trait]
impl<I> SessionCommand for IdentitySession<I>
where
    I: IdentityProvider,
{
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, Error> {
        let credentials = Credentials::for_sign_in(email, password).map_err(map_validation_error)?;
        let identity = self
            .provider
            .sign_in(&credentials)
            .await
            .map_err(map_identity_error)?;
        info!(uid = %identity.uid, "signed in");
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, Error> {
        let credentials = Credentials::for_sign_up(email, password).map_err(map_validation_error)?;
        let identity = self
            .provider
            .sign_up(&credentials)
            .await
            .map_err(map_identity_error)?;
        info!(uid = %identity.uid, "account created");
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), Error> {
        self.provider.sign_out().await.map_err(map_identity_error)?;
        info!("signed out");
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.provider.current_identity()
    }

    async fn current_role(&self) -> Result<Role, Error> {
        let identity = require_identity(self.provider.as_ref())?;
        resolve_role(self.provider.as_ref(), &identity, true).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockIdentityProvider;
    use crate::domain::{ErrorCode, UserId};
    use rstest::rstest;

    fn identity(uid: &str) -> Identity {
        Identity::new(
            UserId::new(uid).expect("uid"),
            Some(format!("{uid}@example.com")),
        )
    }

    #[rstest]
    #[case("", "secret1", "Email is required.")]
    #[case("   ", "secret1", "Email is required.")]
    #[case("fan@example.com", "", "Password is required.")]
    #[tokio::test]
    async fn sign_in_validates_before_calling_provider(
        #[case] email: &str,
        #[case] password: &str,
        #[case] message: &str,
    ) {
        let mut provider = MockIdentityProvider::new();
        provider.expect_sign_in().never();
        let service = IdentitySession::new(Arc::new(provider));

        let err = service
            .sign_in(email, password)
            .await
            .expect_err("validation fails");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), message);
    }

    #[tokio::test]
    async fn sign_up_rejects_short_passwords_locally() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_sign_up().never();
        let service = IdentitySession::new(Arc::new(provider));

        let err = service
            .sign_up("fan@example.com", "12345")
            .await
            .expect_err("too short");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn sign_in_trims_email_and_returns_identity() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_in()
            .withf(|credentials| credentials.email() == "fan@example.com")
            .times(1)
            .return_once(|_| Ok(identity("u1")));
        let service = IdentitySession::new(Arc::new(provider));

        let signed_in = service
            .sign_in("  fan@example.com ", "secret1")
            .await
            .expect("sign in succeeds");
        assert_eq!(signed_in.uid.as_ref(), "u1");
    }

    #[rstest]
    #[case(IdentityProviderError::rejected("INVALID_PASSWORD"), ErrorCode::Unauthorized)]
    #[case(IdentityProviderError::connection("timeout"), ErrorCode::ServiceUnavailable)]
    #[case(IdentityProviderError::decode("bad json"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn provider_failures_are_mapped(
        #[case] failure: IdentityProviderError,
        #[case] expected: ErrorCode,
    ) {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_in()
            .times(1)
            .return_once(move |_| Err(failure));
        let service = IdentitySession::new(Arc::new(provider));

        let err = service
            .sign_in("fan@example.com", "secret1")
            .await
            .expect_err("provider fails");
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[case(Some("team-member"), Role::TeamMember)]
    #[case(Some("admin"), Role::Admin)]
    #[case(Some("vip"), Role::Fan)]
    #[case(None, Role::Fan)]
    #[tokio::test]
    async fn current_role_forces_claim_refresh(
        #[case] claim: Option<&'static str>,
        #[case] expected: Role,
    ) {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_current_identity()
            .return_const(Some(identity("u1")));
        provider
            .expect_privilege_claim()
            .withf(|_, force_refresh| *force_refresh)
            .times(1)
            .return_once(move |_, _| Ok(claim.map(str::to_owned)));
        let service = IdentitySession::new(Arc::new(provider));

        assert_eq!(service.current_role().await.expect("role"), expected);
    }

    #[tokio::test]
    async fn current_role_requires_identity() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_current_identity().return_const(None::<Identity>);
        provider.expect_privilege_claim().never();
        let service = IdentitySession::new(Arc::new(provider));

        let err = service.current_role().await.expect_err("no identity");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
