//! Driving port for push token registration.

use async_trait::async_trait;

use crate::domain::{Error, PushToken};

/// What a registration attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The token was written for the signed-in user.
    Registered(PushToken),
    /// Nobody is signed in, so nothing was written.
    Skipped,
}

/// Push registration use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRegistration: Send + Sync {
    /// Fetch this install's token and record it for the signed-in user.
    async fn register(&self) -> Result<RegistrationOutcome, Error>;

    /// Record a token handed over by the relay's refresh callback.
    async fn register_refreshed(&self, token: PushToken) -> Result<RegistrationOutcome, Error>;
}
