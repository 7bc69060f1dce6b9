//! Driving port for sign-in, sign-up and session inspection.
//!
//! Inputs arrive as raw form text; implementations validate them before any
//! provider call so blank fields never reach the network.

use async_trait::async_trait;

use crate::domain::{Error, Identity, Role};

/// Session use-cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionCommand: Send + Sync {
    /// Sign in with an email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, Error>;

    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, Error>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), Error>;

    /// Currently signed-in identity, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// Role of the signed-in identity, fetched with a forced claim refresh.
    async fn current_role(&self) -> Result<Role, Error>;
}
