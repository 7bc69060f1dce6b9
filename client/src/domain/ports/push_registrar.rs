//! Driven port for the push relay's per-install token.

use async_trait::async_trait;

use crate::domain::PushToken;

use super::define_port_error;

define_port_error! {
    /// Errors raised while obtaining a push token.
    pub enum PushRegistrarError {
        /// The user has not granted notification permission.
        PermissionDenied => "notification permission denied",
        /// The relay could not issue a token.
        Unavailable { message: String } => "push token unavailable: {message}",
    }
}

/// Port for fetching this install's push registration token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushRegistrar: Send + Sync {
    /// Current token for this install.
    async fn token(&self) -> Result<PushToken, PushRegistrarError>;
}

/// Registrar that always hands out the same token.
#[derive(Debug, Clone)]
pub struct FixturePushRegistrar {
    token: PushToken,
}

impl FixturePushRegistrar {
    /// Registrar returning `token`.
    pub fn new(token: PushToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl PushRegistrar for FixturePushRegistrar {
    async fn token(&self) -> Result<PushToken, PushRegistrarError> {
        Ok(self.token.clone())
    }
}
