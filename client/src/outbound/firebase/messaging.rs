//! Push registrar for hosts without a device messaging SDK.

use async_trait::async_trait;

use crate::domain::PushToken;
use crate::domain::ports::{PushRegistrar, PushRegistrarError};

/// [`PushRegistrar`] that hands out a token supplied by configuration.
///
/// Without a configured token the registrar behaves like a device whose user
/// declined notification permission.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredPushRegistrar {
    token: Option<PushToken>,
}

impl ConfiguredPushRegistrar {
    /// Registrar for an optional raw token. Blank tokens count as absent.
    pub fn new(raw: Option<&str>) -> Self {
        Self {
            token: raw.and_then(PushToken::new),
        }
    }
}

#[async_trait]
impl PushRegistrar for ConfiguredPushRegistrar {
    async fn token(&self) -> Result<PushToken, PushRegistrarError> {
        self.token
            .clone()
            .ok_or_else(PushRegistrarError::permission_denied)
    }
}
