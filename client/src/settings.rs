//! Client configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::GALLERY_PAGE_SIZE;
use crate::outbound::firebase::FirebaseProject;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Settings for reaching the hosted backend.
///
/// Values come from `PADDOCK_*` environment variables or configuration
/// files; command-line flags are handled separately by the CLI.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PADDOCK")]
pub struct PaddockSettings {
    /// Firebase project id.
    pub project_id: Option<String>,
    /// Firebase web API key.
    pub api_key: Option<String>,
    /// Storage bucket; defaults to `{project_id}.appspot.com`.
    pub storage_bucket: Option<String>,
    /// Photos per gallery page; only values below 30 take effect.
    pub gallery_page_size: Option<usize>,
    /// Per-request timeout for REST calls, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Push token to register when no device messaging SDK is present.
    pub push_token: Option<String>,
    /// Run against in-memory adapters instead of the hosted backend.
    #[ortho_config(default = false)]
    pub offline: bool,
}

/// Raised when hosted mode is requested without the required settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing setting `{0}` (set PADDOCK_{1} or pass --offline)")]
pub struct MissingSetting(&'static str, &'static str);

impl PaddockSettings {
    /// Configured page size, clamped to `1..=30`.
    pub fn gallery_page_size(&self) -> usize {
        self.gallery_page_size
            .unwrap_or(GALLERY_PAGE_SIZE)
            .clamp(1, GALLERY_PAGE_SIZE)
    }

    /// Configured request timeout, falling back to 15 seconds.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
                .max(1),
        )
    }

    /// Project coordinates for the Firebase adapters.
    ///
    /// # Errors
    ///
    /// Returns [`MissingSetting`] when the project id or API key is unset.
    pub fn firebase_project(&self) -> Result<FirebaseProject, MissingSetting> {
        let project_id = non_blank(self.project_id.as_deref())
            .ok_or(MissingSetting("project_id", "PROJECT_ID"))?;
        let api_key =
            non_blank(self.api_key.as_deref()).ok_or(MissingSetting("api_key", "API_KEY"))?;
        let storage_bucket = non_blank(self.storage_bucket.as_deref())
            .map_or_else(|| format!("{project_id}.appspot.com"), str::to_owned);
        Ok(FirebaseProject {
            project_id: project_id.to_owned(),
            api_key: api_key.to_owned(),
            storage_bucket,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
