//! Driving port for season statistics.

use async_trait::async_trait;

use crate::domain::{Error, Stats};

/// Read-only statistics use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsQuery: Send + Sync {
    /// Current counters; zeros when nothing has been published yet.
    async fn current(&self) -> Result<Stats, Error>;
}
