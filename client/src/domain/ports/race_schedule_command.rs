//! Driving port for the race schedule.

use async_trait::async_trait;

use crate::domain::{Error, Race, RecordId};

/// Unvalidated race form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaceForm {
    /// Race name as typed.
    pub name: String,
    /// Race date as typed.
    pub date: String,
    /// Optional race type.
    pub kind: Option<String>,
    /// Optional round number.
    pub race_number: Option<u32>,
}

/// Race schedule use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RaceScheduleCommand: Send + Sync {
    /// Every race, earliest date first.
    async fn list(&self) -> Result<Vec<Race>, Error>;

    /// One race by id.
    async fn load(&self, id: &RecordId) -> Result<Race, Error>;

    /// Create a race, or overwrite `existing` when given. Returns the id.
    async fn save(&self, form: RaceForm, existing: Option<RecordId>) -> Result<RecordId, Error>;

    /// Remove a race.
    async fn delete(&self, id: &RecordId) -> Result<(), Error>;
}
