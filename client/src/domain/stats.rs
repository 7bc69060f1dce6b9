//! Season statistics maintained outside the client.

use serde::Serialize;

use super::document::{Collection, DecodeError, Document, RecordId};

/// Id of the single statistics record.
pub const STATS_RECORD_ID: &str = "summary";

/// Win, podium, and lap counters. Read-only for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    /// Race wins.
    pub wins: u32,
    /// Podium finishes.
    pub podiums: u32,
    /// Laps completed.
    pub laps: u32,
}

impl Stats {
    /// Decode the stats record; absent counters read as zero.
    pub fn decode(id: &RecordId, document: &Document) -> Result<Self, DecodeError> {
        let counter = |field: &'static str| -> Result<u32, DecodeError> {
            match document.get(field) {
                None => Ok(0),
                Some(value) => value
                    .as_integer()
                    .and_then(|raw| u32::try_from(raw).ok())
                    .ok_or_else(|| DecodeError::invalid(Collection::Stats, id, field)),
            }
        };
        Ok(Self {
            wins: counter("wins")?,
            podiums: counter("podiums")?,
            laps: counter("laps")?,
        })
    }
}
