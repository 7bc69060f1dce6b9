//! Per-user driver notes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::document::{Document, Field, RecordId, StoredDocument};
use super::identity::UserId;

const UID: &str = "uid";
const NOTE: &str = "note";
const UPDATED_AT: &str = "updatedAt";

/// A user's free-text note. The record id is always the owner's user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverNote {
    /// Owner and record id.
    pub owner: UserId,
    /// Note body, possibly empty.
    pub text: String,
    /// Last save time, when the store has resolved it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DriverNote {
    /// Blank note for a user who has never saved one.
    pub fn empty(owner: UserId) -> Self {
        Self {
            owner,
            text: String::new(),
            updated_at: None,
        }
    }

    /// Record id for `owner`'s note.
    ///
    /// Provider user ids never contain `/`, so this only fails for ids the
    /// store could not address anyway.
    pub fn record_id(owner: &UserId) -> Option<RecordId> {
        RecordId::new(owner.as_ref())
    }

    /// Store representation of a save by `owner`.
    pub fn save_document(owner: &UserId, text: &str) -> Document {
        Document::new()
            .with(UID, owner.as_ref())
            .with(NOTE, text)
            .with(UPDATED_AT, Field::ServerTimestamp)
    }

    /// Decode a stored note. Missing text reads as empty.
    pub fn from_stored(owner: UserId, stored: &StoredDocument) -> Self {
        Self {
            owner,
            text: stored
                .document
                .str_field(NOTE)
                .map(str::to_owned)
                .unwrap_or_default(),
            updated_at: stored.document.get(UPDATED_AT).and_then(Field::as_timestamp),
        }
    }
}
