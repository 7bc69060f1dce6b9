//! Schemaless document model shared by every store adapter.
//!
//! Records are ordered maps from field name to a typed [`Field`]. Domain
//! entities convert to and from [`Document`] explicitly so wire field names
//! stay in one place per entity.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Named record collections owned by the external document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    /// Race schedule entries.
    Races,
    /// Approved, publicly visible photos.
    PublishedPhotos,
    /// Photos awaiting moderation.
    PendingPhotos,
    /// One note per user, keyed by user id.
    DriverNotes,
    /// Push tokens keyed by token value.
    PushTokens,
    /// Externally maintained season statistics.
    Stats,
}

impl Collection {
    /// Collection path used by the backing store.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Races => "races",
            Self::PublishedPhotos => "gallery_images",
            Self::PendingPhotos => "photo_requests",
            Self::DriverNotes => "driver_notes",
            Self::PushTokens => "fcmTokens",
            Self::Stats => "stats",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Store-assigned or natural record key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a raw record id. Blank ids are rejected.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() || id.contains('/') {
            None
        } else {
            Some(Self(id))
        }
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single typed document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// Double precision float.
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// Resolved timestamp.
    Timestamp(DateTime<Utc>),
    /// Placeholder the store replaces with its own clock at write time.
    ServerTimestamp,
    /// Ordered list.
    Array(Vec<Field>),
    /// Nested map.
    Map(Document),
}

impl Field {
    /// Borrow the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Integer payload, if any.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Resolved timestamp payload, if any.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<DateTime<Utc>> for Field {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Ordered field map forming one record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    fields: BTreeMap<String, Field>,
}

impl Document {
    /// Empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    ///
    /// # Examples
    /// ```
    /// use paddock::domain::{Document, Field};
    ///
    /// let doc = Document::new().with("name", "Dells 100").with("approved", true);
    /// assert_eq!(doc.get("approved"), Some(&Field::Bool(true)));
    /// ```
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Field>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Field>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Remove a field, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<Field> {
        self.fields.remove(name)
    }

    /// Look up a field.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Whether the field is present.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// String field, treating absence and other types as `None`.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Field::as_str)
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Field)> {
        self.fields.iter()
    }

    /// Mutable access for adapters resolving sentinels.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Field)> {
        self.fields.iter_mut()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Field)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, Field)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Raised when a stored document does not have the shape an entity expects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{collection} record {id}: field `{field}` {problem}")]
pub struct DecodeError {
    /// Collection the record came from.
    pub collection: Collection,
    /// Offending record id.
    pub id: String,
    /// Field that failed to decode.
    pub field: &'static str,
    /// What was wrong with it.
    pub problem: &'static str,
}

impl DecodeError {
    /// Field was absent.
    pub fn missing(collection: Collection, id: &RecordId, field: &'static str) -> Self {
        Self {
            collection,
            id: id.to_string(),
            field,
            problem: "is missing",
        }
    }

    /// Field had the wrong type or an invalid value.
    pub fn invalid(collection: Collection, id: &RecordId, field: &'static str) -> Self {
        Self {
            collection,
            id: id.to_string(),
            field,
            problem: "has an unexpected value",
        }
    }
}

/// A document together with the id it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Record key.
    pub id: RecordId,
    /// Record body.
    pub document: Document,
}

/// Sort direction for [`DocumentQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Equality filters, one ordering, and an optional limit.
///
/// This mirrors the subset of the hosted store's query language the client
/// actually uses.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentQuery {
    /// Field equality constraints, all of which must hold.
    pub filters: Vec<(String, Field)>,
    /// Optional ordering.
    pub order_by: Option<(String, Direction)>,
    /// Maximum number of documents returned.
    pub limit: Option<usize>,
}

impl DocumentQuery {
    /// Unfiltered query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter.
    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Field>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Set the ordering.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    /// Cap the result size.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `document` satisfies every equality filter.
    pub fn matches(&self, document: &Document) -> bool {
        self.filters
            .iter()
            .all(|(name, expected)| document.get(name) == Some(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("  ")]
    #[case("races/abc")]
    fn record_id_rejects_blank_and_nested_paths(#[case] raw: &str) {
        assert!(RecordId::new(raw).is_none());
    }

    #[rstest]
    fn query_matches_all_equality_filters() {
        let query = DocumentQuery::new()
            .where_eq("approved", true)
            .where_eq("uploaderUid", "u1");
        let matching = Document::new().with("approved", true).with("uploaderUid", "u1");
        let missing_flag = Document::new().with("uploaderUid", "u1");
        let wrong_type = Document::new()
            .with("approved", "true")
            .with("uploaderUid", "u1");

        assert!(query.matches(&matching));
        assert!(!query.matches(&missing_flag));
        assert!(!query.matches(&wrong_type));
    }

    #[rstest]
    fn collection_names_match_hosted_layout() {
        assert_eq!(Collection::PublishedPhotos.name(), "gallery_images");
        assert_eq!(Collection::PendingPhotos.name(), "photo_requests");
        assert_eq!(Collection::PushTokens.to_string(), "fcmTokens");
    }
}
