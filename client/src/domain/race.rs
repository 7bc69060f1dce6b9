//! Race schedule entries.

use serde::Serialize;

use super::document::{Collection, DecodeError, Document, RecordId, StoredDocument};

const NAME: &str = "name";
const DATE: &str = "date";
const KIND: &str = "type";
const RACE_NUMBER: &str = "raceNumber";

/// Validation errors raised by [`RaceDraft::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RaceValidationError {
    /// Name or date left blank.
    #[error("Please fill out all fields")]
    MissingRequiredField,
}

/// Form input for creating or editing a race.
///
/// ## Invariants
/// - `name` and `date` are trimmed and non-empty.
/// - `kind` is `None` rather than blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceDraft {
    name: String,
    date: String,
    kind: Option<String>,
    race_number: Option<u32>,
}

impl RaceDraft {
    /// Validate the required fields.
    ///
    /// # Examples
    /// ```
    /// use paddock::domain::RaceDraft;
    ///
    /// assert!(RaceDraft::new("  ", "2025-05-17").is_err());
    /// let draft = RaceDraft::new(" Dells Raceway ", "2025-05-17").unwrap();
    /// assert_eq!(draft.name(), "Dells Raceway");
    /// ```
    pub fn new(name: &str, date: &str) -> Result<Self, RaceValidationError> {
        let name = name.trim();
        let date = date.trim();
        if name.is_empty() || date.is_empty() {
            return Err(RaceValidationError::MissingRequiredField);
        }
        Ok(Self {
            name: name.to_owned(),
            date: date.to_owned(),
            kind: None,
            race_number: None,
        })
    }

    /// Attach the race type (for example `championship` or `special`).
    #[must_use]
    pub fn with_kind(mut self, kind: Option<&str>) -> Self {
        self.kind = kind
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        self
    }

    /// Attach the championship round number.
    #[must_use]
    pub fn with_race_number(mut self, race_number: Option<u32>) -> Self {
        self.race_number = race_number;
        self
    }

    /// Race name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Race date as entered.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Store representation. Optional fields are omitted when unset.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new()
            .with(NAME, self.name.as_str())
            .with(DATE, self.date.as_str());
        if let Some(kind) = &self.kind {
            document.insert(KIND, kind.as_str());
        }
        if let Some(number) = self.race_number {
            document.insert(RACE_NUMBER, i64::from(number));
        }
        document
    }
}

/// A persisted race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    /// Store-assigned id.
    pub id: RecordId,
    /// Race name.
    pub name: String,
    /// Race date.
    pub date: String,
    /// Optional race type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Optional round number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race_number: Option<u32>,
}

impl TryFrom<StoredDocument> for Race {
    type Error = DecodeError;

    fn try_from(stored: StoredDocument) -> Result<Self, Self::Error> {
        let StoredDocument { id, document } = stored;
        let required = |field: &'static str| {
            document
                .str_field(field)
                .map(str::to_owned)
                .ok_or_else(|| DecodeError::missing(Collection::Races, &id, field))
        };
        let name = required(NAME)?;
        let date = required(DATE)?;
        let kind = document.str_field(KIND).map(str::to_owned);
        let race_number = match document.get(RACE_NUMBER).and_then(|f| f.as_integer()) {
            Some(raw) => Some(
                u32::try_from(raw)
                    .map_err(|_| DecodeError::invalid(Collection::Races, &id, RACE_NUMBER))?,
            ),
            None => None,
        };
        Ok(Self {
            id,
            name,
            date,
            kind,
            race_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Field;
    use rstest::rstest;

    #[rstest]
    #[case("", "2025-05-17")]
    #[case("Dells", "")]
    #[case("   ", "   ")]
    fn draft_requires_name_and_date(#[case] name: &str, #[case] date: &str) {
        assert_eq!(
            RaceDraft::new(name, date),
            Err(RaceValidationError::MissingRequiredField)
        );
    }

    #[rstest]
    fn draft_omits_unset_optional_fields() {
        let document = RaceDraft::new("Dells", "2025-05-17")
            .expect("valid")
            .with_kind(Some("  "))
            .to_document();
        assert_eq!(document.len(), 2);
        assert!(!document.contains("type"));
    }

    #[rstest]
    fn stored_race_decodes_optional_fields() {
        let id = RecordId::new("r1").expect("id");
        let document = Document::new()
            .with("name", "La Crosse")
            .with("date", "2025-06-07")
            .with("type", "championship")
            .with("raceNumber", Field::Integer(4));
        let race = Race::try_from(StoredDocument { id, document }).expect("decodes");
        assert_eq!(race.kind.as_deref(), Some("championship"));
        assert_eq!(race.race_number, Some(4));
    }

    #[rstest]
    fn stored_race_without_date_fails() {
        let id = RecordId::new("r1").expect("id");
        let document = Document::new().with("name", "La Crosse");
        let err = Race::try_from(StoredDocument { id, document }).expect_err("missing date");
        assert_eq!(err.field, "date");
    }
}
