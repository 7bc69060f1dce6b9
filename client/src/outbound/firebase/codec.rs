//! Translation between domain documents and Firestore typed values.
//!
//! Server timestamp placeholders cannot be written as values; they are lifted
//! out of the field map and sent as `REQUEST_TIME` field transforms instead.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use super::dto::{
    ArrayValueDto, CollectionSelectorDto, CompositeFilterDto, FieldFilterDto, FieldReferenceDto,
    FieldTransformDto, FilterDto, MapValueDto, OrderDto, StructuredQueryDto, ValueDto,
};
use crate::domain::{Collection, Direction, Document, DocumentQuery, Field, RecordId};

const REQUEST_TIME: &str = "REQUEST_TIME";

/// Field map plus the transforms that replace lifted placeholders.
#[derive(Debug)]
pub(super) struct EncodedDocument {
    pub(super) fields: BTreeMap<String, ValueDto>,
    pub(super) transforms: Vec<FieldTransformDto>,
}

/// Encode `document`, lifting server timestamps into transforms.
pub(super) fn encode_document(document: &Document) -> Result<EncodedDocument, String> {
    let mut transforms = Vec::new();
    let fields = encode_fields(document, "", &mut transforms)?;
    Ok(EncodedDocument { fields, transforms })
}

fn encode_fields(
    document: &Document,
    prefix: &str,
    transforms: &mut Vec<FieldTransformDto>,
) -> Result<BTreeMap<String, ValueDto>, String> {
    let mut fields = BTreeMap::new();
    for (name, field) in document.iter() {
        let path = if prefix.is_empty() {
            quote_segment(name)
        } else {
            format!("{prefix}.{}", quote_segment(name))
        };
        match field {
            Field::ServerTimestamp => transforms.push(FieldTransformDto {
                field_path: path,
                set_to_server_value: REQUEST_TIME,
            }),
            Field::Map(nested) => {
                let nested = encode_fields(nested, &path, transforms)?;
                fields.insert(name.clone(), ValueDto::MapValue(MapValueDto { fields: nested }));
            }
            other => {
                fields.insert(name.clone(), encode_value(other, &path)?);
            }
        }
    }
    Ok(fields)
}

/// Encode one value. Placeholders are only valid at map positions.
pub(super) fn encode_value(field: &Field, path: &str) -> Result<ValueDto, String> {
    Ok(match field {
        Field::Null => ValueDto::NullValue(()),
        Field::Bool(value) => ValueDto::BooleanValue(*value),
        Field::Integer(value) => ValueDto::IntegerValue(value.to_string()),
        Field::Double(value) => ValueDto::DoubleValue(*value),
        Field::String(value) => ValueDto::StringValue(value.clone()),
        Field::Timestamp(value) => ValueDto::TimestampValue(format_timestamp(*value)),
        Field::ServerTimestamp => {
            return Err(format!("server timestamp at `{path}` must be a document field"));
        }
        Field::Array(values) => ValueDto::ArrayValue(ArrayValueDto {
            values: values
                .iter()
                .map(|value| encode_value(value, path))
                .collect::<Result<_, _>>()?,
        }),
        Field::Map(nested) => {
            let mut transforms = Vec::new();
            let fields = encode_fields(nested, path, &mut transforms)?;
            if !transforms.is_empty() {
                return Err(format!("server timestamp at `{path}` must be a document field"));
            }
            ValueDto::MapValue(MapValueDto { fields })
        }
    })
}

/// Decode a Firestore field map into a domain document.
pub(super) fn decode_fields(fields: BTreeMap<String, ValueDto>) -> Result<Document, String> {
    fields
        .into_iter()
        .map(|(name, value)| {
            let field =
                decode_value(value).map_err(|problem| format!("field `{name}`: {problem}"))?;
            Ok((name, field))
        })
        .collect()
}

fn decode_value(value: ValueDto) -> Result<Field, String> {
    Ok(match value {
        ValueDto::NullValue(()) => Field::Null,
        ValueDto::BooleanValue(value) => Field::Bool(value),
        ValueDto::IntegerValue(raw) => Field::Integer(
            raw.parse()
                .map_err(|_| format!("integer `{raw}` out of range"))?,
        ),
        ValueDto::DoubleValue(value) => Field::Double(value),
        ValueDto::TimestampValue(raw) => Field::Timestamp(
            DateTime::parse_from_rfc3339(&raw)
                .map_err(|err| format!("timestamp `{raw}`: {err}"))?
                .with_timezone(&Utc),
        ),
        ValueDto::StringValue(value)
        | ValueDto::BytesValue(value)
        | ValueDto::ReferenceValue(value) => Field::String(value),
        ValueDto::GeoPointValue(point) => Field::Map(
            Document::new()
                .with("latitude", Field::Double(point.latitude))
                .with("longitude", Field::Double(point.longitude)),
        ),
        ValueDto::ArrayValue(array) => Field::Array(
            array
                .values
                .into_iter()
                .map(decode_value)
                .collect::<Result<_, _>>()?,
        ),
        ValueDto::MapValue(map) => Field::Map(decode_fields(map.fields)?),
    })
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Quote a field name for use in a field path when it is not a plain
/// identifier.
pub(super) fn quote_segment(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_owned()
    } else {
        format!("`{}`", name.replace('\\', r"\\").replace('`', r"\`"))
    }
}

/// Record id from a full document resource name.
pub(super) fn record_id_from_name(name: &str) -> Option<RecordId> {
    name.rsplit('/').next().and_then(RecordId::new)
}

/// Build the structured query for `query` over `collection`.
pub(super) fn structured_query(
    collection: Collection,
    query: &DocumentQuery,
) -> Result<StructuredQueryDto, String> {
    let mut filters = query
        .filters
        .iter()
        .map(|(name, value)| {
            Ok(FilterDto::FieldFilter(FieldFilterDto {
                field: FieldReferenceDto {
                    field_path: quote_segment(name),
                },
                op: "EQUAL",
                value: encode_value(value, name)?,
            }))
        })
        .collect::<Result<Vec<_>, String>>()?;
    let filter = match filters.len() {
        0 => None,
        1 => filters.pop(),
        _ => Some(FilterDto::CompositeFilter(CompositeFilterDto {
            op: "AND",
            filters,
        })),
    };
    let order_by = query
        .order_by
        .iter()
        .map(|(name, direction)| OrderDto {
            field: FieldReferenceDto {
                field_path: quote_segment(name),
            },
            direction: match direction {
                Direction::Ascending => "ASCENDING",
                Direction::Descending => "DESCENDING",
            },
        })
        .collect();

    Ok(StructuredQueryDto {
        from: vec![CollectionSelectorDto {
            collection_id: collection.name().to_owned(),
        }],
        filter,
        order_by,
        limit: query.limit,
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the Firestore value codec.
    use super::*;
    use chrono::TimeZone;
    use insta::assert_json_snapshot;
    use rstest::rstest;

    #[test]
    fn server_timestamps_become_request_time_transforms() {
        let document = Document::new()
            .with("approved", true)
            .with("createdAt", Field::ServerTimestamp)
            .with("imageUrl", "https://img.invalid/a.jpg")
            .with(
                "meta",
                Field::Map(Document::new().with("seen at", Field::ServerTimestamp)),
            );

        let encoded = encode_document(&document).expect("document encodes");

        let paths: Vec<_> = encoded
            .transforms
            .iter()
            .map(|transform| transform.field_path.as_str())
            .collect();
        assert_eq!(paths, ["createdAt", "meta.`seen at`"]);
        assert!(!encoded.fields.contains_key("createdAt"));
        assert_eq!(
            encoded.fields.get("meta"),
            Some(&ValueDto::MapValue(MapValueDto::default()))
        );
    }

    #[test]
    fn placeholders_inside_arrays_are_rejected() {
        let document = Document::new().with("stamps", Field::Array(vec![Field::ServerTimestamp]));
        let err = encode_document(&document).expect_err("array placeholder");
        assert!(err.contains("stamps"));
    }

    #[test]
    fn decodes_typed_values() {
        let raw = serde_json::json!({
            "wins": { "integerValue": "12" },
            "ratio": { "doubleValue": 0.5 },
            "approved": { "booleanValue": true },
            "createdAt": { "timestampValue": "2025-05-17T12:00:00.250Z" },
            "tags": { "arrayValue": { "values": [{ "stringValue": "oval" }] } },
            "empty": { "arrayValue": {} },
            "gone": { "nullValue": null }
        });
        let fields: BTreeMap<String, ValueDto> =
            serde_json::from_value(raw).expect("fields deserialize");

        let document = decode_fields(fields).expect("fields decode");

        let created = Utc
            .with_ymd_and_hms(2025, 5, 17, 12, 0, 0)
            .single()
            .expect("time")
            + chrono::Duration::milliseconds(250);
        assert_eq!(document.get("wins"), Some(&Field::Integer(12)));
        assert_eq!(document.get("ratio"), Some(&Field::Double(0.5)));
        assert_eq!(document.get("approved"), Some(&Field::Bool(true)));
        assert_eq!(document.get("createdAt"), Some(&Field::Timestamp(created)));
        assert_eq!(
            document.get("tags"),
            Some(&Field::Array(vec![Field::from("oval")]))
        );
        assert_eq!(document.get("empty"), Some(&Field::Array(Vec::new())));
        assert_eq!(document.get("gone"), Some(&Field::Null));
    }

    #[rstest]
    #[case::integer_overflow(serde_json::json!({ "n": { "integerValue": "99999999999999999999" } }))]
    #[case::bad_timestamp(serde_json::json!({ "t": { "timestampValue": "yesterday" } }))]
    fn malformed_values_fail_to_decode(#[case] raw: serde_json::Value) {
        let fields: BTreeMap<String, ValueDto> =
            serde_json::from_value(raw).expect("fields deserialize");
        assert!(decode_fields(fields).is_err());
    }

    #[rstest]
    #[case("createdAt", "createdAt")]
    #[case("_private", "_private")]
    #[case("seen at", "`seen at`")]
    #[case("9lives", "`9lives`")]
    #[case("tick`tock", "`tick\\`tock`")]
    fn field_path_segments_are_quoted_when_needed(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(quote_segment(raw), expected);
    }

    #[test]
    fn record_ids_come_from_resource_names() {
        let id = record_id_from_name("projects/p/databases/(default)/documents/races/abc123");
        assert_eq!(id, RecordId::new("abc123"));
    }

    #[test]
    fn gallery_query_wire_shape() {
        let query = DocumentQuery::new()
            .where_eq("approved", true)
            .order_by("createdAt", Direction::Descending)
            .limit(30);

        let structured =
            structured_query(Collection::PublishedPhotos, &query).expect("query encodes");

        assert_json_snapshot!(structured, @r#"
        {
          "from": [
            {
              "collectionId": "gallery_images"
            }
          ],
          "where": {
            "fieldFilter": {
              "field": {
                "fieldPath": "approved"
              },
              "op": "EQUAL",
              "value": {
                "booleanValue": true
              }
            }
          },
          "orderBy": [
            {
              "field": {
                "fieldPath": "createdAt"
              },
              "direction": "DESCENDING"
            }
          ],
          "limit": 30
        }
        "#);
    }

    #[test]
    fn multiple_filters_are_combined_with_and() {
        let query = DocumentQuery::new()
            .where_eq("approved", true)
            .where_eq("uploaderUid", "u1");

        let structured = structured_query(Collection::PublishedPhotos, &query).expect("encodes");

        match structured.filter {
            Some(FilterDto::CompositeFilter(composite)) => {
                assert_eq!(composite.op, "AND");
                assert_eq!(composite.filters.len(), 2);
            }
            other => panic!("expected composite filter, got {other:?}"),
        }
    }
}
