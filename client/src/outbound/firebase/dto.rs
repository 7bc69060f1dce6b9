//! Wire DTOs for the Firebase REST surfaces.
//!
//! Adapters serialise requests from, and decode responses into, these
//! structs; translation to domain documents happens in `codec`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// Identity Toolkit and Secure Token.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PasswordRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AuthResponseDto {
    pub(super) local_id: String,
    pub(super) email: Option<String>,
    pub(super) id_token: String,
    pub(super) refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LookupRequestDto<'a> {
    pub(super) id_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct LookupResponseDto {
    #[serde(default)]
    pub(super) users: Vec<LookupUserDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LookupUserDto {
    pub(super) local_id: String,
    /// JSON object encoded as a string, e.g. `{"role":"team-member"}`.
    pub(super) custom_attributes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RefreshResponseDto {
    pub(super) id_token: String,
    pub(super) refresh_token: String,
    pub(super) user_id: String,
}

/// Google API error envelope shared by every Firebase REST endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct GoogleErrorDto {
    pub(super) error: GoogleErrorBodyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct GoogleErrorBodyDto {
    #[serde(default)]
    pub(super) message: String,
}

// Firestore.

/// One typed Firestore value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) enum ValueDto {
    NullValue(()),
    BooleanValue(bool),
    /// Int64 values travel as decimal strings.
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPointDto),
    ArrayValue(ArrayValueDto),
    MapValue(MapValueDto),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct GeoPointDto {
    #[serde(default)]
    pub(super) latitude: f64,
    #[serde(default)]
    pub(super) longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub(super) struct ArrayValueDto {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(super) values: Vec<ValueDto>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub(super) struct MapValueDto {
    #[serde(default)]
    pub(super) fields: BTreeMap<String, ValueDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct FirestoreDocumentDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) name: Option<String>,
    #[serde(default)]
    pub(super) fields: BTreeMap<String, ValueDto>,
}

#[derive(Debug, Serialize)]
pub(super) struct CommitRequestDto {
    pub(super) writes: Vec<WriteDto>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WriteDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) update: Option<FirestoreDocumentDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) delete: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(super) update_transforms: Vec<FieldTransformDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) current_document: Option<PreconditionDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FieldTransformDto {
    pub(super) field_path: String,
    pub(super) set_to_server_value: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct PreconditionDto {
    pub(super) exists: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct BatchGetRequestDto {
    pub(super) documents: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BatchGetItemDto {
    pub(super) found: Option<FirestoreDocumentDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RunQueryRequestDto {
    pub(super) structured_query: StructuredQueryDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StructuredQueryDto {
    pub(super) from: Vec<CollectionSelectorDto>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub(super) filter: Option<FilterDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(super) order_by: Vec<OrderDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CollectionSelectorDto {
    pub(super) collection_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) enum FilterDto {
    FieldFilter(FieldFilterDto),
    CompositeFilter(CompositeFilterDto),
}

#[derive(Debug, Serialize)]
pub(super) struct FieldFilterDto {
    pub(super) field: FieldReferenceDto,
    pub(super) op: &'static str,
    pub(super) value: ValueDto,
}

#[derive(Debug, Serialize)]
pub(super) struct CompositeFilterDto {
    pub(super) op: &'static str,
    pub(super) filters: Vec<FilterDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FieldReferenceDto {
    pub(super) field_path: String,
}

#[derive(Debug, Serialize)]
pub(super) struct OrderDto {
    pub(super) field: FieldReferenceDto,
    pub(super) direction: &'static str,
}

#[derive(Debug, Deserialize)]
pub(super) struct RunQueryItemDto {
    pub(super) document: Option<FirestoreDocumentDto>,
}

// Cloud Storage for Firebase.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StorageObjectDto {
    pub(super) name: String,
    /// Comma-separated list; the first entry is used for download URLs.
    pub(super) download_tokens: Option<String>,
}

impl StorageObjectDto {
    pub(super) fn first_download_token(&self) -> Option<&str> {
        self.download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').map(str::trim).find(|token| !token.is_empty()))
    }
}
