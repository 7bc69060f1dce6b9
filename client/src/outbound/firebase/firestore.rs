//! Firestore REST adapter.
//!
//! Every operation is a POST against the database's `documents` resource:
//! writes go through `:commit` so server timestamps can ride along as field
//! transforms, reads use `:batchGet` and `:runQuery`. Document names travel in
//! request bodies, which keeps arbitrary record ids (push tokens contain `:`)
//! out of URL paths.

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;
use uuid::Uuid;

use super::codec::{decode_fields, encode_document, record_id_from_name, structured_query};
use super::dto::{
    BatchGetItemDto, BatchGetRequestDto, CommitRequestDto, FirestoreDocumentDto, PreconditionDto,
    RunQueryItemDto, RunQueryRequestDto, WriteDto,
};
use super::http::{HttpFailure, authorised, send};
use super::session::SessionHandle;
use crate::domain::ports::{DocumentStore, DocumentStoreError};
use crate::domain::{Collection, Document, DocumentQuery, RecordId, StoredDocument};

/// [`DocumentStore`] backed by the Firestore REST API.
pub struct FirestoreDocumentStore {
    client: Client,
    root: Url,
    database: String,
    session: SessionHandle,
}

impl FirestoreDocumentStore {
    /// Adapter for the default database of `project_id`.
    ///
    /// `root` is the Firestore `v1/` API root.
    pub fn new(client: Client, root: Url, project_id: &str, session: SessionHandle) -> Self {
        Self {
            client,
            root,
            database: format!("projects/{project_id}/databases/(default)/documents"),
            session,
        }
    }

    fn document_name(&self, collection: Collection, id: &RecordId) -> String {
        format!("{}/{}/{id}", self.database, collection.name())
    }

    fn method_url(&self, method: &str) -> Result<Url, DocumentStoreError> {
        self.root
            .join(&format!("{}:{method}", self.database))
            .map_err(|err| DocumentStoreError::rejected(format!("bad endpoint: {err}")))
    }

    async fn post<B: serde::Serialize + Sync>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<Vec<u8>, DocumentStoreError> {
        let url = self.method_url(method)?;
        send(authorised(self.client.post(url).json(body), &self.session))
            .await
            .map_err(map_failure)
    }

    async fn commit(&self, write: WriteDto) -> Result<(), DocumentStoreError> {
        self.post("commit", &CommitRequestDto {
            writes: vec![write],
        })
        .await
        .map(drop)
    }

    fn upsert_write(
        &self,
        collection: Collection,
        id: &RecordId,
        document: &Document,
    ) -> Result<WriteDto, DocumentStoreError> {
        let encoded = encode_document(document).map_err(DocumentStoreError::rejected)?;
        Ok(WriteDto {
            update: Some(FirestoreDocumentDto {
                name: Some(self.document_name(collection, id)),
                fields: encoded.fields,
            }),
            update_transforms: encoded.transforms,
            ..WriteDto::default()
        })
    }
}

fn map_failure(failure: HttpFailure) -> DocumentStoreError {
    match failure {
        HttpFailure::Refused(message) | HttpFailure::Missing(message) => {
            DocumentStoreError::rejected(message)
        }
        HttpFailure::Unavailable(message) => DocumentStoreError::connection(message),
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, DocumentStoreError> {
    serde_json::from_slice(body).map_err(|err| {
        DocumentStoreError::decode(format!("invalid Firestore JSON payload: {err}"))
    })
}

fn stored(dto: FirestoreDocumentDto) -> Result<StoredDocument, DocumentStoreError> {
    let name = dto
        .name
        .ok_or_else(|| DocumentStoreError::decode("document without a name"))?;
    let id = record_id_from_name(&name)
        .ok_or_else(|| DocumentStoreError::decode(format!("unusable document name `{name}`")))?;
    let document = decode_fields(dto.fields)
        .map_err(|problem| DocumentStoreError::decode(format!("{name}: {problem}")))?;
    Ok(StoredDocument { id, document })
}

fn new_record_id() -> Result<RecordId, DocumentStoreError> {
    RecordId::new(Uuid::new_v4().simple().to_string())
        .ok_or_else(|| DocumentStoreError::decode("generated an unusable record id"))
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<RecordId, DocumentStoreError> {
        let id = new_record_id()?;
        let mut write = self.upsert_write(collection, &id, &document)?;
        write.current_document = Some(PreconditionDto { exists: false });
        self.commit(write).await?;
        debug!(%collection, record = %id, "firestore insert");
        Ok(id)
    }

    async fn set(
        &self,
        collection: Collection,
        id: &RecordId,
        document: Document,
    ) -> Result<(), DocumentStoreError> {
        let write = self.upsert_write(collection, id, &document)?;
        self.commit(write).await?;
        debug!(%collection, record = %id, "firestore set");
        Ok(())
    }

    async fn get(
        &self,
        collection: Collection,
        id: &RecordId,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        let body = self
            .post("batchGet", &BatchGetRequestDto {
                documents: vec![self.document_name(collection, id)],
            })
            .await?;
        let items: Vec<BatchGetItemDto> = decode(&body)?;
        items
            .into_iter()
            .find_map(|item| item.found)
            .map(stored)
            .transpose()
    }

    async fn query(
        &self,
        collection: Collection,
        query: &DocumentQuery,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        let structured_query =
            structured_query(collection, query).map_err(DocumentStoreError::rejected)?;
        let body = self
            .post("runQuery", &RunQueryRequestDto { structured_query })
            .await?;
        let items: Vec<RunQueryItemDto> = decode(&body)?;
        items
            .into_iter()
            .filter_map(|item| item.document)
            .map(stored)
            .collect()
    }

    async fn delete(
        &self,
        collection: Collection,
        id: &RecordId,
    ) -> Result<(), DocumentStoreError> {
        self.commit(WriteDto {
            delete: Some(self.document_name(collection, id)),
            ..WriteDto::default()
        })
        .await?;
        debug!(%collection, record = %id, "firestore delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for request shaping and response decoding.
    use super::*;
    use crate::domain::Field;
    use insta::assert_json_snapshot;
    use rstest::rstest;

    fn store() -> FirestoreDocumentStore {
        FirestoreDocumentStore::new(
            Client::new(),
            Url::parse("https://firestore.googleapis.com/v1/").expect("url"),
            "paddock-demo",
            SessionHandle::new(),
        )
    }

    #[test]
    fn method_urls_address_the_default_database() {
        let url = store().method_url("runQuery").expect("url");
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/paddock-demo/databases/(default)/documents:runQuery"
        );
    }

    #[test]
    fn insert_write_wire_shape() {
        let adapter = store();
        let id = RecordId::new("abc").expect("id");
        let document = Document::new()
            .with("approved", true)
            .with("createdAt", Field::ServerTimestamp)
            .with("imageUrl", "https://img.invalid/a.jpg")
            .with("uploaderUid", "u1");

        let mut write = adapter
            .upsert_write(Collection::PublishedPhotos, &id, &document)
            .expect("write encodes");
        write.current_document = Some(PreconditionDto { exists: false });

        assert_json_snapshot!(write, @r#"
        {
          "update": {
            "name": "projects/paddock-demo/databases/(default)/documents/gallery_images/abc",
            "fields": {
              "approved": {
                "booleanValue": true
              },
              "imageUrl": {
                "stringValue": "https://img.invalid/a.jpg"
              },
              "uploaderUid": {
                "stringValue": "u1"
              }
            }
          },
          "updateTransforms": [
            {
              "fieldPath": "createdAt",
              "setToServerValue": "REQUEST_TIME"
            }
          ],
          "currentDocument": {
            "exists": false
          }
        }
        "#);
    }

    #[test]
    fn stored_documents_take_their_id_from_the_name() {
        let dto: FirestoreDocumentDto = serde_json::from_value(serde_json::json!({
            "name": "projects/p/databases/(default)/documents/stats/season",
            "fields": { "wins": { "integerValue": "4" } },
            "createTime": "2025-05-17T12:00:00Z"
        }))
        .expect("dto");

        let stored = stored(dto).expect("decodes");
        assert_eq!(stored.id.as_ref(), "season");
        assert_eq!(stored.document.get("wins"), Some(&Field::Integer(4)));
    }

    #[test]
    fn run_query_skips_read_time_only_rows() {
        let items: Vec<RunQueryItemDto> = decode(
            br#"[{"readTime":"2025-05-17T12:00:00Z"},
                 {"document":{"name":"x/races/r1","fields":{}},"readTime":"2025-05-17T12:00:00Z"}]"#,
        )
        .expect("rows decode");
        let documents: Vec<_> = items.into_iter().filter_map(|item| item.document).collect();
        assert_eq!(documents.len(), 1);
    }

    #[rstest]
    #[case::refused(HttpFailure::Refused("PERMISSION_DENIED".into()), "Rejected")]
    #[case::missing(HttpFailure::Missing("status 404".into()), "Rejected")]
    #[case::unavailable(HttpFailure::Unavailable("status 503".into()), "Connection")]
    fn failures_map_to_port_errors(#[case] failure: HttpFailure, #[case] expected: &str) {
        let mapped = match map_failure(failure) {
            DocumentStoreError::Connection { .. } => "Connection",
            DocumentStoreError::Rejected { .. } => "Rejected",
            DocumentStoreError::Decode { .. } => "Decode",
        };
        assert_eq!(mapped, expected);
    }
}
