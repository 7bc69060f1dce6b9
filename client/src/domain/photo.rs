//! Gallery photo records and submission outcomes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use super::document::{Collection, DecodeError, Document, Field, RecordId, StoredDocument};
use super::identity::{Identity, Trust, UserId};

pub(crate) const IMAGE_URL: &str = "imageUrl";
pub(crate) const UPLOADER_UID: &str = "uploaderUid";
pub(crate) const UPLOADER_EMAIL: &str = "uploaderEmail";
pub(crate) const CREATED_AT: &str = "createdAt";
pub(crate) const APPROVED: &str = "approved";
pub(crate) const STORAGE_PATH: &str = "storagePath";

/// Number of photos shown on one gallery page.
pub const GALLERY_PAGE_SIZE: usize = 30;

/// Where a submitted photo ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Visible in the gallery immediately.
    Published,
    /// Waiting in the moderation queue.
    PendingApproval,
}

impl Destination {
    /// Collection that receives records for this destination.
    pub const fn collection(self) -> Collection {
        match self {
            Self::Published => Collection::PublishedPhotos,
            Self::PendingApproval => Collection::PendingPhotos,
        }
    }
}

impl From<Trust> for Destination {
    fn from(trust: Trust) -> Self {
        match trust {
            Trust::Trusted => Self::Published,
            Trust::Untrusted => Self::PendingApproval,
        }
    }
}

/// New photo metadata, built once the blob is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    /// Retrieval URL of the uploaded blob.
    pub image_url: Url,
    /// Uploader id.
    pub uploader_uid: UserId,
    /// Uploader email, if known.
    pub uploader_email: Option<String>,
    /// Blob path, kept so moderation can remove rejected uploads.
    pub storage_path: String,
}

impl NewPhoto {
    /// Metadata for a blob uploaded by `identity`.
    pub fn new(identity: &Identity, image_url: Url, storage_path: String) -> Self {
        Self {
            image_url,
            uploader_uid: identity.uid.clone(),
            uploader_email: identity.email.clone(),
            storage_path,
        }
    }

    /// Store representation for `destination`.
    ///
    /// Published records carry `approved = true`; queued records carry no
    /// approval flag at all. `createdAt` is left to the store's clock.
    pub fn to_document(&self, destination: Destination) -> Document {
        let mut document = Document::new()
            .with(IMAGE_URL, self.image_url.as_str())
            .with(UPLOADER_UID, self.uploader_uid.as_ref())
            .with(CREATED_AT, Field::ServerTimestamp)
            .with(STORAGE_PATH, self.storage_path.as_str());
        document.insert(
            UPLOADER_EMAIL,
            self.uploader_email
                .as_deref()
                .map_or(Field::Null, Field::from),
        );
        if destination == Destination::Published {
            document.insert(APPROVED, true);
        }
        document
    }
}

/// A stored photo record from either photo collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Record id.
    pub id: RecordId,
    /// Retrieval URL.
    pub image_url: String,
    /// Uploader id, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploader_uid: Option<String>,
    /// Uploader email, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploader_email: Option<String>,
    /// Store-assigned creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Approval flag; absent reads as `false`.
    pub approved: bool,
    /// Blob path, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
}

impl Photo {
    /// Decode a record read from `collection`.
    pub fn decode(collection: Collection, stored: StoredDocument) -> Result<Self, DecodeError> {
        let StoredDocument { id, document } = stored;
        let image_url = document
            .str_field(IMAGE_URL)
            .map(str::to_owned)
            .ok_or_else(|| DecodeError::missing(collection, &id, IMAGE_URL))?;
        let approved = match document.get(APPROVED) {
            None | Some(Field::Null) => false,
            Some(field) => field
                .as_bool()
                .ok_or_else(|| DecodeError::invalid(collection, &id, APPROVED))?,
        };
        Ok(Self {
            image_url,
            uploader_uid: document.str_field(UPLOADER_UID).map(str::to_owned),
            uploader_email: document.str_field(UPLOADER_EMAIL).map(str::to_owned),
            created_at: document.get(CREATED_AT).and_then(Field::as_timestamp),
            approved,
            storage_path: document.str_field(STORAGE_PATH).map(str::to_owned),
            id,
        })
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    /// Collection the record was written to.
    pub destination: Destination,
    /// Id of the new record.
    pub record_id: RecordId,
    /// Retrieval URL of the uploaded blob.
    pub image_url: Url,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn new_photo() -> NewPhoto {
        let identity = Identity::new(
            UserId::new("u1").expect("uid"),
            Some("u1@example.com".to_owned()),
        );
        NewPhoto::new(
            &identity,
            Url::parse("https://store/x.jpg").expect("url"),
            "gallery/u1/a.jpg".to_owned(),
        )
    }

    #[rstest]
    fn published_document_sets_approval(new_photo: NewPhoto) {
        let document = new_photo.to_document(Destination::Published);
        assert_eq!(document.get(APPROVED), Some(&Field::Bool(true)));
        assert_eq!(document.get(CREATED_AT), Some(&Field::ServerTimestamp));
        assert_eq!(document.str_field(UPLOADER_UID), Some("u1"));
    }

    #[rstest]
    fn pending_document_omits_approval(new_photo: NewPhoto) {
        let document = new_photo.to_document(Destination::PendingApproval);
        assert!(!document.contains(APPROVED));
        assert_eq!(document.str_field(IMAGE_URL), Some("https://store/x.jpg"));
    }

    #[rstest]
    #[case(Trust::Trusted, Destination::Published, Collection::PublishedPhotos)]
    #[case(Trust::Untrusted, Destination::PendingApproval, Collection::PendingPhotos)]
    fn trust_selects_collection(
        #[case] trust: Trust,
        #[case] destination: Destination,
        #[case] collection: Collection,
    ) {
        let routed = Destination::from(trust);
        assert_eq!(routed, destination);
        assert_eq!(routed.collection(), collection);
    }

    #[rstest]
    fn decode_treats_missing_flag_as_unapproved() {
        let stored = StoredDocument {
            id: RecordId::new("p1").expect("id"),
            document: Document::new().with(IMAGE_URL, "https://store/x.jpg"),
        };
        let photo = Photo::decode(Collection::PendingPhotos, stored).expect("decodes");
        assert!(!photo.approved);
        assert!(photo.created_at.is_none());
    }

    #[rstest]
    fn decode_rejects_non_boolean_flag() {
        let stored = StoredDocument {
            id: RecordId::new("p1").expect("id"),
            document: Document::new()
                .with(IMAGE_URL, "https://store/x.jpg")
                .with(APPROVED, "yes"),
        };
        let err = Photo::decode(Collection::PublishedPhotos, stored).expect_err("invalid flag");
        assert_eq!(err.field, APPROVED);
    }
}
