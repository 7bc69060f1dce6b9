//! Firebase REST adapters.
//!
//! The identity adapter owns the signed-in session; Firestore and Storage
//! read its ID token through a shared [`SessionHandle`]. All three share one
//! reqwest client built with the configured request timeout.

mod codec;
mod dto;
mod firestore;
mod http;
mod identity_toolkit;
mod messaging;
mod session;
mod storage;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};

pub use firestore::FirestoreDocumentStore;
pub use identity_toolkit::FirebaseIdentityProvider;
pub use messaging::ConfiguredPushRegistrar;
pub use session::SessionHandle;
pub use storage::FirebaseBlobStore;

const IDENTITY_TOOLKIT_ROOT: &str = "https://identitytoolkit.googleapis.com/v1/";
const SECURE_TOKEN_ROOT: &str = "https://securetoken.googleapis.com/v1/";
const FIRESTORE_ROOT: &str = "https://firestore.googleapis.com/v1/";
const STORAGE_ROOT: &str = "https://firebasestorage.googleapis.com/v0/";

/// Errors raised while wiring the Firebase adapters.
#[derive(Debug, thiserror::Error)]
pub enum FirebaseSetupError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// An endpoint could not be formed from the project settings.
    #[error("invalid Firebase endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Project coordinates for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseProject {
    /// Project id, e.g. `paddock-demo`.
    pub project_id: String,
    /// Web API key.
    pub api_key: String,
    /// Storage bucket, e.g. `paddock-demo.appspot.com`.
    pub storage_bucket: String,
}

/// The three REST adapters sharing one session.
pub struct FirebaseAdapters {
    /// Identity Toolkit adapter.
    pub identity: Arc<FirebaseIdentityProvider>,
    /// Firestore adapter.
    pub documents: Arc<FirestoreDocumentStore>,
    /// Storage adapter.
    pub blobs: Arc<FirebaseBlobStore>,
}

impl FirebaseAdapters {
    /// Build all adapters for `project` against the production endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed or an
    /// endpoint cannot be formed.
    pub fn connect(
        project: &FirebaseProject,
        timeout: Duration,
    ) -> Result<Self, FirebaseSetupError> {
        let client = Client::builder().timeout(timeout).build()?;
        let session = SessionHandle::new();

        let identity = FirebaseIdentityProvider::new(
            client.clone(),
            Url::parse(IDENTITY_TOOLKIT_ROOT)?,
            Url::parse(SECURE_TOKEN_ROOT)?,
            &project.api_key,
            session.clone(),
        );
        let documents = FirestoreDocumentStore::new(
            client.clone(),
            Url::parse(FIRESTORE_ROOT)?,
            &project.project_id,
            session.clone(),
        );
        let blobs = FirebaseBlobStore::new(
            client,
            &Url::parse(STORAGE_ROOT)?,
            &project.storage_bucket,
            session,
        )?;

        Ok(Self {
            identity: Arc::new(identity),
            documents: Arc::new(documents),
            blobs: Arc::new(blobs),
        })
    }
}
