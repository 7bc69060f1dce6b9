//! In-memory adapters.
//!
//! Stateful stand-ins for the hosted services, used by the integration tests
//! and by the CLI's offline mode. State lives behind `std::sync::Mutex`; a
//! poisoned lock is reported as a rejected request rather than a panic.

mod blob_store;
mod document_store;
mod identity_provider;

pub use blob_store::MemoryBlobStore;
pub use document_store::MemoryDocumentStore;
pub use identity_provider::MemoryIdentityProvider;
