//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`IdentityProvider`, `DocumentStore`, `BlobStore`,
//! `PushRegistrar`) are implemented by outbound adapters. Driving ports are
//! implemented by the domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod blob_store;
mod document_store;
mod driver_notes_command;
mod gallery_query;
mod identity_provider;
mod moderation_command;
mod notification_registration;
mod photo_submission;
mod push_registrar;
mod race_schedule_command;
mod session_command;
mod stats_query;

#[cfg(test)]
pub use blob_store::MockBlobStore;
pub use blob_store::{BlobStore, BlobStoreError, FixtureBlobStore};
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{DocumentStore, DocumentStoreError, FixtureDocumentStore};
pub use driver_notes_command::DriverNotesCommand;
#[cfg(test)]
pub use driver_notes_command::MockDriverNotesCommand;
pub use gallery_query::GalleryQuery;
#[cfg(test)]
pub use gallery_query::MockGalleryQuery;
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{FixtureIdentityProvider, IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use moderation_command::MockModerationCommand;
pub use moderation_command::ModerationCommand;
#[cfg(test)]
pub use notification_registration::MockNotificationRegistration;
pub use notification_registration::{NotificationRegistration, RegistrationOutcome};
#[cfg(test)]
pub use photo_submission::MockPhotoSubmission;
pub use photo_submission::{PhotoSubmission, PhotoUpload};
#[cfg(test)]
pub use push_registrar::MockPushRegistrar;
pub use push_registrar::{FixturePushRegistrar, PushRegistrar, PushRegistrarError};
#[cfg(test)]
pub use race_schedule_command::MockRaceScheduleCommand;
pub use race_schedule_command::{RaceForm, RaceScheduleCommand};
#[cfg(test)]
pub use session_command::MockSessionCommand;
pub use session_command::SessionCommand;
#[cfg(test)]
pub use stats_query::MockStatsQuery;
pub use stats_query::StatsQuery;
