//! Domain primitives, ports and services.
//!
//! Purpose: keep the race-day rules (who may publish, where a photo lands,
//! which record a note or token overwrites) independent of any backend SDK.
//! Services implement the driving ports on top of the driven ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic failure payload.
//! - Identity, Credentials, Role, Trust: session and privilege model.
//! - Document, Field, Collection, RecordId: schemaless record model.
//! - Race, Photo, DriverNote, Stats, PushToken: entities.
//! - Services: one per driving port.

pub mod document;
pub mod driver_note;
pub mod error;
pub mod identity;
pub mod photo;
pub mod ports;
pub mod push_token;
pub mod race;
pub mod stats;

mod driver_notes_service;
mod entity_store;
mod gallery_service;
mod notification_registrar;
mod photo_submission_service;
mod race_schedule_service;
mod session_service;
mod stats_service;

pub use self::document::{
    Collection, DecodeError, Direction, Document, DocumentQuery, Field, RecordId, StoredDocument,
};
pub use self::driver_note::DriverNote;
pub use self::driver_notes_service::DriverNotesService;
pub use self::entity_store::EntityStore;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::gallery_service::GalleryService;
pub use self::identity::{
    Credentials, Identity, IdentityValidationError, PASSWORD_MIN, PRIVILEGED_ROLE, Role, Trust,
    UserId,
};
pub use self::notification_registrar::NotificationRegistrar;
pub use self::photo::{Destination, GALLERY_PAGE_SIZE, NewPhoto, Photo, SubmissionOutcome};
pub use self::photo_submission_service::PhotoSubmissionPipeline;
pub use self::push_token::PushToken;
pub use self::race::{Race, RaceDraft, RaceValidationError};
pub use self::race_schedule_service::RaceScheduleService;
pub use self::session_service::IdentitySession;
pub use self::stats::{STATS_RECORD_ID, Stats};
pub use self::stats_service::StatsService;

/// Result alias used by the driving ports.
///
/// # Examples
/// ```
/// use paddock::domain::{DomainResult, Error};
///
/// fn guarded() -> DomainResult<()> {
///     Err(Error::forbidden("moderators only"))
/// }
/// assert!(guarded().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
