//! Driving port bundle for the CLI.

use std::sync::Arc;

use crate::domain::ports::{
    BlobStore, DocumentStore, DriverNotesCommand, GalleryQuery, IdentityProvider,
    ModerationCommand, NotificationRegistration, PhotoSubmission, PushRegistrar,
    RaceScheduleCommand, SessionCommand, StatsQuery,
};
use crate::domain::{
    DriverNotesService, GalleryService, IdentitySession, NotificationRegistrar,
    PhotoSubmissionPipeline, RaceScheduleService, StatsService,
};

/// Every use-case the CLI can drive.
#[derive(Clone)]
pub struct CliPorts {
    pub session: Arc<dyn SessionCommand>,
    pub submission: Arc<dyn PhotoSubmission>,
    pub gallery: Arc<dyn GalleryQuery>,
    pub moderation: Arc<dyn ModerationCommand>,
    pub races: Arc<dyn RaceScheduleCommand>,
    pub notes: Arc<dyn DriverNotesCommand>,
    pub stats: Arc<dyn StatsQuery>,
    pub notifications: Arc<dyn NotificationRegistration>,
}

impl CliPorts {
    /// Build the domain services over one set of driven adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use paddock::domain::PushToken;
    /// use paddock::domain::ports::{
    ///     FixtureBlobStore, FixtureDocumentStore, FixtureIdentityProvider, FixturePushRegistrar,
    /// };
    /// use paddock::inbound::cli::CliPorts;
    /// use url::Url;
    ///
    /// let ports = CliPorts::from_adapters(
    ///     Arc::new(FixtureIdentityProvider),
    ///     Arc::new(FixtureBlobStore::new(Url::parse("https://blobs.invalid/").unwrap())),
    ///     Arc::new(FixtureDocumentStore),
    ///     Arc::new(FixturePushRegistrar::new(PushToken::new("tok").unwrap())),
    ///     30,
    /// );
    /// assert!(ports.session.current_identity().is_some());
    /// ```
    pub fn from_adapters<I, B, D, P>(
        identity: Arc<I>,
        blobs: Arc<B>,
        store: Arc<D>,
        push: Arc<P>,
        page_size: usize,
    ) -> Self
    where
        I: IdentityProvider + 'static,
        B: BlobStore + 'static,
        D: DocumentStore + 'static,
        P: PushRegistrar + 'static,
    {
        let gallery = Arc::new(
            GalleryService::new(Arc::clone(&identity), Arc::clone(&blobs), Arc::clone(&store))
                .with_page_size(page_size),
        );
        Self {
            session: Arc::new(IdentitySession::new(Arc::clone(&identity))),
            submission: Arc::new(PhotoSubmissionPipeline::new(
                Arc::clone(&identity),
                blobs,
                Arc::clone(&store),
            )),
            gallery: gallery.clone(),
            moderation: gallery,
            races: Arc::new(RaceScheduleService::new(
                Arc::clone(&identity),
                Arc::clone(&store),
            )),
            notes: Arc::new(DriverNotesService::new(
                Arc::clone(&identity),
                Arc::clone(&store),
            )),
            stats: Arc::new(StatsService::new(Arc::clone(&store))),
            notifications: Arc::new(NotificationRegistrar::new(identity, push, store)),
        }
    }
}
