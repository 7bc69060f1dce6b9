//! Unit tests for the boundary lint.

use std::path::{Path, PathBuf};

use rstest::rstest;

use super::*;
use crate::reach::classify;
use crate::scope::Adapter;

fn lint_one(file: &str, contents: &str) -> Result<(), BoundaryError> {
    lint_sources(&[LintSource {
        file: PathBuf::from(file),
        contents: contents.to_owned(),
    }])
}

fn violations(result: Result<(), BoundaryError>) -> Vec<(Rule, String)> {
    match result {
        Ok(()) => Vec::new(),
        Err(BoundaryError::Violations(found)) => found
            .into_iter()
            .map(|violation| (violation.rule, violation.message))
            .collect(),
        Err(other) => panic!("expected violations, got: {other}"),
    }
}

fn segments(path: &str) -> Vec<String> {
    path.split("::").map(str::to_owned).collect()
}

#[rstest]
#[case::lib("lib.rs", Placement::CompositionRoot)]
#[case::main("main.rs", Placement::CompositionRoot)]
#[case::settings("settings.rs", Placement::Scoped(Scope::Settings))]
#[case::service("domain/gallery_service.rs", Placement::Scoped(Scope::Domain))]
#[case::nested_tests("domain/error/tests.rs", Placement::Scoped(Scope::Domain))]
#[case::port("domain/ports/blob_store.rs", Placement::Scoped(Scope::Ports))]
#[case::ports_root("domain/ports/mod.rs", Placement::Scoped(Scope::Ports))]
#[case::cli("inbound/cli/dispatch.rs", Placement::Scoped(Scope::Inbound))]
#[case::outbound_root("outbound/mod.rs", Placement::Scoped(Scope::Outbound(None)))]
#[case::memory(
    "outbound/memory/blob_store.rs",
    Placement::Scoped(Scope::Outbound(Some(Adapter::Memory)))
)]
#[case::firebase_root(
    "outbound/firebase/mod.rs",
    Placement::Scoped(Scope::Outbound(Some(Adapter::Firebase)))
)]
#[case::stray_root_module("telemetry.rs", Placement::Unknown)]
fn files_are_placed_by_path(#[case] file: &str, #[case] expected: Placement) {
    assert_eq!(Scope::place(Path::new(file)), expected);
}

#[rstest]
#[case::crate_module("crate::domain::ports::BlobStore", Some(("domain", None)))]
#[case::adapter(
    "crate::outbound::firebase::FirebaseAdapters",
    Some(("outbound", Some(Adapter::Firebase)))
)]
#[case::by_crate_name("paddock::settings::PaddockSettings", Some(("settings", None)))]
#[case::bare_module("inbound::notice::Notice", Some(("inbound", None)))]
#[case::relative_layer("super::super::inbound::cli", Some(("inbound", None)))]
#[case::relative_adapter(
    "super::memory::MemoryBlobStore",
    Some(("outbound", Some(Adapter::Memory)))
)]
#[case::relative_sibling_file("super::dto::ValueDto", None)]
#[case::unknown_crate_module("crate::telemetry::init", None)]
fn client_paths_are_classified(
    #[case] path: &str,
    #[case] expected: Option<(&'static str, Option<Adapter>)>,
) {
    let segments = segments(path);
    let expected = expected.map(|(name, adapter)| Target::Module { name, adapter });
    assert_eq!(classify(&segments), expected);
}

#[rstest]
fn other_roots_are_crates() {
    let segments = segments("reqwest::Client");
    assert_eq!(classify(&segments), Some(Target::Crate("reqwest")));
}

#[rstest]
#[case::service_uses_ports(
    "domain/gallery_service.rs",
    "use crate::domain::ports::{BlobStore, DocumentStore}; use tracing::warn;"
)]
#[case::cli_uses_domain(
    "inbound/cli/dispatch.rs",
    "use crate::domain::{Error, RecordId}; use clap::Parser;"
)]
#[case::firebase_uses_its_own_modules(
    "outbound/firebase/firestore.rs",
    "use super::http::send; use reqwest::Client; use crate::domain::ports::DocumentStore;"
)]
#[case::settings_uses_firebase_project(
    "settings.rs",
    "use ortho_config::OrthoConfig; use crate::outbound::firebase::FirebaseProject;"
)]
#[case::composition_root_wires_everything(
    "main.rs",
    "use paddock::inbound::cli::run; use paddock::outbound::memory::MemoryBlobStore;"
)]
fn allowed_dependencies_pass(#[case] file: &str, #[case] contents: &str) {
    let result = lint_one(file, contents);
    assert!(result.is_ok(), "{result:?}");
}

#[rstest]
#[case::domain_reads_settings(
    "domain/gallery_service.rs",
    "use crate::settings::PaddockSettings;",
    "domain code must not reach crate::settings"
)]
#[case::domain_uses_http(
    "domain/entity_store.rs",
    "fn client() { let _ = reqwest::Client::new(); }",
    "domain code must not use `reqwest`"
)]
#[case::cli_uses_adapter(
    "inbound/cli/ports.rs",
    "use paddock::outbound::firebase::FirebaseAdapters;",
    "inbound code must not reach crate::outbound"
)]
#[case::cli_reads_settings(
    "inbound/cli/dispatch.rs",
    "use crate::settings::PaddockSettings;",
    "inbound code must not reach crate::settings"
)]
#[case::settings_uses_cli(
    "settings.rs",
    "use crate::inbound::cli::Cli;",
    "settings code must not reach crate::inbound"
)]
#[case::settings_parses_flags(
    "settings.rs",
    "use clap::Parser;",
    "settings code must not use `clap`"
)]
#[case::adapter_parses_flags(
    "outbound/memory/identity_provider.rs",
    "use clap::Parser;",
    "outbound::memory code must not use `clap`"
)]
fn reach_violations_are_reported(
    #[case] file: &str,
    #[case] contents: &str,
    #[case] expected: &str,
) {
    let found = violations(lint_one(file, contents));
    assert_eq!(found.len(), 1, "{found:?}");
    assert_eq!(found[0].1, expected);
}

#[rstest]
#[case::memory_reaches_firebase(
    "outbound/memory/document_store.rs",
    "use crate::outbound::firebase::SessionHandle;",
    "outbound::memory must not reach the sibling `firebase` adapter"
)]
#[case::firebase_reaches_memory(
    "outbound/firebase/storage.rs",
    "use super::super::memory::MemoryBlobStore;",
    "outbound::firebase must not reach the sibling `memory` adapter"
)]
fn adapters_stay_apart(#[case] file: &str, #[case] contents: &str, #[case] expected: &str) {
    let found = violations(lint_one(file, contents));
    assert_eq!(found, [(Rule::AdapterIsolation, expected.to_owned())]);
}

#[rstest]
fn shared_outbound_code_may_name_either_adapter() {
    let result = lint_one(
        "outbound/mod.rs",
        "pub use crate::outbound::memory::MemoryBlobStore; pub use firebase::FirebaseBlobStore;",
    );
    assert!(result.is_ok(), "{result:?}");
}

#[rstest]
fn well_formed_port_passes() {
    let result = lint_one(
        "domain/ports/stats_query.rs",
        "#[cfg_attr(test, mockall::automock)]
         #[async_trait]
         pub trait StatsQuery: Send + Sync {
             async fn current(&self) -> Result<Stats, Error>;
         }",
    );
    assert!(result.is_ok(), "{result:?}");
}

#[rstest]
fn port_shape_problems_are_listed_per_trait() {
    let found = violations(lint_one(
        "domain/ports/push_registrar.rs",
        "#[async_trait::async_trait]
         pub trait PushRegistrar: Send {
             async fn token(&self) -> Result<PushToken, PushRegistrarError>;
         }
         #[cfg_attr(feature = \"mocks\", mockall::automock)]
         pub trait Untagged {}
         trait Private {}",
    ));

    assert!(found.iter().all(|(rule, _)| *rule == Rule::PortShape));
    let messages: Vec<_> = found.into_iter().map(|(_, message)| message).collect();
    assert_eq!(
        messages,
        [
            "port trait `PushRegistrar` must carry #[cfg_attr(test, mockall::automock)]",
            "port trait `PushRegistrar` must require `Sync`",
            "port trait `Untagged` must be declared with #[async_trait]",
            "port trait `Untagged` must carry #[cfg_attr(test, mockall::automock)]",
            "port trait `Untagged` must require `Send`",
            "port trait `Untagged` must require `Sync`",
        ]
    );
}

#[rstest]
fn port_shape_is_only_checked_under_ports() {
    let result = lint_one("domain/entity_store.rs", "pub trait Decode {}");
    assert!(result.is_ok(), "{result:?}");
}

#[rstest]
fn unplaced_files_are_rejected() {
    let result = lint_one("telemetry.rs", "fn init() {}");
    assert!(matches!(result, Err(BoundaryError::Unplaced { .. })));
}

#[rstest]
fn unparsable_sources_are_reported() {
    let result = lint_one("domain/broken.rs", "fn thing( {");
    assert!(matches!(result, Err(BoundaryError::Parse { .. })));
}

#[rstest]
fn report_lists_each_violation_on_its_own_line() {
    let err = lint_sources(&[
        LintSource {
            file: PathBuf::from("domain/race.rs"),
            contents: "use crate::inbound::notice::Notice;".to_owned(),
        },
        LintSource {
            file: PathBuf::from("inbound/notice.rs"),
            contents: "use reqwest::StatusCode;".to_owned(),
        },
    ])
    .expect_err("violations");

    assert_eq!(
        err.to_string(),
        "client boundary violations:\n\
         - domain/race.rs: domain code must not reach crate::inbound\n\
         - inbound/notice.rs: inbound code must not use `reqwest`"
    );
}
