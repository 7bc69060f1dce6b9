//! `paddock` command-line client.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use paddock::inbound::cli::{Cli, CliPorts, Command, run};
use paddock::outbound::firebase::{ConfiguredPushRegistrar, FirebaseAdapters};
use paddock::outbound::memory::{MemoryBlobStore, MemoryDocumentStore, MemoryIdentityProvider};
use paddock::settings::PaddockSettings;

const OFFLINE_BLOB_BASE: &str = "https://offline.invalid/";
const OFFLINE_ROLE: &str = "team-member";

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = PaddockSettings::load_from_iter([OsString::from("paddock")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let ports = if cli.offline || settings.offline {
        offline_ports(&cli, &settings)?
    } else {
        hosted_ports(&settings)?
    };

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    let as_json = cli.json;
    let outcome = runtime.block_on(run(&ports, cli));
    println!("{}", outcome.render(as_json));

    Ok(if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn hosted_ports(settings: &PaddockSettings) -> Result<CliPorts> {
    let project = settings.firebase_project()?;
    let adapters = FirebaseAdapters::connect(&project, settings.request_timeout())
        .wrap_err("failed to set up Firebase adapters")?;
    info!(project = %project.project_id, "using hosted backend");
    Ok(CliPorts::from_adapters(
        adapters.identity,
        adapters.blobs,
        adapters.documents,
        Arc::new(ConfiguredPushRegistrar::new(settings.push_token.as_deref())),
        settings.gallery_page_size(),
    ))
}

/// In-memory wiring. The global credentials are seeded as a team-member
/// account so privileged flows can be exercised without a backend.
fn offline_ports(cli: &Cli, settings: &PaddockSettings) -> Result<CliPorts> {
    let identity = Arc::new(MemoryIdentityProvider::new());
    if let (Some(email), Some(password)) = (cli.email.as_deref(), cli.password.as_deref()) {
        if cli.command != Command::SignUp {
            identity
                .add_account(email, password, Some(OFFLINE_ROLE))
                .wrap_err("failed to seed offline account")?;
        }
    }
    let blobs = Arc::new(MemoryBlobStore::new(
        Url::parse(OFFLINE_BLOB_BASE).wrap_err("invalid offline blob base")?,
    ));
    let documents = Arc::new(MemoryDocumentStore::new(Arc::new(DefaultClock)));
    info!("using in-memory adapters");
    Ok(CliPorts::from_adapters(
        identity,
        blobs,
        documents,
        Arc::new(ConfiguredPushRegistrar::new(settings.push_token.as_deref())),
        settings.gallery_page_size(),
    ))
}
