//! Command execution and result rendering.

use std::path::Path;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{Cli, CliPorts, Command, RaceArgs};
use crate::domain::ports::{PhotoUpload, RaceForm};
use crate::domain::{Error, RecordId};
use crate::inbound::notice::{Notice, NoticeLevel};

/// What a command produced: optional data to show and an optional notice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// Transient message for the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    /// Command payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Outcome {
    fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            data: None,
        }
    }

    fn failed(err: &Error) -> Self {
        Self::notice(Notice::from(err))
    }

    fn data<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(data) => Self {
                notice: None,
                data: Some(data),
            },
            Err(err) => Self::failed(&Error::internal(format!("render failed: {err}"))),
        }
    }

    fn with_notice(mut self, notice: Notice) -> Self {
        if self.notice.is_none() {
            self.notice = Some(notice);
        }
        self
    }

    /// Whether the command failed.
    pub fn is_failure(&self) -> bool {
        self.notice
            .as_ref()
            .is_some_and(|notice| notice.level == NoticeLevel::Error)
    }

    /// Render for the terminal.
    pub fn render(&self, as_json: bool) -> String {
        if as_json {
            return serde_json::to_string_pretty(self).unwrap_or_else(|err| {
                json!({ "notice": { "level": "error", "text": err.to_string() } }).to_string()
            });
        }
        let mut lines = Vec::new();
        if let Some(data) = &self.data {
            lines.push(serde_json::to_string_pretty(data).unwrap_or_default());
        }
        if let Some(notice) = &self.notice {
            lines.push(notice.text.clone());
        }
        lines.join("\n")
    }
}

fn record_id(raw: &str) -> Result<RecordId, Error> {
    RecordId::new(raw.trim()).ok_or_else(|| Error::invalid_request("a record id is required"))
}

fn guess_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

fn race_form(args: RaceArgs) -> (RaceForm, Option<String>) {
    let form = RaceForm {
        name: args.name,
        date: args.date,
        kind: args.kind,
        race_number: args.race_number,
    };
    (form, args.id)
}

/// Run one invocation: sign in when credentials are given, then execute.
pub async fn run(ports: &CliPorts, cli: Cli) -> Outcome {
    let email = cli.email.unwrap_or_default();
    let password = cli.password.unwrap_or_default();

    if cli.command == Command::SignUp {
        return match ports.session.sign_up(&email, &password).await {
            Ok(identity) => Outcome::data(&identity).with_notice(Notice::info("Account created")),
            Err(err) => Outcome::failed(&err),
        };
    }
    if !email.is_empty() || !password.is_empty() {
        if let Err(err) = ports.session.sign_in(&email, &password).await {
            return Outcome::failed(&err);
        }
    }
    execute(ports, cli.command).await
}

async fn execute(ports: &CliPorts, command: Command) -> Outcome {
    debug!(?command, "executing command");
    let result = match command {
        Command::SignUp => Err(Error::invalid_request("sign-up is handled before dispatch")),
        Command::SignOut => ports
            .session
            .sign_out()
            .await
            .map(|()| Outcome::notice(Notice::info("Signed out"))),
        Command::Whoami => whoami(ports).await,
        Command::Gallery => Ok(match ports.gallery.latest().await {
            Ok(photos) => Outcome::data(&photos),
            Err(err) => {
                warn!(error = %err, "gallery query failed");
                Outcome::data(&Vec::<Value>::new()).with_notice(Notice::gallery_failed())
            }
        }),
        Command::Upload { path, content_type } => upload(ports, &path, content_type).await,
        Command::Pending => ports.moderation.pending().await.map(|photos| Outcome::data(&photos)),
        Command::Approve { id } => match record_id(&id) {
            Ok(id) => ports.moderation.approve(&id).await.map(|published| {
                Outcome::data(&published).with_notice(Notice::info("Photo approved"))
            }),
            Err(err) => Err(err),
        },
        Command::Reject { id } => match record_id(&id) {
            Ok(id) => ports
                .moderation
                .reject(&id)
                .await
                .map(|()| Outcome::notice(Notice::info("Photo rejected"))),
            Err(err) => Err(err),
        },
        Command::Races => ports.races.list().await.map(|races| Outcome::data(&races)),
        Command::Race { id } => match record_id(&id) {
            Ok(id) => ports.races.load(&id).await.map(|race| Outcome::data(&race)),
            Err(err) => Err(err),
        },
        Command::SaveRace(args) => save_race(ports, args).await,
        Command::DeleteRace { id } => match record_id(&id) {
            Ok(id) => ports
                .races
                .delete(&id)
                .await
                .map(|()| Outcome::notice(Notice::info("Race deleted"))),
            Err(err) => Err(err),
        },
        Command::Note => ports.notes.load().await.map(|note| Outcome::data(&note)),
        Command::SaveNote { text } => ports
            .notes
            .save(&text)
            .await
            .map(|()| Outcome::notice(Notice::info("Note saved"))),
        Command::Stats => ports.stats.current().await.map(|stats| Outcome::data(&stats)),
        Command::RegisterPush => ports
            .notifications
            .register()
            .await
            .map(|outcome| Outcome::notice(Notice::registered(&outcome))),
    };
    result.unwrap_or_else(|err| Outcome::failed(&err))
}

async fn whoami(ports: &CliPorts) -> Result<Outcome, Error> {
    let identity = ports
        .session
        .current_identity()
        .ok_or_else(|| Error::unauthorized("sign in required"))?;
    let role = ports.session.current_role().await?;
    Ok(Outcome::data(&json!({
        "uid": identity.uid,
        "email": identity.email,
        "role": role,
    })))
}

async fn upload(
    ports: &CliPorts,
    path: &Path,
    content_type: Option<String>,
) -> Result<Outcome, Error> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        Error::invalid_request(format!("could not read {}: {err}", path.display()))
    })?;
    let content_type = content_type.unwrap_or_else(|| guess_content_type(path).to_owned());
    let outcome = ports
        .submission
        .submit(PhotoUpload::new(bytes, content_type))
        .await?;
    Ok(Outcome::data(&outcome).with_notice(Notice::submitted(&outcome)))
}

async fn save_race(ports: &CliPorts, args: RaceArgs) -> Result<Outcome, Error> {
    let (form, id) = race_form(args);
    let existing = id.as_deref().map(record_id).transpose()?;
    let saved = ports.races.save(form, existing).await?;
    Ok(Outcome::data(&saved).with_notice(Notice::info("Race saved")))
}
