//! Argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// `paddock` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "paddock",
    about = "Race schedule, gallery and driver notes for the team and its fans",
    version
)]
pub struct Cli {
    /// Use in-memory adapters instead of the hosted backend.
    #[arg(long, global = true)]
    pub offline: bool,
    /// Print JSON instead of plain text.
    #[arg(long, global = true)]
    pub json: bool,
    /// Account email; signs in before the command runs.
    #[arg(long, global = true, value_name = "email")]
    pub email: Option<String>,
    /// Account password.
    #[arg(long, global = true, value_name = "password")]
    pub password: Option<String>,
    /// Action to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Screen actions.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create an account from `--email` and `--password`.
    SignUp,
    /// End the session.
    SignOut,
    /// Show the signed-in identity and role.
    Whoami,
    /// Show the newest approved photos.
    Gallery,
    /// Upload a photo.
    Upload {
        /// Image file to upload.
        path: PathBuf,
        /// MIME type; guessed from the extension when omitted.
        #[arg(long = "content-type", value_name = "mime")]
        content_type: Option<String>,
    },
    /// List photos awaiting moderation.
    Pending,
    /// Publish a queued photo.
    Approve {
        /// Pending record id.
        id: String,
    },
    /// Discard a queued photo.
    Reject {
        /// Pending record id.
        id: String,
    },
    /// List the race schedule.
    Races,
    /// Show one race.
    Race {
        /// Race id.
        id: String,
    },
    /// Create or edit a race.
    SaveRace(RaceArgs),
    /// Delete a race.
    DeleteRace {
        /// Race id.
        id: String,
    },
    /// Show your driver note.
    Note,
    /// Replace your driver note.
    SaveNote {
        /// Note text.
        text: String,
    },
    /// Show season statistics.
    Stats,
    /// Register this install for push notifications.
    RegisterPush,
}

/// Race form fields.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct RaceArgs {
    /// Existing race id; omit to create a new race.
    #[arg(long, value_name = "id")]
    pub id: Option<String>,
    /// Race name.
    #[arg(long, default_value = "")]
    pub name: String,
    /// Race date.
    #[arg(long, default_value = "")]
    pub date: String,
    /// Race type, for example `championship`.
    #[arg(long = "type", value_name = "type")]
    pub kind: Option<String>,
    /// Championship round.
    #[arg(long = "number", value_name = "n")]
    pub race_number: Option<u32>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn global_credentials_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "paddock",
            "gallery",
            "--email",
            "fan@example.com",
            "--password",
            "secret1",
            "--json",
        ])
        .expect("arguments parse");
        assert_eq!(cli.command, Command::Gallery);
        assert_eq!(cli.email.as_deref(), Some("fan@example.com"));
        assert!(cli.json);
        assert!(!cli.offline);
    }

    #[rstest]
    fn save_race_accepts_optional_fields() {
        let cli = Cli::try_parse_from([
            "paddock",
            "save-race",
            "--name",
            "Dells",
            "--date",
            "2025-05-17",
            "--type",
            "special",
            "--number",
            "3",
        ])
        .expect("arguments parse");
        let Command::SaveRace(race) = cli.command else {
            panic!("expected save-race");
        };
        assert_eq!(race.kind.as_deref(), Some("special"));
        assert_eq!(race.race_number, Some(3));
        assert!(race.id.is_none());
    }

    #[rstest]
    fn upload_requires_a_path() {
        assert!(Cli::try_parse_from(["paddock", "upload"]).is_err());
    }
}
