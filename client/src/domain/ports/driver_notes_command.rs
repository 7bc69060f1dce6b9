//! Driving port for the signed-in user's driver note.

use async_trait::async_trait;

use crate::domain::{DriverNote, Error};

/// Driver note use-cases, always scoped to the signed-in user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriverNotesCommand: Send + Sync {
    /// Current note; blank when none has been saved.
    async fn load(&self) -> Result<DriverNote, Error>;

    /// Replace the note text.
    async fn save(&self, text: &str) -> Result<(), Error>;
}
