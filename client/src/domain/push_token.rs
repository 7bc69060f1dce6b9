//! Push notification registration tokens.

use std::fmt;

use super::document::{Document, Field, RecordId};
use super::identity::UserId;

/// Per-install token issued by the push relay.
///
/// The token doubles as the record id, so it must be non-empty and free of
/// path separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PushToken(RecordId);

impl PushToken {
    /// Validate a raw token.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        RecordId::new(raw.into().trim()).map(Self)
    }

    /// Record id the token is stored under.
    pub fn record_id(&self) -> &RecordId {
        &self.0
    }

    /// Store representation for a registration by `owner`.
    pub fn registration_document(owner: &UserId) -> Document {
        Document::new()
            .with("uid", owner.as_ref())
            .with("timestamp", Field::ServerTimestamp)
    }
}

impl AsRef<str> for PushToken {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl fmt::Display for PushToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tokens are credentials for the relay; only show a prefix.
        let prefix: String = self.0.as_ref().chars().take(8).collect();
        write!(f, "{prefix}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tokens_are_rejected() {
        assert!(PushToken::new("   ").is_none());
        assert!(PushToken::new("a/b").is_none());
    }

    #[test]
    fn display_redacts_token() {
        let token = PushToken::new("abcdefghijklmnop").expect("token");
        assert_eq!(token.to_string(), "abcdefgh…");
        assert_eq!(token.as_ref(), "abcdefghijklmnop");
    }
}
