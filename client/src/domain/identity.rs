//! Identity primitives: user ids, credentials, and role claims.
//!
//! Keep raw form input outside the domain by exposing constructors that
//! validate strings before a service talks to the identity provider.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Minimum password length accepted by sign-up.
pub const PASSWORD_MIN: usize = 6;

/// Claim value that marks a trusted uploader.
pub const PRIVILEGED_ROLE: &str = "team-member";

/// Validation errors raised before any identity provider call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// User id was blank or padded with whitespace.
    #[error("user id must not be empty")]
    EmptyUserId,
    /// Email was missing or blank once trimmed.
    #[error("Email is required.")]
    EmptyEmail,
    /// Password was blank.
    #[error("Password is required.")]
    EmptyPassword,
    /// Sign-up password shorter than [`PASSWORD_MIN`].
    #[error("Password must be at least {min} characters.")]
    PasswordTooShort {
        /// Required minimum length.
        min: usize,
    },
}

/// Opaque identifier assigned by the identity provider.
///
/// Provider ids are not UUIDs, so the only invariant is a non-empty value
/// without surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let id = id.into();
        if id.trim().is_empty() || id.trim() != id {
            return Err(IdentityValidationError::EmptyUserId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Email and password pair used by sign-in and sign-up.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Credentials for signing in to an existing account.
    ///
    /// # Examples
    /// ```
    /// use paddock::domain::Credentials;
    ///
    /// let creds = Credentials::for_sign_in(" fan@example.com ", "pitlane").unwrap();
    /// assert_eq!(creds.email(), "fan@example.com");
    /// ```
    pub fn for_sign_in(email: &str, password: &str) -> Result<Self, IdentityValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        let password = password.trim();
        if password.is_empty() {
            return Err(IdentityValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Credentials for creating an account; also enforces [`PASSWORD_MIN`].
    pub fn for_sign_up(email: &str, password: &str) -> Result<Self, IdentityValidationError> {
        let credentials = Self::for_sign_in(email, password)?;
        if credentials.password.chars().count() < PASSWORD_MIN {
            return Err(IdentityValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(credentials)
    }

    /// Trimmed email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as typed, minus surrounding whitespace.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned id.
    pub uid: UserId,
    /// Account email, when the provider exposes one.
    pub email: Option<String>,
}

impl Identity {
    /// Build an identity from its parts.
    pub fn new(uid: UserId, email: Option<String>) -> Self {
        Self { uid, email }
    }
}

/// Closed set of role claims understood by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Racing team staff; uploads publish immediately.
    TeamMember,
    /// Site administrator; may moderate but uploads are still queued.
    Admin,
    /// Anyone else, including a missing or unrecognised claim.
    #[default]
    Fan,
}

impl Role {
    /// Interpret a raw claim value, failing closed to [`Role::Fan`].
    ///
    /// # Examples
    /// ```
    /// use paddock::domain::Role;
    ///
    /// assert_eq!(Role::from_claim(Some("team-member")), Role::TeamMember);
    /// assert_eq!(Role::from_claim(Some("Team-Member")), Role::Fan);
    /// assert_eq!(Role::from_claim(None), Role::Fan);
    /// ```
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim {
            Some(PRIVILEGED_ROLE) => Self::TeamMember,
            Some("admin") => Self::Admin,
            _ => Self::Fan,
        }
    }

    /// Whether uploads from this role skip the approval queue.
    pub fn trust(self) -> Trust {
        match self {
            Self::TeamMember => Trust::Trusted,
            Self::Admin | Self::Fan => Trust::Untrusted,
        }
    }

    /// Whether this role may approve or reject queued photos.
    pub fn can_moderate(self) -> bool {
        matches!(self, Self::TeamMember | Self::Admin)
    }
}

/// Routing decision derived from a [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trust {
    /// Publish directly with the approval flag set.
    Trusted,
    /// Queue for moderation without an approval flag.
    Untrusted,
}
