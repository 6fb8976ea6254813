//! Identity, account, and profile types.
//!
//! An [`Identity`] is the authenticated principal that owns a chat session.
//! The session holds a reference to it, never the credential.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for an authenticated identity, wrapping a UUID v7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityId(pub Uuid);

impl IdentityId {
    /// Create a new IdentityId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create an IdentityId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for IdentityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IdentityId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A resolved, signed-in principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub email: String,
}

/// A stored account record.
///
/// `password_hash` is a PHC-format string; the plaintext password never
/// leaves the account service.
#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: IdentityId,
    pub email: String,
    pub password_hash: String,
    pub onboarding_complete: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// The identity view of this account.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

// Manual Debug so the password hash never reaches logs.
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("onboarding_complete", &self.onboarding_complete)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// User-editable profile attached to an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub identity_id: IdentityId,
    pub name: String,
    /// Local path of the stored profile photo, if one was uploaded.
    pub profile_image_path: Option<String>,
}

impl UserProfile {
    /// Empty profile created alongside a new account.
    pub fn empty(identity_id: IdentityId) -> Self {
        Self {
            identity_id,
            name: String::new(),
            profile_image_path: None,
        }
    }
}

/// Top-level screen selected by the identity gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    /// Shown while the gate is still resolving.
    Splash,
    Onboarding,
    Auth,
    Chat,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Splash => write!(f, "splash"),
            Screen::Onboarding => write!(f, "onboarding"),
            Screen::Auth => write!(f, "auth"),
            Screen::Chat => write!(f, "chat"),
        }
    }
}
