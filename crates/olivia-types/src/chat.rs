//! Chat turn and session snapshot types.
//!
//! A session's conversation is an append-only log of [`ChatTurn`]s, each
//! authored by either the user or the assistant and ordered by timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::identity::IdentityId;
use crate::llm::MessageRole;

/// Fixed assistant text substituted whenever a completion request fails.
pub const FALLBACK_REPLY: &str = "Oops, something went wrong. Try again?";

/// Namespace for deriving welcome-turn ids from identity ids (UUID v5).
const WELCOME_NAMESPACE: Uuid = Uuid::from_u128(0x6f6c_6976_6961_4000_8000_7765_6c63_6f6d);

/// Unique identifier for a chat turn.
///
/// Ordinary turns use UUID v7 (time-sortable). The synthetic welcome turn uses
/// a UUID v5 derived from the owning identity, so seeding it twice yields the
/// same id and the store can drop the duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub Uuid);

impl TurnId {
    /// Create a new time-sortable turn id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Deterministic id of the welcome turn for an identity.
    pub fn welcome_for(identity: &IdentityId) -> Self {
        Self(Uuid::new_v5(&WELCOME_NAMESPACE, identity.0.as_bytes()))
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TurnId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Role tag used when the turn is sent to the completion service.
    pub fn role(self) -> MessageRole {
        match self {
            Sender::User => MessageRole::User,
            Sender::Assistant => MessageRole::Assistant,
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "assistant" => Ok(Sender::Assistant),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// One immutable message in a chat exchange.
///
/// Serialized with both `sender` and the legacy `isFromUser` flag; either one
/// is accepted when reading, so records written by older clients round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ChatTurnRecord", try_from = "ChatTurnRecord")]
pub struct ChatTurn {
    pub id: TurnId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    /// Create a turn with a fresh id.
    pub fn new(text: impl Into<String>, sender: Sender, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: TurnId::new(),
            text: text.into(),
            sender,
            timestamp,
        }
    }

    /// The seeded assistant greeting for an identity.
    pub fn welcome(identity: &IdentityId, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: TurnId::welcome_for(identity),
            text: text.into(),
            sender: Sender::Assistant,
            timestamp,
        }
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Wire/persistence shape of a [`ChatTurn`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatTurnRecord {
    id: TurnId,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sender: Option<Sender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_from_user: Option<bool>,
    timestamp: DateTime<Utc>,
}

impl From<ChatTurn> for ChatTurnRecord {
    fn from(turn: ChatTurn) -> Self {
        Self {
            id: turn.id,
            text: turn.text,
            sender: Some(turn.sender),
            is_from_user: Some(turn.sender == Sender::User),
            timestamp: turn.timestamp,
        }
    }
}

impl TryFrom<ChatTurnRecord> for ChatTurn {
    type Error = String;

    fn try_from(record: ChatTurnRecord) -> Result<Self, Self::Error> {
        let sender = match (record.sender, record.is_from_user) {
            (Some(sender), _) => sender,
            (None, Some(true)) => Sender::User,
            (None, Some(false)) => Sender::Assistant,
            (None, None) => return Err("turn has neither `sender` nor `isFromUser`".to_string()),
        };

        Ok(Self {
            id: record.id,
            text: record.text,
            sender,
            timestamp: record.timestamp,
        })
    }
}

/// Display state of a live session: the ordered turn list and the busy flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub turns: Vec<ChatTurn>,
    pub pending: bool,
}
