//! Protocol definitions for Parlor
//!
//! All messages are sent as newline-delimited JSON objects, internally tagged
//! by a `"type"` field. See [`crate::framing`] for the line format.

use serde::{Deserialize, Serialize};

/// A chat message as composed by a client
///
/// The server relays it verbatim: `author` and `sent_at` are whatever the
/// client supplied and are never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Display name of the sender
    pub author: String,
    /// Message text
    pub body: String,
    /// Client-formatted send time (opaque to the server)
    pub sent_at: String,
}

/// Client request messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Entry request with the name the user typed
    Entered { name: String },
    /// Chat message to relay to the whole room
    ChatMessage(ChatMessage),
    /// Answer to a `LivenessProbe`: "I am still here"
    LivenessAssertion { identity: String },
}

/// Server messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Current roster, sent once to a freshly connected session
    RosterSnapshot { roster: Vec<String> },
    /// Someone entered the room
    Entered { subject: String, roster: Vec<String> },
    /// Someone left the room
    Left { subject: String, roster: Vec<String> },
    /// Relayed chat message
    ChatMessage(ChatMessage),
    /// Every live session should reply with a `LivenessAssertion`
    LivenessProbe,
    /// Entry request could not be completed (sent to the requester only)
    EntryRejected { error: String },
    /// Protocol error, the connection is closed afterwards
    Error { message: String },
}

impl ClientMessage {
    /// Wire name of the message type, used for logging
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Entered { .. } => "Entered",
            Self::ChatMessage(_) => "ChatMessage",
            Self::LivenessAssertion { .. } => "LivenessAssertion",
        }
    }
}

impl ServerMessage {
    /// Wire name of the message type, used for logging
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RosterSnapshot { .. } => "RosterSnapshot",
            Self::Entered { .. } => "Entered",
            Self::Left { .. } => "Left",
            Self::ChatMessage(_) => "ChatMessage",
            Self::LivenessProbe => "LivenessProbe",
            Self::EntryRejected { .. } => "EntryRejected",
            Self::Error { .. } => "Error",
        }
    }
}
