//! Room types
//!
//! Value types shared by the presence registry and the handlers.

use std::time::Duration;

use parlor_common::DEFAULT_SWEEP_INTERVAL_MS;
use parlor_common::protocol::ServerMessage;
use thiserror::Error;

/// Ordered list of present identities, in entry order
pub type Roster = Vec<String>;

/// Which way an announcement goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementKind {
    Entered,
    Left,
}

/// A roster change, produced at the moment of mutation and broadcast once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub kind: AnnouncementKind,
    /// Identity that entered or left
    pub subject: String,
    /// Roster after the change
    pub roster: Roster,
}

impl Announcement {
    pub fn entered(subject: String, roster: Roster) -> Self {
        Self {
            kind: AnnouncementKind::Entered,
            subject,
            roster,
        }
    }

    pub fn left(subject: String, roster: Roster) -> Self {
        Self {
            kind: AnnouncementKind::Left,
            subject,
            roster,
        }
    }

    /// Convert to the outbound protocol event
    pub fn into_message(self) -> ServerMessage {
        match self.kind {
            AnnouncementKind::Entered => ServerMessage::Entered {
                subject: self.subject,
                roster: self.roster,
            },
            AnnouncementKind::Left => ServerMessage::Left {
                subject: self.subject,
                roster: self.roster,
            },
        }
    }
}

/// Errors from room operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// The identity was taken between resolution and admission
    #[error("identity '{0}' is already present in the room")]
    IdentityConflict(String),
    /// The session has not completed entry
    #[error("session has not entered the room")]
    NotEntered,
}

/// Room-level settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomConfig {
    /// Debounce window of the liveness sweep
    pub sweep_interval: Duration,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS),
        }
    }
}
