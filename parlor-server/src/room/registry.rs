//! Presence registry
//!
//! Authoritative set of identities present in the room plus the state of the
//! liveness window. Plain data; [`Room`](super::Room) serializes access.

use std::collections::HashSet;

use super::identity;
use super::types::{Announcement, Roster, RoomError};

/// Result of recording a liveness assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepTicket {
    /// True if this call opened a new window
    pub opened: bool,
    /// Generation a scheduled sweep must match to run
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct PresenceRegistry {
    roster: Roster,
    asserted: HashSet<String>,
    window_open: bool,
    generation: u64,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current roster, in entry order
    pub fn snapshot(&self) -> Roster {
        self.roster.clone()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.roster.iter().any(|present| present == identity)
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Resolve a requested name against the live roster
    pub fn resolve_identity(&self, requested: &str) -> String {
        identity::resolve_identity(requested, &self.roster)
    }

    /// Add an identity to the roster
    ///
    /// Fails with [`RoomError::IdentityConflict`] if it is already present.
    /// An identity admitted while a liveness window is open counts as asserted.
    pub fn admit(&mut self, identity: String) -> Result<Announcement, RoomError> {
        if self.contains(&identity) {
            return Err(RoomError::IdentityConflict(identity));
        }

        if self.window_open {
            self.asserted.insert(identity.clone());
        }
        self.roster.push(identity.clone());

        Ok(Announcement::entered(identity, self.snapshot()))
    }

    /// Remove an identity from the roster
    ///
    /// Returns `None` if it was not present.
    pub fn dismiss(&mut self, identity: &str) -> Option<Announcement> {
        let position = self.roster.iter().position(|present| present == identity)?;
        let subject = self.roster.remove(position);
        self.asserted.remove(&subject);

        Some(Announcement::left(subject, self.snapshot()))
    }

    pub fn is_window_open(&self) -> bool {
        self.window_open
    }

    /// Record a liveness assertion and open the window if none is pending
    ///
    /// `asserter` is `None` when the trigger was a disconnect rather than a
    /// live session answering a probe. Every call starts a new generation, so
    /// only the sweep scheduled by the latest call is allowed to run.
    pub fn record_assertion(&mut self, asserter: Option<&str>) -> SweepTicket {
        let opened = !self.window_open;
        self.window_open = true;

        if let Some(identity) = asserter {
            self.asserted.insert(identity.to_string());
        }

        self.generation = self.generation.wrapping_add(1);
        SweepTicket {
            opened,
            generation: self.generation,
        }
    }

    /// Dismiss every identity that did not assert during the window
    ///
    /// Returns `None` without touching anything if `generation` has been
    /// superseded by a later assertion. Otherwise returns one `left`
    /// announcement per dismissed identity (each carrying the roster right
    /// after that removal), then clears the assertions and closes the window.
    pub fn sweep(&mut self, generation: u64) -> Option<Vec<Announcement>> {
        if !self.window_open || generation != self.generation {
            return None;
        }

        let stale: Vec<String> = self
            .roster
            .iter()
            .filter(|identity| !self.asserted.contains(*identity))
            .cloned()
            .collect();

        let announcements = stale
            .iter()
            .filter_map(|identity| self.dismiss(identity))
            .collect();

        self.asserted.clear();
        self.window_open = false;

        Some(announcements)
    }
}
