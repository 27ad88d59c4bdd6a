//! Query methods for SessionManager

use super::SessionManager;
use crate::room::Roster;

impl SessionManager {
    /// Identity bound to a session, if it has entered
    pub async fn identity_of(&self, session_id: u32) -> Option<String> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .and_then(|session| session.identity.clone())
    }

    /// Roster last shown to a session (empty if unknown)
    pub async fn observed_roster(&self, session_id: u32) -> Roster {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .map(|session| session.observed_roster.clone())
            .unwrap_or_default()
    }

    /// Number of connected sessions, entered or not
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of sessions that have entered the room
    pub async fn entered_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.values().filter(|s| s.has_entered()).count()
    }
}
