//! Mutation methods for SessionManager

use super::SessionManager;
use crate::room::Roster;
use crate::sessions::session::{NewSessionParams, Session};

impl SessionManager {
    /// Register a new connection and return its session ID
    pub async fn add_session(&self, params: NewSessionParams) -> u32 {
        let mut sessions = self.sessions.write().await;
        let session_id = self.next_session_id();
        sessions.insert(session_id, Session::new(session_id, params));
        session_id
    }

    /// Remove a session by ID
    pub async fn remove_session(&self, session_id: u32) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&session_id)
    }

    /// Bind an admitted identity to a session
    ///
    /// Returns false if the session is gone.
    pub async fn bind_identity(&self, session_id: u32, identity: String) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session_id) {
            Some(session) => {
                session.identity = Some(identity);
                true
            }
            None => false,
        }
    }

    /// Unbind an identity from whichever session holds it
    ///
    /// Used when the room dismisses an identity whose connection is still
    /// open, so that the connection's eventual disconnect cannot dismiss a
    /// later holder of the same name. Returns the affected session IDs.
    pub async fn clear_identity(&self, identity: &str) -> Vec<u32> {
        let mut sessions = self.sessions.write().await;
        sessions
            .values_mut()
            .filter(|session| session.identity.as_deref() == Some(identity))
            .map(|session| {
                session.identity = None;
                session.session_id
            })
            .collect()
    }

    /// Take the roster remembered for a session, leaving it empty
    pub async fn take_observed_roster(&self, session_id: u32) -> Roster {
        let mut sessions = self.sessions.write().await;
        sessions
            .get_mut(&session_id)
            .map(|session| std::mem::take(&mut session.observed_roster))
            .unwrap_or_default()
    }

    /// Remember the roster most recently shown to a session
    pub async fn record_observed_roster(&self, session_id: u32, roster: Roster) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&session_id) {
            session.observed_roster = roster;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::sync::mpsc;

    fn params() -> NewSessionParams {
        let (tx, _rx) = mpsc::unbounded_channel();
        NewSessionParams {
            address: SocketAddr::from(([127, 0, 0, 1], 40000)),
            tx,
        }
    }

    #[tokio::test]
    async fn test_session_ids_are_unique() {
        let manager = SessionManager::new();

        let first = manager.add_session(params()).await;
        let second = manager.add_session(params()).await;
        assert_ne!(first, second);
        assert_eq!(manager.session_count().await, 2);
    }

    #[tokio::test]
    async fn test_remove_session() {
        let manager = SessionManager::new();
        let id = manager.add_session(params()).await;

        let removed = manager.remove_session(id).await.unwrap();
        assert_eq!(removed.session_id, id);
        assert!(manager.remove_session(id).await.is_none());
        assert_eq!(manager.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_bind_identity() {
        let manager = SessionManager::new();
        let id = manager.add_session(params()).await;
        assert!(manager.identity_of(id).await.is_none());

        assert!(manager.bind_identity(id, "Bob".to_string()).await);
        assert_eq!(manager.identity_of(id).await.as_deref(), Some("Bob"));

        assert!(!manager.bind_identity(999, "Ann".to_string()).await);
    }

    #[tokio::test]
    async fn test_clear_identity() {
        let manager = SessionManager::new();
        let bob = manager.add_session(params()).await;
        let ann = manager.add_session(params()).await;
        manager.bind_identity(bob, "Bob".to_string()).await;
        manager.bind_identity(ann, "Ann".to_string()).await;

        assert_eq!(manager.clear_identity("Bob").await, vec![bob]);
        assert!(manager.identity_of(bob).await.is_none());
        assert_eq!(manager.identity_of(ann).await.as_deref(), Some("Ann"));
        assert!(manager.clear_identity("Bob").await.is_empty());
    }

    #[tokio::test]
    async fn test_record_observed_roster() {
        let manager = SessionManager::new();
        let id = manager.add_session(params()).await;
        assert!(manager.observed_roster(id).await.is_empty());

        manager
            .record_observed_roster(id, vec!["Bob".to_string()])
            .await;
        assert_eq!(manager.observed_roster(id).await, vec!["Bob".to_string()]);

        assert_eq!(
            manager.take_observed_roster(id).await,
            vec!["Bob".to_string()]
        );
        assert!(manager.observed_roster(id).await.is_empty());
    }
}
