//! Outbound delivery for SessionManager

use async_trait::async_trait;
use parlor_common::protocol::ServerMessage;
use tracing::debug;

use super::SessionManager;
use crate::broadcaster::Broadcaster;

impl SessionManager {
    /// Queue a message for one session
    ///
    /// Returns false if the session is gone or its channel is closed.
    pub async fn send_to_session(&self, session_id: u32, message: ServerMessage) -> bool {
        let sessions = self.sessions.read().await;
        let Some(session) = sessions.get(&session_id) else {
            debug!(session_id, "dropping {} for unknown session", message.type_name());
            return false;
        };

        if session.tx.send(message).is_err() {
            debug!(session_id, peer = %session.address, "dropping message for closed session");
            return false;
        }
        true
    }

    /// Queue a message for every connected session
    ///
    /// Returns the number of sessions it was queued for.
    pub async fn broadcast(&self, message: ServerMessage) -> usize {
        let sessions = self.sessions.read().await;
        let mut delivered = 0;
        for session in sessions.values() {
            // A closed channel means the connection is tearing down
            if session.tx.send(message.clone()).is_ok() {
                delivered += 1;
            } else {
                debug!(
                    session_id = session.session_id,
                    peer = %session.address,
                    "dropping {} for closed session",
                    message.type_name()
                );
            }
        }
        delivered
    }
}

#[async_trait]
impl Broadcaster for SessionManager {
    async fn send_to(&self, session_id: u32, message: ServerMessage) {
        self.send_to_session(session_id, message).await;
    }

    async fn send_to_all(&self, message: ServerMessage) {
        self.broadcast(message).await;
    }
}
