//! Event handlers for client messages and connection lifecycle
//!
//! The connection loop decodes one event at a time and dispatches it here.
//! Handlers mutate the room and push the resulting events through the
//! [`Broadcaster`]; they never write to a socket.

mod chat;
mod connect;
mod disconnect;
mod entry;
pub mod errors;
mod liveness;

#[cfg(test)]
pub mod testing;

pub use chat::handle_chat_message;
pub use connect::handle_connect;
pub use disconnect::handle_disconnect;
pub use entry::handle_entry_request;
pub use errors::*;
pub use liveness::handle_liveness_assertion;

use std::net::SocketAddr;

use parlor_common::protocol::ServerMessage;

use crate::broadcaster::Broadcaster;
use crate::room::Room;
use crate::sessions::SessionManager;

/// Context passed to all handlers with shared resources
pub struct HandlerContext<'a, B> {
    /// Session the event belongs to
    pub session_id: u32,
    pub peer_addr: SocketAddr,
    pub room: &'a Room,
    pub sessions: &'a SessionManager,
    /// Outbound delivery (the session manager in production)
    pub broadcaster: &'a B,
}

impl<B: Broadcaster> HandlerContext<'_, B> {
    /// Send a message to this session only
    pub async fn reply(&self, message: ServerMessage) {
        self.broadcaster.send_to(self.session_id, message).await;
    }

    /// Send a message to every connected session
    pub async fn broadcast(&self, message: ServerMessage) {
        self.broadcaster.send_to_all(message).await;
    }
}
