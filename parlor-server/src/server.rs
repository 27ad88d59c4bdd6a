//! Listener accept loops
//!
//! Shared by the binary and the integration tests: bind a listener, build a
//! [`ServerState`], and run [`serve`] until it is cancelled.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::connection::{ConnectionParams, handle_connection};
use crate::connection_tracker::ConnectionTracker;
use crate::constants::{ERR_ACCEPT, ERR_CONNECTION_LIMIT};
use crate::room::{Room, RoomConfig};
use crate::sessions::SessionManager;
use crate::websocket::handle_websocket_connection;

/// Which protocol a listener speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Newline-delimited JSON over plain TCP
    Tcp,
    /// One JSON frame per WebSocket message
    WebSocket,
}

/// Everything connection tasks share
#[derive(Debug, Clone)]
pub struct ServerState {
    pub room: Room,
    pub sessions: SessionManager,
    pub connection_tracker: Arc<ConnectionTracker>,
}

impl ServerState {
    pub fn new(room_config: RoomConfig, max_connections_per_ip: usize) -> Self {
        Self {
            room: Room::new(room_config),
            sessions: SessionManager::new(),
            connection_tracker: Arc::new(ConnectionTracker::new(max_connections_per_ip)),
        }
    }
}

/// Accept connections forever, one task per connection
///
/// Connections over the per-IP limit are dropped before any protocol
/// exchange. Accept errors are logged and the loop keeps going.
pub async fn serve(listener: TcpListener, state: ServerState, transport: Transport) {
    loop {
        let (socket, peer_addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("{ERR_ACCEPT}{e}");
                continue;
            }
        };

        let Some(guard) = state.connection_tracker.try_acquire(peer_addr.ip()) else {
            debug!("{ERR_CONNECTION_LIMIT}{}", peer_addr.ip());
            // Client sees the connection reset
            continue;
        };

        let params = ConnectionParams {
            peer_addr,
            room: state.room.clone(),
            sessions: state.sessions.clone(),
        };

        tokio::spawn(async move {
            // Hold the slot until the connection ends
            let _guard = guard;
            debug!(peer = %peer_addr, ?transport, "accepted connection");

            let result = match transport {
                Transport::Tcp => handle_connection(socket, params).await,
                Transport::WebSocket => handle_websocket_connection(socket, params).await,
            };
            log_connection_result(peer_addr, result);
        });
    }
}

/// Log how a connection task finished
fn log_connection_result(peer_addr: SocketAddr, result: io::Result<()>) {
    match result {
        Ok(()) => debug!(peer = %peer_addr, "connection finished"),
        // Handshake failures are mostly scanners and stray HTTP requests
        Err(e) if e.to_string().contains("handshake failed") => {
            debug!(peer = %peer_addr, "connection error: {e}")
        }
        Err(e) => info!(peer = %peer_addr, "connection error: {e}"),
    }
}
