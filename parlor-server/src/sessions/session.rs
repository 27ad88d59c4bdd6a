//! Per-connection session state

use std::net::SocketAddr;

use parlor_common::protocol::ServerMessage;
use tokio::sync::mpsc;

use crate::room::Roster;

/// Parameters for registering a new connection
pub struct NewSessionParams {
    pub address: SocketAddr,
    pub tx: mpsc::UnboundedSender<ServerMessage>,
}

/// A connected client, entered or not
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (unique identifier for this connection)
    pub session_id: u32,
    /// Remote address of the connection
    pub address: SocketAddr,
    /// Identity bound on entry; `None` until the session has entered
    pub identity: Option<String>,
    /// Roster this session was last shown, used to resolve its requested name
    pub observed_roster: Roster,
    /// Channel sender for outbound events
    pub tx: mpsc::UnboundedSender<ServerMessage>,
}

impl Session {
    pub fn new(session_id: u32, params: NewSessionParams) -> Self {
        Self {
            session_id,
            address: params.address,
            identity: None,
            observed_roster: Vec::new(),
            tx: params.tx,
        }
    }

    pub fn has_entered(&self) -> bool {
        self.identity.is_some()
    }
}
