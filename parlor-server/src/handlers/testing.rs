//! Shared test utilities for handler tests

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use parlor_common::protocol::ServerMessage;

use super::{HandlerContext, handle_connect, handle_entry_request};
use crate::broadcaster::Broadcaster;
use crate::room::{Room, RoomConfig};
use crate::sessions::{NewSessionParams, SessionManager};

/// Sweep interval used by handler tests
pub const TEST_SWEEP_INTERVAL: Duration = Duration::from_millis(500);

/// A connected test session and its outbound queue
pub struct TestPeer {
    pub session_id: u32,
    pub rx: mpsc::UnboundedReceiver<ServerMessage>,
}

/// Test context that owns all resources needed for handler testing
pub struct TestContext {
    pub room: Room,
    pub sessions: SessionManager,
    pub peer_addr: SocketAddr,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            room: Room::new(RoomConfig {
                sweep_interval: TEST_SWEEP_INTERVAL,
            }),
            sessions: SessionManager::new(),
            peer_addr: "127.0.0.1:12345".parse().unwrap(),
        }
    }

    /// Create a HandlerContext for a peer, delivering through the session manager
    pub fn handler_context(&self, peer: &TestPeer) -> HandlerContext<'_, SessionManager> {
        self.handler_context_with(peer, &self.sessions)
    }

    /// Create a HandlerContext for a peer with a custom broadcaster
    pub fn handler_context_with<'a, B>(
        &'a self,
        peer: &TestPeer,
        broadcaster: &'a B,
    ) -> HandlerContext<'a, B> {
        HandlerContext {
            session_id: peer.session_id,
            peer_addr: self.peer_addr,
            room: &self.room,
            sessions: &self.sessions,
            broadcaster,
        }
    }

    /// Register a session and run the connect handler for it
    ///
    /// The roster snapshot stays in the peer's queue.
    pub async fn connect(&self) -> TestPeer {
        let (tx, rx) = mpsc::unbounded_channel();
        let session_id = self
            .sessions
            .add_session(NewSessionParams {
                address: self.peer_addr,
                tx,
            })
            .await;

        let peer = TestPeer { session_id, rx };
        handle_connect(&self.handler_context(&peer)).await.unwrap();
        peer
    }

    /// Enter the room as `name` and return the bound identity
    ///
    /// Drains the peer's queue, so only events after entry remain.
    pub async fn enter(&self, peer: &mut TestPeer, name: &str) -> String {
        handle_entry_request(name.to_string(), &self.handler_context(peer))
            .await
            .unwrap();
        drain(&mut peer.rx);
        self.sessions
            .identity_of(peer.session_id)
            .await
            .expect("entry should bind an identity")
    }

    /// Remove a peer's session the way the connection loop does
    ///
    /// Returns the identity it held, for passing on to `handle_disconnect`.
    pub async fn disconnect(&self, peer: &TestPeer) -> Option<String> {
        self.sessions
            .remove_session(peer.session_id)
            .await
            .and_then(|session| session.identity)
    }
}

/// Collect everything currently queued for a peer
pub fn drain(rx: &mut mpsc::UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

/// Let spawned tasks (sweep evaluations) run to completion
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Where a recorded message was addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Session(u32),
    All,
}

/// Broadcaster that records calls instead of delivering them
#[derive(Debug, Clone, Default)]
pub struct RecordingBroadcaster {
    sent: Arc<Mutex<Vec<(Target, ServerMessage)>>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order
    pub fn sent(&self) -> Vec<(Target, ServerMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Broadcaster for RecordingBroadcaster {
    async fn send_to(&self, session_id: u32, message: ServerMessage) {
        self.sent
            .lock()
            .unwrap()
            .push((Target::Session(session_id), message));
    }

    async fn send_to_all(&self, message: ServerMessage) {
        self.sent.lock().unwrap().push((Target::All, message));
    }
}
