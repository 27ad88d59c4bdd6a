//! Shared helpers for integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{BufReader, ReadHalf, WriteHalf};
use tokio::net::{TcpListener, TcpStream};

use parlor_common::framing::{FrameReader, FrameWriter};
use parlor_common::io::{read_server_message, send_client_message};
use parlor_common::protocol::{ChatMessage, ClientMessage, ServerMessage};
use parlor_server::room::RoomConfig;
use parlor_server::server::{ServerState, Transport, serve};

/// Sweep window used by integration tests
pub const SWEEP_INTERVAL: Duration = Duration::from_millis(100);

/// How long to wait for an expected message
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Start a server on an ephemeral loopback port
pub async fn start_server(
    transport: Transport,
    max_connections_per_ip: usize,
) -> (SocketAddr, ServerState) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    let state = ServerState::new(
        RoomConfig {
            sweep_interval: SWEEP_INTERVAL,
        },
        max_connections_per_ip,
    );
    tokio::spawn(serve(listener, state.clone(), transport));

    (addr, state)
}

/// Start a TCP and a WebSocket listener sharing one room
///
/// Returns `(tcp_addr, ws_addr, state)`.
pub async fn start_dual_server() -> (SocketAddr, SocketAddr, ServerState) {
    let (tcp_addr, state) = start_server(Transport::Tcp, 0).await;

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let ws_addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(serve(listener, state.clone(), Transport::WebSocket));

    (tcp_addr, ws_addr, state)
}

/// A line-protocol client over TCP
pub struct TestClient {
    pub reader: FrameReader<BufReader<ReadHalf<TcpStream>>>,
    pub writer: FrameWriter<WriteHalf<TcpStream>>,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr)
            .await
            .expect("Failed to connect to test server");
        let (reader, writer) = tokio::io::split(stream);
        Self {
            reader: FrameReader::new(BufReader::new(reader)),
            writer: FrameWriter::new(writer),
        }
    }

    /// Connect and consume the roster snapshot
    pub async fn connect_with_snapshot(addr: SocketAddr) -> (Self, Vec<String>) {
        let mut client = Self::connect(addr).await;
        match client.recv().await {
            ServerMessage::RosterSnapshot { roster } => (client, roster),
            other => panic!("expected RosterSnapshot, got {other:?}"),
        }
    }

    pub async fn send(&mut self, message: ClientMessage) {
        send_client_message(&mut self.writer, &message)
            .await
            .expect("Failed to send");
    }

    pub async fn enter(&mut self, name: &str) {
        self.send(ClientMessage::Entered {
            name: name.to_string(),
        })
        .await;
    }

    pub async fn assert_alive(&mut self, identity: &str) {
        self.send(ClientMessage::LivenessAssertion {
            identity: identity.to_string(),
        })
        .await;
    }

    pub async fn chat(&mut self, author: &str, body: &str) -> ChatMessage {
        let message = ChatMessage {
            author: author.to_string(),
            body: body.to_string(),
            sent_at: "12:00:00 PM".to_string(),
        };
        self.send(ClientMessage::ChatMessage(message.clone())).await;
        message
    }

    /// Next message, failing the test after a timeout
    pub async fn recv(&mut self) -> ServerMessage {
        tokio::time::timeout(RECV_TIMEOUT, read_server_message(&mut self.reader))
            .await
            .expect("Timed out waiting for server message")
            .expect("Failed to read server message")
            .expect("Connection closed unexpectedly")
    }

    /// Assert nothing arrives within `wait`
    pub async fn expect_silence(&mut self, wait: Duration) {
        let result = tokio::time::timeout(wait, read_server_message(&mut self.reader)).await;
        if let Ok(result) = result {
            panic!("expected no message, got {result:?}");
        }
    }

    /// Whether the server closed the connection
    pub async fn is_closed(&mut self) -> bool {
        matches!(
            tokio::time::timeout(RECV_TIMEOUT, read_server_message(&mut self.reader)).await,
            Ok(Ok(None)) | Ok(Err(_))
        )
    }
}

pub fn roster(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

pub fn entered(subject: &str, names: &[&str]) -> ServerMessage {
    ServerMessage::Entered {
        subject: subject.to_string(),
        roster: roster(names),
    }
}

pub fn left(subject: &str, names: &[&str]) -> ServerMessage {
    ServerMessage::Left {
        subject: subject.to_string(),
        roster: roster(names),
    }
}
