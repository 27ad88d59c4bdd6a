//! Client connection handling

use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use parlor_common::framing::{FrameError, FrameReader, FrameWriter};
use parlor_common::io::{
    read_client_message_with_full_timeout, read_client_message_with_timeout, send_server_message,
};
use parlor_common::protocol::{ClientMessage, ServerMessage};

use crate::broadcaster::Broadcaster;
use crate::handlers::{self, HandlerContext, err_invalid_message};
use crate::room::Room;
use crate::sessions::{NewSessionParams, SessionManager};

/// Parameters for handling a connection
pub struct ConnectionParams {
    pub peer_addr: SocketAddr,
    pub room: Room,
    pub sessions: SessionManager,
}

/// Handle a client connection over any byte stream
///
/// Registers a session, sends the roster snapshot, then multiplexes incoming
/// frames with outbound events until either side goes away. On exit the
/// session is removed before the disconnect handler runs.
pub async fn handle_connection<S>(socket: S, params: ConnectionParams) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let ConnectionParams {
        peer_addr,
        room,
        sessions,
    } = params;

    let (reader, writer) = tokio::io::split(socket);
    let mut frame_reader = FrameReader::new(BufReader::new(reader));
    let mut frame_writer = FrameWriter::new(writer);

    // Outbound events for this client
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let session_id = sessions
        .add_session(NewSessionParams {
            address: peer_addr,
            tx,
        })
        .await;
    debug!(session_id, peer = %peer_addr, "session opened");

    let ctx = HandlerContext {
        session_id,
        peer_addr,
        room: &room,
        sessions: &sessions,
        broadcaster: &sessions,
    };

    if let Err(e) = handlers::handle_connect(&ctx).await {
        sessions.remove_session(session_id).await;
        return Err(e);
    }

    loop {
        // Before entry: 30s idle + 60s frame timeout so silent connections
        // do not hold a slot. After entry: idle indefinitely.
        let has_entered = sessions.identity_of(session_id).await.is_some();

        tokio::select! {
            result = async {
                if has_entered {
                    read_client_message_with_timeout(&mut frame_reader).await
                } else {
                    read_client_message_with_full_timeout(&mut frame_reader, None, None).await
                }
            } => {
                match result {
                    Ok(Some(message)) => {
                        if let Err(e) = handle_client_message(message, &ctx).await {
                            warn!(session_id, peer = %peer_addr, "error handling message: {e}");
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        // Timeouts and dropped sockets are routine
                        if matches!(
                            e,
                            FrameError::FrameTimeout
                                | FrameError::IdleTimeout
                                | FrameError::ConnectionClosed
                        ) {
                            debug!(session_id, peer = %peer_addr, "closing connection: {e}");
                        } else {
                            warn!(session_id, peer = %peer_addr, "failed to read message: {e}");
                        }

                        // Try to tell the client before disconnecting
                        let error = ServerMessage::Error {
                            message: err_invalid_message(&e.to_string()),
                        };
                        let _ = send_server_message(&mut frame_writer, &error).await;
                        break;
                    }
                }
            }

            message = rx.recv() => {
                match message {
                    Some(message) => {
                        if let Err(e) = send_server_message(&mut frame_writer, &message).await {
                            debug!(session_id, peer = %peer_addr, "write failed: {e}");
                            break;
                        }
                    }
                    // Session was removed from the manager
                    None => break,
                }
            }
        }
    }

    let _ = frame_writer.get_mut().shutdown().await;

    let identity = sessions
        .remove_session(session_id)
        .await
        .and_then(|session| session.identity);
    debug!(session_id, peer = %peer_addr, identity = ?identity, "session closed");

    handlers::handle_disconnect(identity, &ctx).await;

    Ok(())
}

/// Dispatch a decoded client message to its handler
async fn handle_client_message<B>(
    message: ClientMessage,
    ctx: &HandlerContext<'_, B>,
) -> io::Result<()>
where
    B: Broadcaster + Clone + 'static,
{
    debug!(session_id = ctx.session_id, "received {}", message.type_name());

    match message {
        ClientMessage::Entered { name } => handlers::handle_entry_request(name, ctx).await,
        ClientMessage::ChatMessage(chat) => handlers::handle_chat_message(chat, ctx).await,
        ClientMessage::LivenessAssertion { identity } => {
            handlers::handle_liveness_assertion(identity, ctx).await
        }
    }
}
