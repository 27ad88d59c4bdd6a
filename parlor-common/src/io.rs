//! I/O utilities for sending and receiving protocol messages
//!
//! This module is the bridge between the protocol message types
//! (`ClientMessage`, `ServerMessage`) and the wire format (framing).

use std::io;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufRead, AsyncWriteExt};

use crate::framing::{
    DEFAULT_FRAME_TIMEOUT, DEFAULT_IDLE_TIMEOUT, FrameError, FrameReader, FrameWriter, RawFrame,
};
use crate::protocol::{ClientMessage, ServerMessage};

// =============================================================================
// Error Conversion
// =============================================================================

impl From<FrameError> for io::Error {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Io(msg) => io::Error::other(msg),
            FrameError::ConnectionClosed => {
                io::Error::new(io::ErrorKind::ConnectionReset, "connection closed")
            }
            FrameError::FrameTimeout | FrameError::IdleTimeout => {
                io::Error::new(io::ErrorKind::TimedOut, err.to_string())
            }
            other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}

// =============================================================================
// Message Sending
// =============================================================================

/// Send a `ClientMessage` to the server
pub async fn send_client_message<W>(
    writer: &mut FrameWriter<W>,
    message: &ClientMessage,
) -> io::Result<()>
where
    W: AsyncWriteExt + Unpin,
{
    write_message(writer, message).await
}

/// Send a `ServerMessage` to a client
pub async fn send_server_message<W>(
    writer: &mut FrameWriter<W>,
    message: &ServerMessage,
) -> io::Result<()>
where
    W: AsyncWriteExt + Unpin,
{
    write_message(writer, message).await
}

async fn write_message<W, M>(writer: &mut FrameWriter<W>, message: &M) -> io::Result<()>
where
    W: AsyncWriteExt + Unpin,
    M: Serialize,
{
    let payload =
        serde_json::to_vec(message).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writer
        .write_frame(&RawFrame::new(payload))
        .await
        .map_err(Into::into)
}

// =============================================================================
// Message Receiving
// =============================================================================

/// Read a `ClientMessage` from the stream
///
/// Returns `Ok(None)` if the connection was cleanly closed.
///
/// # Note
///
/// This method has no timeout - it will wait indefinitely for data.
/// For production use, prefer [`read_client_message_with_timeout`].
pub async fn read_client_message<R>(
    reader: &mut FrameReader<R>,
) -> Result<Option<ClientMessage>, FrameError>
where
    R: AsyncBufRead + Unpin,
{
    let Some(frame) = reader.read_frame().await? else {
        return Ok(None);
    };

    parse_frame(&frame).map(Some)
}

/// Read a `ClientMessage` with the default per-frame timeout
///
/// Waits indefinitely for the first byte (entered sessions may idle), but a
/// started frame must complete within 60 seconds.
///
/// Returns `Ok(None)` if the connection was cleanly closed.
pub async fn read_client_message_with_timeout<R>(
    reader: &mut FrameReader<R>,
) -> Result<Option<ClientMessage>, FrameError>
where
    R: AsyncBufRead + Unpin,
{
    let Some(frame) = reader
        .read_frame_with_timeout(DEFAULT_FRAME_TIMEOUT)
        .await?
    else {
        return Ok(None);
    };

    parse_frame(&frame).map(Some)
}

/// Read a `ClientMessage` with a full timeout (no idling allowed)
///
/// Used before a session has entered the room so that silent connections
/// do not hold a slot forever.
///
/// # Arguments
///
/// * `reader` - The frame reader to read from
/// * `idle_timeout` - Maximum time to wait for the first byte (defaults to 30 seconds)
/// * `frame_timeout` - Maximum time to complete the frame after the first byte (defaults to 60 seconds)
pub async fn read_client_message_with_full_timeout<R>(
    reader: &mut FrameReader<R>,
    idle_timeout: Option<Duration>,
    frame_timeout: Option<Duration>,
) -> Result<Option<ClientMessage>, FrameError>
where
    R: AsyncBufRead + Unpin,
{
    let idle = idle_timeout.unwrap_or(DEFAULT_IDLE_TIMEOUT);
    let frame_time = frame_timeout.unwrap_or(DEFAULT_FRAME_TIMEOUT);

    let Some(frame) = reader.read_frame_with_full_timeout(idle, frame_time).await? else {
        return Ok(None);
    };

    parse_frame(&frame).map(Some)
}

/// Read a `ServerMessage` from the stream
///
/// Returns `Ok(None)` if the connection was cleanly closed.
pub async fn read_server_message<R>(
    reader: &mut FrameReader<R>,
) -> Result<Option<ServerMessage>, FrameError>
where
    R: AsyncBufRead + Unpin,
{
    let Some(frame) = reader.read_frame().await? else {
        return Ok(None);
    };

    parse_frame(&frame).map(Some)
}

fn parse_frame<M: DeserializeOwned>(frame: &RawFrame) -> Result<M, FrameError> {
    let text = frame.as_str()?;
    serde_json::from_str(text).map_err(|e| FrameError::InvalidJson(e.to_string()))
}
