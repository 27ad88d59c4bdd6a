//! Framing errors

use std::io;

use thiserror::Error;

/// Errors produced while reading or writing frames
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(String),
    /// Stream ended in the middle of a frame
    #[error("connection closed mid-frame")]
    ConnectionClosed,
    /// Frame exceeded `MAX_FRAME_LENGTH`
    #[error("frame too large")]
    FrameTooLarge,
    /// Frame payload is not valid UTF-8
    #[error("frame is not valid UTF-8")]
    InvalidUtf8,
    /// Frame payload contains a raw newline and cannot be written
    #[error("frame payload contains a newline")]
    EmbeddedNewline,
    /// Payload could not be parsed as a protocol message
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    /// Frame did not complete in time after its first byte
    #[error("timed out waiting for frame to complete")]
    FrameTimeout,
    /// No frame started within the idle timeout
    #[error("timed out waiting for data")]
    IdleTimeout,
}

impl From<io::Error> for FrameError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            FrameError::ConnectionClosed
        } else {
            FrameError::Io(err.to_string())
        }
    }
}
