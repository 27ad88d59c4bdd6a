//! Raw frame type

use super::TERMINATOR;
use super::error::FrameError;

/// A single frame: the payload bytes of one line, without the terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub payload: Vec<u8>,
}

impl RawFrame {
    /// Create a frame from payload bytes
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }

    /// Payload as UTF-8 text
    pub fn as_str(&self) -> Result<&str, FrameError> {
        std::str::from_utf8(&self.payload).map_err(|_| FrameError::InvalidUtf8)
    }

    /// Serialize to wire bytes (payload followed by the terminator)
    pub fn to_bytes(&self) -> Result<Vec<u8>, FrameError> {
        if self.payload.contains(&TERMINATOR) {
            return Err(FrameError::EmbeddedNewline);
        }
        let mut bytes = Vec::with_capacity(self.payload.len() + 1);
        bytes.extend_from_slice(&self.payload);
        bytes.push(TERMINATOR);
        Ok(bytes)
    }
}
