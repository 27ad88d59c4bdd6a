//! Frame reader for parsing protocol lines from a stream
//!
//! All read methods are cancel safe: a partially received line is kept in
//! the reader, so dropping a read future (for example when another branch of
//! a `select!` wins) loses no bytes. The next call picks up where the last one
//! stopped, and a started frame keeps its original deadline.

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tokio::time::{Instant, timeout, timeout_at};

use super::error::FrameError;
use super::frame::RawFrame;
use super::{MAX_FRAME_LENGTH, TERMINATOR};

/// Reads protocol frames from a buffered async reader
pub struct FrameReader<R> {
    reader: R,
    /// Bytes of the line currently being received
    partial: Vec<u8>,
    /// When the frame in `partial` must be complete, once it has started
    frame_deadline: Option<Instant>,
}

impl<R> FrameReader<R> {
    /// Create a new frame reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            partial: Vec::new(),
            frame_deadline: None,
        }
    }

    /// Get a reference to the underlying reader
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Get a mutable reference to the underlying reader
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consume the frame reader and return the underlying reader
    ///
    /// Any partially received line is discarded.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: AsyncBufRead + Unpin> FrameReader<R> {
    /// Read the next frame from the stream
    ///
    /// Returns `Ok(None)` if the connection is cleanly closed between frames.
    ///
    /// # Note
    ///
    /// This method has no timeout - it will wait indefinitely for data.
    /// For production use, prefer [`read_frame_with_timeout`](Self::read_frame_with_timeout).
    pub async fn read_frame(&mut self) -> Result<Option<RawFrame>, FrameError> {
        loop {
            let Some(line) = self.read_line().await? else {
                return Ok(None);
            };
            if let Some(frame) = into_frame(line) {
                return Ok(Some(frame));
            }
        }
    }

    /// Read the next frame from the stream with a timeout
    ///
    /// Waits indefinitely for the first byte (allowing idle connections), but
    /// once the first byte is received the rest of the line must arrive within
    /// `frame_timeout`.
    ///
    /// Returns `Ok(None)` if the connection is cleanly closed.
    pub async fn read_frame_with_timeout(
        &mut self,
        frame_timeout: Duration,
    ) -> Result<Option<RawFrame>, FrameError> {
        loop {
            if self.frame_deadline.is_none() && !self.wait_for_data().await? {
                return Ok(None);
            }
            if let Some(frame) = self.finish_frame(frame_timeout).await? {
                return Ok(Some(frame));
            }
        }
    }

    /// Read the next frame with a full timeout (including the idle wait)
    ///
    /// Unlike [`read_frame_with_timeout`](Self::read_frame_with_timeout), the
    /// wait for the first byte is bounded by `idle_timeout` as well.
    pub async fn read_frame_with_full_timeout(
        &mut self,
        idle_timeout: Duration,
        frame_timeout: Duration,
    ) -> Result<Option<RawFrame>, FrameError> {
        loop {
            if self.frame_deadline.is_none() {
                match timeout(idle_timeout, self.wait_for_data()).await {
                    Ok(Ok(true)) => {}
                    Ok(Ok(false)) => return Ok(None),
                    Ok(Err(e)) => return Err(e),
                    Err(_) => return Err(FrameError::IdleTimeout),
                }
            }
            if let Some(frame) = self.finish_frame(frame_timeout).await? {
                return Ok(Some(frame));
            }
        }
    }

    /// Read the rest of a started frame before its deadline
    ///
    /// The deadline is fixed when the frame starts and survives cancellation.
    /// Returns `Ok(None)` for a blank line.
    async fn finish_frame(
        &mut self,
        frame_timeout: Duration,
    ) -> Result<Option<RawFrame>, FrameError> {
        let deadline = *self
            .frame_deadline
            .get_or_insert_with(|| Instant::now() + frame_timeout);

        let result = timeout_at(deadline, self.read_line()).await;
        self.frame_deadline = None;

        match result {
            Ok(Ok(Some(line))) => Ok(into_frame(line)),
            // Data was buffered, so EOF here means the line never finished
            Ok(Ok(None)) => Err(FrameError::ConnectionClosed),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                self.partial.clear();
                Err(FrameError::FrameTimeout)
            }
        }
    }

    /// Read up to and including the next terminator
    ///
    /// Returns the line without its terminator, or `Ok(None)` on a clean EOF
    /// between lines.
    async fn read_line(&mut self) -> Result<Option<Vec<u8>>, FrameError> {
        loop {
            // Room for MAX_FRAME_LENGTH payload bytes plus the terminator
            let room = (MAX_FRAME_LENGTH + 1).saturating_sub(self.partial.len());
            let read = (&mut self.reader)
                .take(room as u64)
                .read_until(TERMINATOR, &mut self.partial)
                .await?;

            if self.partial.last() == Some(&TERMINATOR) {
                let mut line = std::mem::take(&mut self.partial);
                line.pop();
                return Ok(Some(line));
            }

            if self.partial.len() > MAX_FRAME_LENGTH {
                self.partial.clear();
                return Err(FrameError::FrameTooLarge);
            }

            if read == 0 {
                if self.partial.is_empty() {
                    return Ok(None);
                }
                self.partial.clear();
                return Err(FrameError::ConnectionClosed);
            }
        }
    }

    /// Wait until at least one byte is buffered without consuming it
    ///
    /// Returns false on a clean EOF.
    async fn wait_for_data(&mut self) -> Result<bool, FrameError> {
        if !self.partial.is_empty() {
            return Ok(true);
        }
        let buffered = self.reader.fill_buf().await?;
        Ok(!buffered.is_empty())
    }
}

/// Strip an optional `\r` and skip blank lines
fn into_frame(mut line: Vec<u8>) -> Option<RawFrame> {
    if line.last() == Some(&b'\r') {
        line.pop();
    }

    if line.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    Some(RawFrame::new(line))
}
