//! Line-delimited framing for the Parlor protocol
//!
//! Every message travels as one line: a compact JSON object followed by `\n`.
//! A trailing `\r` is tolerated and blank lines are skipped.
//!
//! ```text
//! {"type":"Entered","name":"alice"}\n
//! ```

mod error;
mod frame;
mod reader;
mod writer;

use std::time::Duration;

pub use error::FrameError;
pub use frame::RawFrame;
pub use reader::FrameReader;
pub use writer::FrameWriter;

/// Frame terminator
pub const TERMINATOR: u8 = b'\n';

/// Maximum payload length of a single frame in bytes (excluding the terminator)
pub const MAX_FRAME_LENGTH: usize = 64 * 1024;

/// Default timeout for completing a frame once the first byte is received
pub const DEFAULT_FRAME_TIMEOUT: Duration = Duration::from_secs(60);

/// Default idle timeout for connections that have not entered the room yet
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
