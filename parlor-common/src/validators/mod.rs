//! Input validation functions
//!
//! Validators shared between client and server - clients can use them for
//! pre-validation, the server uses them for enforcement.

mod message;
mod nickname;

pub use message::{MAX_MESSAGE_LENGTH, MessageError, validate_message};
pub use nickname::{MAX_NICKNAME_LENGTH, NicknameError, validate_nickname};
