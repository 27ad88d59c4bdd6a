//! Error message functions for handlers
//!
//! User-facing strings carried by `EntryRejected` and `Error` events.

use crate::constants::{
    ERR_IDENTITY_CONFLICT, ERR_NICKNAME_EMPTY, ERR_NICKNAME_INVALID, ERR_NICKNAME_TOO_LONG,
};

// ========================================================================
// Nickname Validation Errors
// ========================================================================

/// "nickname empty" error
pub fn err_nickname_empty() -> String {
    ERR_NICKNAME_EMPTY.to_string()
}

/// "nickname invalid" error
pub fn err_nickname_invalid() -> String {
    ERR_NICKNAME_INVALID.to_string()
}

/// "nickname too long" error
pub fn err_nickname_too_long(max_length: usize) -> String {
    format!("{ERR_NICKNAME_TOO_LONG} (max {max_length} characters)")
}

// ========================================================================
// Entry Errors
// ========================================================================

/// Entry lost the race for an identity twice in a row
pub fn err_identity_conflict(identity: &str) -> String {
    format!("{ERR_IDENTITY_CONFLICT}: {identity}")
}

// ========================================================================
// Protocol Errors
// ========================================================================

/// Frame could not be decoded
pub fn err_invalid_message(detail: &str) -> String {
    format!("Invalid message: {detail}")
}
