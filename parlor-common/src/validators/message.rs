//! Chat message validation

use thiserror::Error;

/// Maximum length for chat message bodies in characters
pub const MAX_MESSAGE_LENGTH: usize = 1024;

/// Validation error for chat message bodies
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// Message exceeds maximum length
    #[error("message is too long (max {} characters)", MAX_MESSAGE_LENGTH)]
    TooLong,
    /// Message contains control characters other than newlines
    #[error("message contains invalid characters")]
    InvalidCharacters,
}

/// Validate a chat message body
///
/// Checks:
/// - Does not exceed maximum length (1024 characters)
/// - No control characters except `\n` and `\r` (multi-line messages are allowed)
///
/// Note: Empty messages are allowed; well-behaved clients never send them
/// but relaying one is harmless.
///
/// # Errors
///
/// Returns a `MessageError` variant describing the validation failure.
pub fn validate_message(body: &str) -> Result<(), MessageError> {
    if body.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(MessageError::TooLong);
    }
    for ch in body.chars() {
        if ch.is_control() && ch != '\n' && ch != '\r' {
            return Err(MessageError::InvalidCharacters);
        }
    }
    Ok(())
}
