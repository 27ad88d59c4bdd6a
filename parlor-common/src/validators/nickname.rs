//! Nickname validation
//!
//! Validates the name a user asks for when entering the room. The
//! disambiguating `(N)` suffix is added after validation, so a resolved
//! identity may be longer than `MAX_NICKNAME_LENGTH`.

use thiserror::Error;

/// Maximum length for requested nicknames in characters
pub const MAX_NICKNAME_LENGTH: usize = 32;

/// Validation error for nicknames
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NicknameError {
    /// Nickname is empty or only whitespace
    #[error("nickname cannot be empty")]
    Empty,
    /// Nickname exceeds maximum length
    #[error("nickname is too long (max {} characters)", MAX_NICKNAME_LENGTH)]
    TooLong,
    /// Nickname contains control characters
    #[error("nickname contains invalid characters")]
    InvalidCharacters,
}

/// Validate a requested nickname
///
/// Checks:
/// - Not empty (whitespace-only counts as empty)
/// - Does not exceed maximum length (32 characters)
/// - No control characters (tabs and newlines included)
///
/// # Errors
///
/// Returns a `NicknameError` variant describing the validation failure.
pub fn validate_nickname(nickname: &str) -> Result<(), NicknameError> {
    if nickname.trim().is_empty() {
        return Err(NicknameError::Empty);
    }
    if nickname.chars().count() > MAX_NICKNAME_LENGTH {
        return Err(NicknameError::TooLong);
    }
    if nickname.chars().any(char::is_control) {
        return Err(NicknameError::InvalidCharacters);
    }
    Ok(())
}
