//! String constants for log lines and user-facing errors

// Startup and shutdown
pub const MSG_BANNER: &str = "Parlor chat server v";
pub const MSG_LISTENING: &str = "Listening on ";
pub const MSG_WS_LISTENING: &str = "WebSocket listening on ";
pub const MSG_SHUTDOWN_RECEIVED: &str = "Shutdown signal received, stopping";

// Fatal startup errors
pub const ERR_BIND_FAILED: &str = "Failed to bind to ";
pub const ERR_SIGNAL_SIGTERM: &str = "Failed to install SIGTERM handler";
pub const ERR_SIGNAL_SIGINT: &str = "Failed to install SIGINT handler";
pub const ERR_SIGNAL_CTRLC: &str = "Failed to install Ctrl+C handler";

// Accept loop
pub const ERR_ACCEPT: &str = "Failed to accept connection: ";
pub const ERR_CONNECTION_LIMIT: &str = "Connection limit reached for ";

// Entry rejections
pub const ERR_NICKNAME_EMPTY: &str = "Nickname cannot be empty";
pub const ERR_NICKNAME_INVALID: &str = "Nickname contains invalid characters";
pub const ERR_NICKNAME_TOO_LONG: &str = "Nickname is too long";
pub const ERR_IDENTITY_CONFLICT: &str = "Name was taken while entering, please try again";
