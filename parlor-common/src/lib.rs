//! Parlor Common Library
//!
//! Shared types, protocol, and utilities for the Parlor chat room.

pub mod framing;
pub mod io;
pub mod protocol;
pub mod validators;

/// Default port for Parlor connections
pub const DEFAULT_PORT: u16 = 7600;

/// Default port for WebSocket connections
pub const DEFAULT_WEBSOCKET_PORT: u16 = 7601;

/// Default debounce window for the liveness sweep, in milliseconds
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 500;

/// Default per-IP concurrent connection limit (0 = unlimited)
pub const DEFAULT_MAX_CONNECTIONS_PER_IP: usize = 5;
