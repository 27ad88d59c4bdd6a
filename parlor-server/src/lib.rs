//! Parlor chat server library
//!
//! The binary is a thin wrapper around [`server::serve`]; everything else is
//! exposed for integration testing.

pub mod args;
pub mod broadcaster;
pub mod connection;
pub mod connection_tracker;
pub mod constants;
pub mod handlers;
pub mod room;
pub mod server;
pub mod sessions;
pub mod websocket;
