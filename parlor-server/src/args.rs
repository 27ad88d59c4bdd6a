//! Command-line argument parsing

use std::net::IpAddr;
use std::time::Duration;

use clap::Parser;
use parlor_common::{
    DEFAULT_MAX_CONNECTIONS_PER_IP, DEFAULT_PORT, DEFAULT_SWEEP_INTERVAL_MS,
    DEFAULT_WEBSOCKET_PORT,
};

use crate::room::RoomConfig;

/// Parlor chat server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// IP address to bind to (IPv4 or IPv6)
    #[arg(short, long, default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Enable the WebSocket listener for browser clients
    #[arg(long, default_value = "false")]
    pub websocket: bool,

    /// Port for WebSocket connections (requires --websocket)
    #[arg(long, default_value_t = DEFAULT_WEBSOCKET_PORT)]
    pub websocket_port: u16,

    /// Liveness sweep debounce window in milliseconds
    #[arg(long, default_value_t = DEFAULT_SWEEP_INTERVAL_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub sweep_interval_ms: u64,

    /// Maximum simultaneous connections per IP (0 = unlimited)
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS_PER_IP)]
    pub max_connections_per_ip: usize,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

impl Args {
    pub fn room_config(&self) -> RoomConfig {
        RoomConfig {
            sweep_interval: Duration::from_millis(self.sweep_interval_ms),
        }
    }
}
