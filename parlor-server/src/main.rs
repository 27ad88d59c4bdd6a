//! Parlor chat server

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use parlor_server::args::Args;
use parlor_server::constants::*;
use parlor_server::server::{ServerState, Transport, serve};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    info!("{MSG_BANNER}{}", env!("CARGO_PKG_VERSION"));

    let listener = bind(SocketAddr::new(args.bind, args.port)).await;
    info!("{MSG_LISTENING}{}", SocketAddr::new(args.bind, args.port));

    let ws_listener = if args.websocket {
        let addr = SocketAddr::new(args.bind, args.websocket_port);
        let listener = bind(addr).await;
        info!("{MSG_WS_LISTENING}{addr}");
        Some(listener)
    } else {
        None
    };

    let state = ServerState::new(args.room_config(), args.max_connections_per_ip);
    info!(
        sweep_interval = ?state.room.config().sweep_interval,
        max_connections_per_ip = args.max_connections_per_ip,
        "room ready"
    );

    tokio::select! {
        _ = setup_shutdown_signal() => {
            info!("{MSG_SHUTDOWN_RECEIVED}");
        }
        _ = serve(listener, state.clone(), Transport::Tcp) => {}
        _ = async {
            match ws_listener {
                Some(listener) => serve(listener, state.clone(), Transport::WebSocket).await,
                // WebSocket disabled, just wait forever
                None => std::future::pending::<()>().await,
            }
        } => {}
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `--debug` selects debug level.
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Bind a listener or exit
async fn bind(addr: SocketAddr) -> TcpListener {
    match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("{ERR_BIND_FAILED}{addr}: {e}");
            std::process::exit(1);
        }
    }
}

/// Setup graceful shutdown signal handling (Ctrl+C)
async fn setup_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate()).expect(ERR_SIGNAL_SIGTERM);
        let mut sigint = signal(SignalKind::interrupt()).expect(ERR_SIGNAL_SIGINT);

        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect(ERR_SIGNAL_CTRLC);
    }
}
