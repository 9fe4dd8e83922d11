// Framework bootstrap for the worker runtime.

use crate::frameworks::config;
use crate::interface_adapters::clients::master::MasterClient;
use crate::interface_adapters::http::{create_room_handler, snapshot_handler, status_handler};
use crate::interface_adapters::net::ws_handler;
use crate::interface_adapters::state::AppState;
use crate::use_cases::{Lobby, RoomSettings};

use axum::{
    routing::{get, put},
    Router,
};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state()?;

    let app = Router::new()
        .route("/internal/create", put(create_room_handler))
        .route("/internal/status", get(status_handler))
        .route("/api/room/snapshot", get(snapshot_handler))
        .route("/api/room/ws", get(ws_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let port = config::worker_port();
    let address = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    // Register with the master before serving; an unregistered worker
    // never receives players, so failure here is fatal.
    let master_url = config::master_url();
    let client = MasterClient::new(master_url.clone(), config::master_register_timeout())
        .map_err(|e| std::io::Error::other(format!("failed to initialize master client: {e}")))?;
    let host = config::public_host();
    client.register(&host, port).await.map_err(|e| {
        tracing::error!(master_url = %master_url, error = ?e, "registration failed");
        std::io::Error::other(format!("failed to register with master: {e:?}"))
    })?;
    tracing::info!(master_url = %master_url, host = %host, port, "registered with master");

    run(listener).await
}

fn build_state() -> Result<Arc<AppState>> {
    let session_secret = config::session_secret()
        .ok_or_else(|| std::io::Error::other("SESSION_SECRET is not set"))?;

    let lobby = Arc::new(Lobby::new(RoomSettings {
        input_channel_capacity: config::INPUT_CHANNEL_CAPACITY,
        event_broadcast_capacity: config::EVENT_BROADCAST_CAPACITY,
        tick_interval: config::TICK_INTERVAL,
    }));

    Ok(Arc::new(AppState {
        lobby,
        session_secret: Arc::new(session_secret),
    }))
}
