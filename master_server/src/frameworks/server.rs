// Framework bootstrap for the master runtime.

use crate::domain::WorkerRegistry;
use crate::frameworks::config;
use crate::interface_adapters::clients::worker::WorkerClient;
use crate::interface_adapters::handlers::{join_handler, register_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::probe_task;

use axum::{
    routing::{post, put},
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

    // Reconcile occupancy estimates in the background.
    tokio::spawn(probe_task(
        state.registry.clone(),
        state.worker_client.clone(),
        config::probe_interval(),
    ));

    let app = Router::new()
        .route("/internal/register", put(register_handler))
        .route("/api/join", post(join_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([0, 0, 0, 0], config::master_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Result<Arc<AppState>> {
    let session_secret = config::session_secret()
        .ok_or_else(|| std::io::Error::other("SESSION_SECRET is not set"))?;

    let worker_client = WorkerClient::new(config::WORKER_HTTP_TIMEOUT)
        .map_err(|e| std::io::Error::other(format!("failed to initialize worker client: {e}")))?;

    Ok(Arc::new(AppState {
        registry: Arc::new(WorkerRegistry::new(config::room_capacity())),
        worker_client: Arc::new(worker_client),
        session_secret: Arc::new(session_secret),
    }))
}
