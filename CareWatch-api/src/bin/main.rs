use std::net::SocketAddr;
use std::path::PathBuf;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use care_watch_api::api::create_application;
use care_watch_domain::store::FileStateStore;

/// Server entry point: environment, logging, state store, application,
/// then serve until a shutdown signal arrives.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if dotenv().is_err() {
        eprintln!("No .env file found, relying on process environment.");
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_ansi(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    info!("🚀 Starting CareWatch API server");

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()?;

    // The dashboard state document lives under DATA_DIR
    let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));
    if !data_dir.exists() {
        info!("Creating data directory {}", data_dir.display());
        std::fs::create_dir_all(&data_dir)?;
    }

    let store = FileStateStore::in_dir(&data_dir);
    info!("Persisting dashboard state to {}", store.path().display());

    // Record the start time so /health can report uptime
    care_watch_api::api::handlers::health::initialize_server_start_time();

    // Wire the store, dashboard service, telemetry hub and reading pump
    let application = create_application(store).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, application.router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The server has drained; stop the reading pump before exiting
    application.shutdown().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves when the process receives ctrl-c, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
