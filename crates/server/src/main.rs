//! medgen-server: synthetic clinical profile service binary entrypoint.

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medgen_server::{AppState, config::Config};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();

    let state = AppState::from_config(&config).expect("Failed to initialize application state");

    // Log startup info
    if config.google_api_key.is_some() {
        tracing::info!(model = %config.gemini_model, "Gemini API key configured");
    } else {
        tracing::warn!("GOOGLE_API_KEY not set, profile generation will fail");
    }
    tracing::info!(
        timeout_secs = config.upstream_timeout.as_secs(),
        retries = config.generation_retries,
        "Upstream call policy"
    );
    tracing::info!("Rate limiting: {} requests/second", config.rate_limit_rps);
    tracing::info!(origins = ?config.cors_origins, "CORS allowed origins");

    match config.result_ttl {
        Some(ttl) => {
            tracing::info!(ttl_secs = ttl.as_secs(), "Result sweeping enabled");
            state.store.spawn_sweeper(ttl);
        }
        None => tracing::info!("Results are kept until downloaded"),
    }

    // Build application
    let app = medgen_server::build_app(state, &config);

    // Start server
    let addr: SocketAddr = config.bind_address.parse().expect("Invalid bind address");
    tracing::info!("Starting medgen server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shutdown complete");
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
