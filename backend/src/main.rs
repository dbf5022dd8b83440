// src/main.rs

use std::path::PathBuf;

use lms_backend::config::Config;
use lms_backend::retention::{self, RetentionPolicy};
use lms_backend::routes;
use lms_backend::state::AppState;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (.env included)
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    tracing::info!(
        engine = %config.markup_engine,
        max_depth = config.max_nesting_depth,
        max_text_bytes = config.max_text_bytes,
        "Sanitizer configured"
    );

    // Upload retention runs beside the server
    let sweeper = retention::spawn(
        PathBuf::from(&config.upload.dir),
        RetentionPolicy::from(&config.upload),
        config.upload.sweep_interval,
    );
    tracing::info!(
        dir = %config.upload.dir,
        interval_secs = config.upload.sweep_interval.as_secs(),
        "Upload retention sweep scheduled"
    );

    let addr = config.bind_addr;
    let state = AppState::new(config);

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
