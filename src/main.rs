//! Messages Backend - HTTP server
//!
//! Serves the messages resource over HTTP with an in-memory item store.
//! The table name, bind address and port come from the environment.

use messages_backend::{build_router, memory_state, Config};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize structured logging
    init_tracing();

    // Load configuration
    let config = Config::from_env();
    log_startup_info(&config);

    let app = build_router(memory_state(&config));

    if let Err(e) = serve(app, &config).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing with environment-based log levels.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("messages_backend=debug,tower_http=info")),
        )
        .init();
}

/// Log startup configuration.
fn log_startup_info(config: &Config) {
    info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        storage = "memory",
        table = %config.message_table_name,
        "Starting messages backend"
    );
}

/// Bind to address and serve the application.
async fn serve(app: axum::Router, config: &Config) -> std::io::Result<()> {
    let bind_addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!(addr = %bind_addr, "Server listening");

    axum::serve(listener, app).await
}
