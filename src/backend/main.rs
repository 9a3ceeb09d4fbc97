/**
 * LimeChat Relay Entry Point
 *
 * Loads configuration, initializes tracing and serves the relay.
 */

#[cfg(feature = "ssr")]
use limechat::backend::{error::BackendError, server};

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), BackendError> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    eprintln!("[STARTUP] Setting RUST_LOG={}", env_filter);

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    tracing::info!("[STARTUP] Server initialization started");

    let config = server::config::load_config()?;
    let port = config.port;
    let app = server::create_app(config).await?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[STARTUP] Listening on {}", addr);
    eprintln!("[STARTUP] Clients should connect to ws://127.0.0.1:{}/", port);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin limechat-server --features ssr");
    std::process::exit(1);
}
