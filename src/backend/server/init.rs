/**
 * Server Initialization
 *
 * Wires the configuration, rendering pipeline, hub and router together.
 *
 * # Initialization Process
 *
 * 1. Build the preview fetcher from the configuration
 * 2. Build the renderer and the broadcast hub (empty history)
 * 3. Create the application state and the router
 */
use axum::Router;
use std::sync::Arc;

use crate::backend::error::BackendError;
use crate::backend::realtime::BroadcastHub;
use crate::backend::render::{PreviewSource, Renderer};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_preview_source;
use crate::backend::server::state::AppState;
use crate::shared::RelayConfig;

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails if the configuration is invalid or the HTTP client cannot be built.
pub async fn create_app(config: RelayConfig) -> Result<Router<()>, BackendError> {
    config.validate()?;
    let previews = load_preview_source(&config)?;
    Ok(create_app_with_previews(config, previews))
}

/// Create the application with a caller-supplied preview source
pub fn create_app_with_previews(config: RelayConfig, previews: Arc<dyn PreviewSource>) -> Router<()> {
    tracing::info!("Initializing LimeChat relay");

    let renderer = Renderer::new(&config, previews);
    let hub = BroadcastHub::new(&config, renderer);
    tracing::info!(
        "Message store ({} messages) and broadcast channel ({} frames) initialized",
        config.message_limit,
        config.broadcast_capacity
    );

    let app = create_router(AppState::new(hub));
    tracing::info!("Router configured");
    app
}
