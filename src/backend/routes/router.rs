/**
 * Router Configuration
 *
 * Combines the relay's routes into a single Axum router.
 *
 * # Routes
 *
 * - `GET /` - WebSocket upgrade, the chat endpoint
 * - `GET /health` - Liveness and counters
 * - anything else - 404
 *
 * Every request is traced through tower-http's `TraceLayer`.
 */
use axum::{http::StatusCode, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::backend::realtime::ws_handler;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/", get(ws_handler));

    let router = configure_api_routes(router);

    router
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
