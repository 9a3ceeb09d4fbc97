/**
 * API Route Handlers
 *
 * Plain HTTP endpoints next to the WebSocket.
 *
 * # Routes
 *
 * - `GET /health` - `{"status":"ok","messages":<stored>,"clients":<connected>}`
 */
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::backend::realtime::BroadcastHub;
use crate::backend::server::state::AppState;

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    /// Messages currently held in history
    pub messages: usize,
    /// Open WebSocket connections
    pub clients: usize,
}

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/health", get(health))
}

/// Handle GET /health
pub async fn health(State(hub): State<BroadcastHub>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        messages: hub.stored_messages().await,
        clients: hub.connected_clients(),
    })
}
