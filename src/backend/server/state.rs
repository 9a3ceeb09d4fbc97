/**
 * Application State Management
 *
 * The state shared by every Axum handler, plus the `FromRef` impl that lets
 * handlers extract the hub directly.
 *
 * # Thread Safety
 *
 * The hub is cheap to clone; its history sits behind `Arc<RwLock<>>`.
 */
use axum::extract::FromRef;

use crate::backend::realtime::BroadcastHub;

/// Central state container for the relay
///
/// # Usage
///
/// ```rust,no_run
/// use limechat::backend::realtime::BroadcastHub;
/// use axum::extract::State;
///
/// async fn handler(State(hub): State<BroadcastHub>) {
///     let history = hub.history().await;
///     // ...
/// }
/// ```
#[derive(Clone, Debug)]
pub struct AppState {
    /// Frame dispatch, history and fan-out
    pub hub: BroadcastHub,
}

impl AppState {
    pub fn new(hub: BroadcastHub) -> Self {
        Self { hub }
    }
}

impl FromRef<AppState> for BroadcastHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}
