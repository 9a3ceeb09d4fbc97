//! Backend Module
//!
//! All server-side code of the relay: the rendering pipeline, the message
//! history, the broadcast hub and the Axum WebSocket server.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`render`** - Markdown to sanitized HTML, link trust, link previews
//! - **`chat`** - Bounded in-memory message history
//! - **`realtime`** - Hub, fan-out channel, WebSocket connections
//! - **`server`** - Application state, configuration loading, initialization
//! - **`routes`** - Router assembly and plain HTTP endpoints
//! - **`error`** - Backend error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs      - Module exports and documentation
//! ├── render/     - Rendering pipeline
//! ├── chat/       - Message store
//! ├── realtime/   - Hub and WebSocket handling
//! ├── server/     - Initialization and state
//! ├── routes/     - Route configuration
//! └── error/      - Error types
//! ```
//!
//! # Message Flow
//!
//! 1. A connection's reader decodes a `sendMessage` frame
//! 2. The renderer produces HTML, fetching link previews concurrently
//! 3. Under the store's write lock the message is appended and published
//! 4. Every connection's writer forwards the frame to its socket
//!
//! # Thread Safety
//!
//! - `Arc<RwLock<MessageStore>>` for the shared history
//! - `broadcast::Sender` for fan-out
//! - The renderer is immutable and shared behind `Arc`

/// Rendering pipeline
pub mod render;

/// Message history
pub mod chat;

/// Real-time delivery
pub mod realtime;

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

pub use chat::MessageStore;
pub use error::BackendError;
pub use realtime::BroadcastHub;
pub use render::Renderer;
pub use server::create_app;
