//! LimeChat - Chat Relay Library
//!
//! LimeChat is a real-time chat relay: clients connect over a WebSocket,
//! submit markdown messages, and receive every accepted message as safe,
//! pre-rendered HTML.
//!
//! # Overview
//!
//! This library provides:
//! - A rendering pipeline turning untrusted markdown into sanitized HTML
//! - Link trust classification against a static allow-list
//! - Concurrent open-graph link previews injected as embed blocks
//! - A bounded in-memory message history
//! - Fan-out of accepted messages to every connected client
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types, frame decoding errors, configuration
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Rendering pipeline (markdown, links, previews)
//!   - Message store and broadcast hub
//!   - Axum WebSocket server
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use limechat::backend::server::init::create_app;
//! use limechat::shared::RelayConfig;
//!
//! # async fn example() -> Result<(), limechat::backend::BackendError> {
//! let app = create_app(RelayConfig::default()).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:1050").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - The message store is shared as `Arc<RwLock<MessageStore>>`
//! - Fan-out uses `tokio::sync::broadcast`
//! - The renderer is immutable and shared behind `Arc`

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
