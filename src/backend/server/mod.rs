//! Server Module
//!
//! Initialization and configuration of the Axum server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - Configuration and preview fetcher loading
//! └── init.rs   - App creation
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use limechat::backend::server::create_app;
//! use limechat::shared::RelayConfig;
//!
//! # async fn example() -> Result<(), limechat::backend::BackendError> {
//! let app = create_app(RelayConfig::default()).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use init::{create_app, create_app_with_previews};
pub use state::AppState;
