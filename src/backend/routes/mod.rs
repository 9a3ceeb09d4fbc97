//! Route Configuration Module
//!
//! HTTP routes of the relay.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs         - Module exports and documentation
//! ├── router.rs      - Main router creation
//! └── api_routes.rs  - Plain HTTP endpoints
//! ```
//!
//! # Routes
//!
//! - `GET /` - WebSocket chat endpoint
//! - `GET /health` - Health report

/// Main router creation
pub mod router;

/// Plain HTTP endpoints
pub mod api_routes;

pub use router::create_router;
