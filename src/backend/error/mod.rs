//! Backend Error Module
//!
//! Startup and serving errors of the relay.
//!
//! # Error Types
//!
//! - `Config` - Invalid configuration
//! - `Preview` - The preview HTTP client could not be built
//! - `Io` - Binding or serving the listener failed
//! - `Shared` - Errors from the shared module

/// Error type definitions
pub mod types;

pub use types::BackendError;
