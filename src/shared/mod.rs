//! Shared Module
//!
//! This module contains the types that cross the wire or the configuration
//! boundary: the chat message, the client/server frames, errors raised while
//! decoding frames, and the relay configuration.
//!
//! # Overview
//!
//! None of these types depend on the server runtime, so they can be used by
//! tests and tools that only speak the protocol.

/// Message data structure
pub mod message;

/// Client and server frames
pub mod protocol;

/// Shared error types
pub mod error;

/// Relay configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use message::Message;
pub use protocol::{ClientFrame, RequestKind, ServerFrame};
pub use error::SharedError;
pub use config::{ConfigError, InvalidLinkPolicy, RelayConfig, RelayConfigBuilder};
