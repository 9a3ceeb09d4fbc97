//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - A relay served on an ephemeral port
//! - A WebSocket client speaking the JSON protocol
//! - Deterministic preview sources
//! - Custom assertion macros

pub mod client;
pub mod previews;
pub mod relay;

pub use client::*;
pub use previews::*;
pub use relay::*;
