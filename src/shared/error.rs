//! Shared Error Types
//!
//! This module defines error types for decoding and validating the frames
//! exchanged with chat clients.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - A field carried a value of the wrong shape
//! - `FrameError` - The frame as a whole is not a usable request
//!
//! # Usage
//!
//! ```rust
//! use limechat::shared::error::SharedError;
//!
//! let error = SharedError::validation("author", "expected a string");
//! assert!(error.to_string().contains("author"));
//! ```
use thiserror::Error;

/// Errors raised while handling client frames
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Frame-level error (e.g. the payload is not a JSON object)
    #[error("Frame error: {message}")]
    FrameError {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new frame error
    pub fn frame(message: impl Into<String>) -> Self {
        Self::FrameError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
