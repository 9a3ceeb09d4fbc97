/**
 * Backend Error Types
 *
 * Errors that can stop the relay from starting or serving. Nothing a client
 * sends ends up here: malformed frames get an error reply and preview
 * failures are absorbed by the renderer.
 */
use thiserror::Error;

use crate::backend::render::PreviewError;
use crate::shared::ConfigError;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Invalid or unparseable configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The preview HTTP client could not be built
    #[error("Preview client error: {0}")]
    Preview(#[from] PreviewError),

    /// Binding or serving the listener failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
