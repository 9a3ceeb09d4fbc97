/**
 * Server Configuration
 *
 * Loads the relay configuration from the environment and builds the
 * services that depend on it.
 *
 * # Configuration Sources
 *
 * Environment variables (a `.env` file is loaded by the binary first), with
 * defaults for anything unset. Values that are set but unparseable abort
 * startup rather than being silently replaced.
 */
use std::sync::Arc;

use crate::backend::render::{HttpPreviewFetcher, PreviewError, PreviewSource};
use crate::shared::{ConfigError, RelayConfig};

/// Load and validate the relay configuration
///
/// # Errors
///
/// Returns a `ConfigError` naming the offending variable.
pub fn load_config() -> Result<RelayConfig, ConfigError> {
    let config = RelayConfig::from_env()?;
    tracing::info!(
        port = config.port,
        message_limit = config.message_limit,
        preview_timeout_ms = config.preview_timeout.as_millis() as u64,
        invalid_link_policy = ?config.invalid_link_policy,
        "Configuration loaded"
    );
    Ok(config)
}

/// Build the HTTP preview fetcher
pub fn load_preview_source(config: &RelayConfig) -> Result<Arc<dyn PreviewSource>, PreviewError> {
    let fetcher = HttpPreviewFetcher::from_config(config)?;
    tracing::info!(
        "Link previews enabled ({} ms timeout, {} byte cap)",
        config.preview_timeout.as_millis(),
        config.preview_max_bytes
    );
    Ok(Arc::new(fetcher))
}
