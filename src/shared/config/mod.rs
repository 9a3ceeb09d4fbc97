//! Relay configuration module
//!
//! Provides the configuration type for the chat relay, its builder, and
//! loading from environment variables.

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Origins whose links are styled as trusted
pub const DEFAULT_TRUSTED_ORIGINS: &[&str] = &[
    "https://limechatt.github.io",
    "https://limechatt-slice.glitch.me",
    "https://developer.mozzila.org",
    "https://reactjs.org",
    "https://vuejs.org",
    "https://github.org",
    "https://npmjs.com",
    "https://youtube.com",
    "https://filegarden.com",
];

pub const DEFAULT_PORT: u16 = 1050;
pub const DEFAULT_MESSAGE_LIMIT: usize = 750;
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 850;
pub const DEFAULT_MAX_AUTHOR_CHARS: usize = 25;
pub const DEFAULT_PREVIEW_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_PREVIEW_MAX_BYTES: usize = 1024 * 1024;
pub const DEFAULT_BROADCAST_CAPACITY: usize = 1000;

/// What the link classifier does after meeting a link it cannot parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidLinkPolicy {
    /// Leave the bad link alone and keep classifying the rest
    #[default]
    Skip,
    /// Leave the bad link alone and stop link processing for the message
    StopLinks,
}

impl FromStr for InvalidLinkPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "stop" | "stop-links" => Ok(Self::StopLinks),
            other => Err(ConfigError::InvalidValue {
                key: "INVALID_LINK_POLICY",
                value: other.to_string(),
            }),
        }
    }
}

/// Relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Port the WebSocket listener binds to
    pub port: u16,
    /// Number of messages kept in history
    pub message_limit: usize,
    /// Raw content characters accepted before rendering
    pub max_content_chars: usize,
    /// Characters kept from the author name
    pub max_author_chars: usize,
    /// Upper bound for a single link preview fetch
    pub preview_timeout: Duration,
    /// Bytes of a fetched page read before parsing
    pub preview_max_bytes: usize,
    pub invalid_link_policy: InvalidLinkPolicy,
    /// Frames buffered per subscriber before a slow client lags
    pub broadcast_capacity: usize,
    pub trusted_origins: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            message_limit: DEFAULT_MESSAGE_LIMIT,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            max_author_chars: DEFAULT_MAX_AUTHOR_CHARS,
            preview_timeout: DEFAULT_PREVIEW_TIMEOUT,
            preview_max_bytes: DEFAULT_PREVIEW_MAX_BYTES,
            invalid_link_policy: InvalidLinkPolicy::default(),
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
            trusted_origins: DEFAULT_TRUSTED_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RelayConfig {
    /// Create a new RelayConfigBuilder
    pub fn builder() -> RelayConfigBuilder {
        RelayConfigBuilder::default()
    }

    /// Load configuration from process environment variables
    ///
    /// Reads `RELAY_PORT`, `MESSAGE_LIMIT`, `PREVIEW_TIMEOUT_MS`,
    /// `PREVIEW_MAX_BYTES` and `INVALID_LINK_POLICY`. Unset variables keep
    /// their defaults; set but unparseable ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        if let Some(port) = parse_var(&lookup, "RELAY_PORT")? {
            builder = builder.port(port);
        }
        if let Some(limit) = parse_var(&lookup, "MESSAGE_LIMIT")? {
            builder = builder.message_limit(limit);
        }
        if let Some(millis) = parse_var::<u64, _>(&lookup, "PREVIEW_TIMEOUT_MS")? {
            builder = builder.preview_timeout(Duration::from_millis(millis));
        }
        if let Some(bytes) = parse_var(&lookup, "PREVIEW_MAX_BYTES")? {
            builder = builder.preview_max_bytes(bytes);
        }
        if let Some(raw) = lookup("INVALID_LINK_POLICY") {
            builder = builder.invalid_link_policy(raw.parse()?);
        }
        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::OutOfRange("port must be non-zero"));
        }
        if self.message_limit == 0 {
            return Err(ConfigError::OutOfRange("message limit must be at least 1"));
        }
        if self.preview_timeout.is_zero() {
            return Err(ConfigError::OutOfRange("preview timeout must be positive"));
        }
        if self.broadcast_capacity == 0 {
            return Err(ConfigError::OutOfRange("broadcast capacity must be at least 1"));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

/// Builder for RelayConfig
#[derive(Debug, Default)]
pub struct RelayConfigBuilder {
    config: RelayConfig,
}

impl RelayConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn message_limit(mut self, limit: usize) -> Self {
        self.config.message_limit = limit;
        self
    }

    pub fn max_content_chars(mut self, max: usize) -> Self {
        self.config.max_content_chars = max;
        self
    }

    pub fn max_author_chars(mut self, max: usize) -> Self {
        self.config.max_author_chars = max;
        self
    }

    pub fn preview_timeout(mut self, timeout: Duration) -> Self {
        self.config.preview_timeout = timeout;
        self
    }

    pub fn preview_max_bytes(mut self, bytes: usize) -> Self {
        self.config.preview_max_bytes = bytes;
        self
    }

    pub fn invalid_link_policy(mut self, policy: InvalidLinkPolicy) -> Self {
        self.config.invalid_link_policy = policy;
        self
    }

    pub fn broadcast_capacity(mut self, capacity: usize) -> Self {
        self.config.broadcast_capacity = capacity;
        self
    }

    pub fn trusted_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.trusted_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<RelayConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("out of range: {0}")]
    OutOfRange(&'static str),
}
