//! Tracing subscriber setup.
//!
//! Log lines go to stderr; stdout is left to the job's own output.

use crate::env::{optional, EnvLookup};
use crate::error::ConfigError;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format {other:?}, expected text or json")),
        }
    }
}

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level filter, used when `RUST_LOG` is unset
    pub log_level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl TracingConfig {
    /// Read `LOG_LEVEL` and `LOG_FORMAT`, keeping defaults for absent values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an unknown `LOG_FORMAT`.
    pub fn from_lookup(lookup: &impl EnvLookup) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(level) = optional(lookup, "LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(format) = optional(lookup, "LOG_FORMAT") {
            config.format = format
                .parse()
                .map_err(|reason: String| ConfigError::invalid("LOG_FORMAT", reason))?;
        }
        Ok(config)
    }
}

/// Initialize tracing with the given configuration.
///
/// This sets up the global tracing subscriber and should be called once at
/// startup.
pub fn init_tracing(config: &TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
