//! Configuration error type shared by every crate that reads settings.

use thiserror::Error;

/// A setting was missing or could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required setting is absent or blank
    #[error("missing required setting {0}")]
    Missing(String),

    /// Setting is present but unusable
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Name of the offending setting
        name: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Create a missing-setting error.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::Missing(name.into())
    }

    /// Create an invalid-setting error.
    #[must_use]
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Name of the setting this error is about.
    #[must_use]
    pub fn setting(&self) -> &str {
        match self {
            Self::Missing(name) | Self::Invalid { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::missing("AZURE_TENANT_ID");
        assert_eq!(err.to_string(), "missing required setting AZURE_TENANT_ID");

        let err = ConfigError::invalid("KEYVAULT_HTTP_TIMEOUT_SECS", "not a number");
        assert_eq!(
            err.to_string(),
            "invalid value for KEYVAULT_HTTP_TIMEOUT_SECS: not a number"
        );
    }

    #[test]
    fn test_setting_name() {
        assert_eq!(ConfigError::missing("KEY_NAME").setting(), "KEY_NAME");
        assert_eq!(ConfigError::invalid("LOG_FORMAT", "xml").setting(), "LOG_FORMAT");
    }
}
