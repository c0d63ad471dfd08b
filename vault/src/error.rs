//! Key Vault error types using thiserror 2.0.
//!
//! Every failure names the step that failed (token, fetch or rotate) and
//! wraps the underlying [`Cause`], whose text is part of the message.

use keyvault_common::ConfigError;
use reqwest::StatusCode;
use std::error::Error as _;
use thiserror::Error;

/// What went wrong underneath a failed step.
#[derive(Error, Debug)]
pub enum Cause {
    /// Request could not be sent or the response could not be read
    #[error("{}", with_sources(.0))]
    Transport(#[from] reqwest::Error),

    /// Endpoint answered with a non-2xx status
    #[error("Status {status}: {body}")]
    Status {
        /// Status returned by the endpoint
        status: StatusCode,
        /// Response body, possibly empty
        body: String,
    },

    /// Response body was not the expected JSON
    #[error("invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Token response carried an empty `access_token`
    #[error("token response contained an empty access_token")]
    EmptyToken,

    /// The OS random source failed
    #[error("random generation failed: {0}")]
    Random(#[from] rand::Error),
}

/// reqwest's own message omits the connect or timeout error underneath it.
fn with_sources(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Key Vault errors.
#[derive(Error, Debug)]
pub enum KeyVaultError {
    /// Access token could not be obtained
    #[error("Error fetching access token: {0}")]
    Auth(#[source] Cause),

    /// Key could not be read
    #[error("Error fetching key: {0}")]
    Fetch(#[source] Cause),

    /// Key could not be overwritten
    #[error("Error rotating key: {0}")]
    Rotate(#[source] Cause),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),
}

/// Result type for Key Vault operations.
pub type KeyVaultResult<T> = Result<T, KeyVaultError>;

impl KeyVaultError {
    /// HTTP status returned by the endpoint, if the failure was a status.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self.cause() {
            Some(Cause::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Underlying cause of a failed token, fetch or rotate step.
    #[must_use]
    pub const fn cause(&self) -> Option<&Cause> {
        match self {
            Self::Auth(cause) | Self::Fetch(cause) | Self::Rotate(cause) => Some(cause),
            Self::Config(_) | Self::Client(_) => None,
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config(ConfigError::invalid(name, reason))
    }
}
