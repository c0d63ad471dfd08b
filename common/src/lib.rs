//! Shared plumbing for the key rotator crates.
//!
//! This crate provides centralized implementations for:
//! - Configuration errors and environment lookups
//! - HTTP client configuration and building
//! - Tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod env;
pub mod error;
pub mod http;
pub mod tracing_config;

pub use env::{parse_or, required, EnvLookup};
pub use error::ConfigError;
pub use http::{build_http_client, HttpConfig};
pub use tracing_config::{init_tracing, LogFormat, TracingConfig};
