//! Environment-style settings lookup.
//!
//! Settings are read through a lookup closure rather than straight from
//! `std::env`, so callers can load from the process environment at startup
//! and tests can pass a plain map.

use crate::error::ConfigError;
use std::str::FromStr;

/// Source of named settings, usually `|name| std::env::var(name).ok()`.
pub trait EnvLookup: Fn(&str) -> Option<String> {}

impl<F> EnvLookup for F where F: Fn(&str) -> Option<String> {}

/// Read a setting that must be present and non-blank.
///
/// Surrounding whitespace is trimmed.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] if the setting is absent or blank.
pub fn required(lookup: &impl EnvLookup, name: &str) -> Result<String, ConfigError> {
    optional(lookup, name).ok_or_else(|| ConfigError::missing(name))
}

/// Read a setting, treating blank values as absent.
pub fn optional(lookup: &impl EnvLookup, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse a setting, falling back to `default` when it is absent.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if the setting is present but does not parse.
pub fn parse_or<T>(lookup: &impl EnvLookup, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(lookup, name) {
        Some(value) => value
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(name, e.to_string())),
        None => Ok(default),
    }
}
