//! Shared test utilities for the key rotator crates.
//!
//! This crate provides:
//! - wiremock-backed stand-ins for the identity provider and the vault
//! - Proptest generators for credentials and key identities
//! - JSON fixtures shaped like real service responses

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
pub use mocks::{EchoRotation, MockIdentityProvider, MockVault};
