//! Azure Key Vault client for the key rotator.
//!
//! Fetches a named key and overwrites it with fresh random material. Every
//! operation obtains its own access token through the OAuth2
//! client-credentials grant before calling the vault.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod key;
pub mod provider;
pub mod rotation;
mod transport;

pub use auth::AuthClient;
pub use client::VaultClient;
pub use config::{KeyVaultConfig, VaultEndpoint};
pub use error::{Cause, KeyVaultError, KeyVaultResult};
pub use key::{AccessToken, Credentials, KeyIdentity, KeyMaterial};
pub use provider::KeyStore;
pub use reqwest::StatusCode;
pub use rotation::RotationRequest;
