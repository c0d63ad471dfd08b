//! Key store abstraction driven by the rotation job.

use crate::{
    error::KeyVaultResult,
    key::{KeyIdentity, KeyMaterial},
};
use async_trait::async_trait;

/// A store holding a single rotatable key per identity.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Read the key document.
    async fn get_key(&self, identity: &KeyIdentity) -> KeyVaultResult<KeyMaterial>;

    /// Overwrite the key with fresh random material and return the updated document.
    async fn rotate_key(&self, identity: &KeyIdentity) -> KeyVaultResult<KeyMaterial>;
}
