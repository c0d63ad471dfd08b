//! Key Vault HTTP client.
//!
//! Each operation asks [`AuthClient`] for a new token and then makes exactly
//! one call to the vault. A failure in either step ends the operation.

use crate::{
    auth::AuthClient,
    config::{KeyVaultConfig, VaultEndpoint},
    error::{Cause, KeyVaultError, KeyVaultResult},
    key::{AccessToken, KeyIdentity, KeyMaterial},
    provider::KeyStore,
    rotation::RotationRequest,
    transport::read_json,
};
use async_trait::async_trait;
use keyvault_common::build_http_client;
use reqwest::{header, Client};
use tracing::{error, info, instrument};
use url::Url;

/// Reads and rotates keys in an Azure Key Vault.
#[derive(Debug, Clone)]
pub struct VaultClient {
    http: Client,
    auth: AuthClient,
    endpoint: VaultEndpoint,
    api_version: String,
}

impl VaultClient {
    /// Create a client; the HTTP client is shared with the auth client.
    ///
    /// # Errors
    ///
    /// Returns [`KeyVaultError::Client`] if the HTTP client cannot be built,
    /// or [`KeyVaultError::Config`] for an unusable authority host.
    pub fn new(config: &KeyVaultConfig) -> KeyVaultResult<Self> {
        let http = build_http_client(&config.http).map_err(KeyVaultError::Client)?;
        let auth = AuthClient::new(config, http.clone())?;

        Ok(Self {
            http,
            auth,
            endpoint: config.vault_endpoint.clone(),
            api_version: config.api_version.clone(),
        })
    }

    /// Auth client used for every operation.
    #[must_use]
    pub const fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Fetch a key's current document.
    ///
    /// # Errors
    ///
    /// Returns [`KeyVaultError::Auth`] if no token could be obtained and
    /// [`KeyVaultError::Fetch`] if the vault call fails.
    #[instrument(skip(self, identity), fields(vault = %identity.vault_name(), key = %identity.key_name()))]
    pub async fn get_key(&self, identity: &KeyIdentity) -> KeyVaultResult<KeyMaterial> {
        let url = self.endpoint.key_url(identity, &self.api_version)?;
        let token = self.auth.acquire_token().await?;

        match self.send_get(url, &token).await {
            Ok(material) => {
                info!(kid = material.kid().unwrap_or_default(), "Fetched key");
                Ok(material)
            }
            Err(cause) => {
                error!(error = %cause, "Key fetch failed");
                Err(KeyVaultError::Fetch(cause))
            }
        }
    }

    /// Overwrite a key with 32 fresh random bytes, hex-encoded.
    ///
    /// The previous material is not kept; there is no undo.
    ///
    /// # Errors
    ///
    /// Returns [`KeyVaultError::Auth`] if no token could be obtained and
    /// [`KeyVaultError::Rotate`] if generation or the vault call fails.
    #[instrument(skip(self, identity), fields(vault = %identity.vault_name(), key = %identity.key_name()))]
    pub async fn rotate_key(&self, identity: &KeyIdentity) -> KeyVaultResult<KeyMaterial> {
        let url = self.endpoint.key_url(identity, &self.api_version)?;
        let token = self.auth.acquire_token().await?;

        match self.send_rotation(url, &token).await {
            Ok(material) => {
                info!(kid = material.kid().unwrap_or_default(), "Rotated key");
                Ok(material)
            }
            Err(cause) => {
                error!(error = %cause, "Key rotation failed");
                Err(KeyVaultError::Rotate(cause))
            }
        }
    }

    async fn send_get(&self, url: Url, token: &AccessToken) -> Result<KeyMaterial, Cause> {
        let response = self
            .http
            .get(url)
            .bearer_auth(token.secret())
            .send()
            .await?;
        read_json(response).await
    }

    async fn send_rotation(&self, url: Url, token: &AccessToken) -> Result<KeyMaterial, Cause> {
        let request = RotationRequest::generate()?;
        let response = self
            .http
            .put(url)
            .bearer_auth(token.secret())
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl KeyStore for VaultClient {
    async fn get_key(&self, identity: &KeyIdentity) -> KeyVaultResult<KeyMaterial> {
        Self::get_key(self, identity).await
    }

    async fn rotate_key(&self, identity: &KeyIdentity) -> KeyVaultResult<KeyMaterial> {
        Self::rotate_key(self, identity).await
    }
}
