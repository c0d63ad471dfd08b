//! OAuth2 client-credentials exchange against the identity provider.

use crate::{
    config::KeyVaultConfig,
    error::{Cause, KeyVaultError, KeyVaultResult},
    key::{AccessToken, Credentials},
    transport::read_json,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Requests bearer tokens for the vault audience.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: Client,
    credentials: Credentials,
    token_url: Url,
    resource: String,
}

impl AuthClient {
    /// Create an auth client sharing `http` with its caller.
    ///
    /// # Errors
    ///
    /// Returns [`KeyVaultError::Config`] if the authority host cannot carry a path.
    pub fn new(config: &KeyVaultConfig, http: Client) -> KeyVaultResult<Self> {
        let mut token_url = config.authority_host.clone();
        token_url
            .path_segments_mut()
            .map_err(|()| KeyVaultError::invalid_config("authority_host", "cannot be a base URL"))?
            .pop_if_empty()
            .extend([config.credentials.tenant_id(), "oauth2", "token"]);

        Ok(Self {
            http,
            credentials: config.credentials.clone(),
            token_url,
            resource: config.resource.clone(),
        })
    }

    /// Token endpoint this client posts to.
    #[must_use]
    pub const fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Obtain a fresh access token. Nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns [`KeyVaultError::Auth`] if the request fails, the endpoint
    /// answers non-2xx, or the body lacks a usable `access_token`.
    #[instrument(skip(self), fields(tenant = %self.credentials.tenant_id()))]
    pub async fn acquire_token(&self) -> KeyVaultResult<AccessToken> {
        match self.request_token().await {
            Ok(token) => {
                debug!("Access token acquired");
                Ok(token)
            }
            Err(cause) => {
                warn!(error = %cause, "Access token request failed");
                Err(KeyVaultError::Auth(cause))
            }
        }
    }

    async fn request_token(&self) -> Result<AccessToken, Cause> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id()),
            ("client_secret", self.credentials.client_secret()),
            ("resource", self.resource.as_str()),
        ];

        let response = self
            .http
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await?;
        let payload: TokenResponse = read_json(response).await?;
        if payload.access_token.is_empty() {
            return Err(Cause::EmptyToken);
        }
        Ok(AccessToken::new(payload.access_token))
    }
}
