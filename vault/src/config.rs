//! Key Vault client configuration.

use crate::{
    error::{KeyVaultError, KeyVaultResult},
    key::{Credentials, KeyIdentity},
};
use keyvault_common::{env, EnvLookup, HttpConfig};
use std::time::Duration;
use url::Url;

/// Public-cloud identity provider.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
/// Audience requested for vault tokens.
pub const DEFAULT_RESOURCE: &str = "https://vault.azure.net";
/// DNS suffix of public-cloud vaults.
pub const VAULT_DNS_SUFFIX: &str = "vault.azure.net";
/// Key Vault REST API version used for key calls.
pub const DEFAULT_API_VERSION: &str = "7.0";

/// Where a vault's REST API lives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VaultEndpoint {
    /// `https://{vault}.vault.azure.net`
    #[default]
    Public,
    /// Fixed base URL, for sovereign clouds and local stubs
    Custom(Url),
}

impl VaultEndpoint {
    /// URL of a key resource, including the `api-version` query.
    ///
    /// # Errors
    ///
    /// Returns [`KeyVaultError::Config`] if the vault name does not form a
    /// valid host or the base URL cannot carry a path.
    pub fn key_url(&self, identity: &KeyIdentity, api_version: &str) -> KeyVaultResult<Url> {
        let mut url = match self {
            Self::Public => {
                Url::parse(&format!("https://{}.{VAULT_DNS_SUFFIX}", identity.vault_name()))
                    .map_err(|e| KeyVaultError::invalid_config("vault_name", e.to_string()))?
            }
            Self::Custom(base) => base.clone(),
        };

        url.path_segments_mut()
            .map_err(|()| KeyVaultError::invalid_config("vault_url", "cannot be a base URL"))?
            .pop_if_empty()
            .extend(["keys", identity.key_name()]);
        url.query_pairs_mut().append_pair("api-version", api_version);

        Ok(url)
    }
}

/// Key Vault client configuration.
#[derive(Debug, Clone)]
pub struct KeyVaultConfig {
    /// Service principal credentials
    pub credentials: Credentials,
    /// Vault and key this run operates on
    pub key: KeyIdentity,
    /// Identity provider base URL
    pub authority_host: Url,
    /// Vault REST endpoint
    pub vault_endpoint: VaultEndpoint,
    /// Token audience
    pub resource: String,
    /// Key Vault API version
    pub api_version: String,
    /// Timeouts and user agent shared by both endpoints
    pub http: HttpConfig,
}

impl KeyVaultConfig {
    /// Create a configuration for the public cloud.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in authority host does not parse.
    pub fn new(credentials: Credentials, key: KeyIdentity) -> KeyVaultResult<Self> {
        let authority_host = Url::parse(DEFAULT_AUTHORITY_HOST)
            .map_err(|e| KeyVaultError::invalid_config("authority_host", e.to_string()))?;

        Ok(Self {
            credentials,
            key,
            authority_host,
            vault_endpoint: VaultEndpoint::Public,
            resource: DEFAULT_RESOURCE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            http: HttpConfig::default(),
        })
    }

    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`KeyVaultConfig::from_lookup`].
    pub fn from_env() -> KeyVaultResult<Self> {
        Self::from_lookup(&|name: &str| std::env::var(name).ok())
    }

    /// Load configuration from named settings.
    ///
    /// Required: `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`,
    /// `AZURE_KEY_VAULT_NAME`, `KEY_NAME`. Optional: `AZURE_AUTHORITY_HOST`,
    /// `AZURE_KEYVAULT_URL`, `AZURE_KEYVAULT_RESOURCE`, `KEYVAULT_API_VERSION`,
    /// `KEYVAULT_HTTP_TIMEOUT_SECS`, `KEYVAULT_CONNECT_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyVaultError::Config`] for a missing required setting or an
    /// unparsable optional one.
    pub fn from_lookup(lookup: &impl EnvLookup) -> KeyVaultResult<Self> {
        let credentials = Credentials::new(
            env::required(lookup, "AZURE_TENANT_ID")?,
            env::required(lookup, "AZURE_CLIENT_ID")?,
            env::required(lookup, "AZURE_CLIENT_SECRET")?,
        )?;
        let key = KeyIdentity::new(
            env::required(lookup, "AZURE_KEY_VAULT_NAME")?,
            env::required(lookup, "KEY_NAME")?,
        )?;

        let mut config = Self::new(credentials, key)?;

        if let Some(host) = env::optional(lookup, "AZURE_AUTHORITY_HOST") {
            config.authority_host = parse_url("AZURE_AUTHORITY_HOST", &host)?;
        }
        if let Some(vault_url) = env::optional(lookup, "AZURE_KEYVAULT_URL") {
            config.vault_endpoint = VaultEndpoint::Custom(parse_url("AZURE_KEYVAULT_URL", &vault_url)?);
        }
        if let Some(resource) = env::optional(lookup, "AZURE_KEYVAULT_RESOURCE") {
            config.resource = resource;
        }
        if let Some(api_version) = env::optional(lookup, "KEYVAULT_API_VERSION") {
            config.api_version = api_version;
        }

        let timeout = env::parse_or(lookup, "KEYVAULT_HTTP_TIMEOUT_SECS", 30_u64)?;
        let connect_timeout = env::parse_or(lookup, "KEYVAULT_CONNECT_TIMEOUT_SECS", 10_u64)?;
        if timeout == 0 {
            return Err(KeyVaultError::invalid_config("KEYVAULT_HTTP_TIMEOUT_SECS", "must be positive"));
        }
        if connect_timeout == 0 {
            return Err(KeyVaultError::invalid_config("KEYVAULT_CONNECT_TIMEOUT_SECS", "must be positive"));
        }

        Ok(config
            .with_timeout(Duration::from_secs(timeout))
            .with_connect_timeout(Duration::from_secs(connect_timeout)))
    }

    /// Set request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_connect_timeout(timeout);
        self
    }

    /// Point token requests at another identity provider.
    #[must_use]
    pub fn with_authority_host(mut self, authority_host: Url) -> Self {
        self.authority_host = authority_host;
        self
    }

    /// Use a fixed vault base URL instead of the public-cloud host.
    #[must_use]
    pub fn with_vault_url(mut self, vault_url: Url) -> Self {
        self.vault_endpoint = VaultEndpoint::Custom(vault_url);
        self
    }

    /// URL of the configured key resource.
    ///
    /// # Errors
    ///
    /// See [`VaultEndpoint::key_url`].
    pub fn key_url(&self) -> KeyVaultResult<Url> {
        self.vault_endpoint.key_url(&self.key, &self.api_version)
    }
}

fn parse_url(name: &str, value: &str) -> KeyVaultResult<Url> {
    Url::parse(value).map_err(|e| KeyVaultError::invalid_config(name, e.to_string()))
}
