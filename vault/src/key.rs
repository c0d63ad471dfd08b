//! Credentials, tokens and key types.

use crate::error::{KeyVaultError, KeyVaultResult};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Service principal used for the client-credentials exchange.
#[derive(Debug, Clone)]
pub struct Credentials {
    tenant_id: String,
    client_id: String,
    client_secret: SecretString,
}

impl Credentials {
    /// Create credentials; every part must be non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`KeyVaultError::Config`] naming the first empty part.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> KeyVaultResult<Self> {
        let tenant_id = non_empty("tenant_id", tenant_id.into())?;
        let client_id = non_empty("client_id", client_id.into())?;
        let client_secret = non_empty("client_secret", client_secret.into())?;

        Ok(Self {
            tenant_id,
            client_id,
            client_secret: SecretString::from(client_secret),
        })
    }

    /// Directory (tenant) the service principal lives in.
    #[must_use]
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Application (client) id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

/// Bearer token returned by the identity provider.
///
/// Never cached; one is requested per vault operation.
#[derive(Debug)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub(crate) fn new(token: String) -> Self {
        Self(SecretString::from(token))
    }

    /// Raw bearer value, for the `Authorization` header.
    #[must_use]
    pub fn secret(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Longest vault name Azure accepts.
pub const MAX_VAULT_NAME_LEN: usize = 24;

/// Vault and key a run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyIdentity {
    vault_name: String,
    key_name: String,
}

impl KeyIdentity {
    /// Create an identity.
    ///
    /// The vault name becomes the first label of the vault host, so it must
    /// be a DNS label: at most [`MAX_VAULT_NAME_LEN`] ASCII letters, digits
    /// or hyphens, not starting or ending with a hyphen.
    ///
    /// # Errors
    ///
    /// Returns [`KeyVaultError::Config`] if either name is empty or the vault
    /// name is not a DNS label.
    pub fn new(vault_name: impl Into<String>, key_name: impl Into<String>) -> KeyVaultResult<Self> {
        Ok(Self {
            vault_name: dns_label("vault_name", vault_name.into())?,
            key_name: non_empty("key_name", key_name.into())?,
        })
    }

    /// Vault name, the first label of the vault host.
    #[must_use]
    pub fn vault_name(&self) -> &str {
        &self.vault_name
    }

    /// Key name within the vault.
    #[must_use]
    pub fn key_name(&self) -> &str {
        &self.key_name
    }
}

impl fmt::Display for KeyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vault_name, self.key_name)
    }
}

/// Key document as returned by the vault, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMaterial(Value);

impl KeyMaterial {
    /// Wrap a JSON document.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the JSON document.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Look up a value by JSON pointer, e.g. `/key/kid`.
    #[must_use]
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.0.pointer(pointer)
    }

    /// Key identifier URL reported by the vault.
    #[must_use]
    pub fn kid(&self) -> Option<&str> {
        self.pointer("/key/kid").and_then(Value::as_str)
    }
}

/// Compact JSON.
impl fmt::Display for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn non_empty(name: &str, value: String) -> KeyVaultResult<String> {
    if value.trim().is_empty() {
        return Err(KeyVaultError::invalid_config(name, "must not be empty"));
    }
    Ok(value)
}

fn dns_label(name: &str, value: String) -> KeyVaultResult<String> {
    let value = non_empty(name, value)?;
    let well_formed = value.len() <= MAX_VAULT_NAME_LEN
        && value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        && !value.starts_with('-')
        && !value.ends_with('-');
    if !well_formed {
        return Err(KeyVaultError::invalid_config(
            name,
            "must be at most 24 letters, digits or hyphens, not starting or ending with a hyphen",
        ));
    }
    Ok(value)
}
