//! Test fixtures with sample data.

use serde_json::{json, Value};

/// Tenant used by the end-to-end scenario.
pub const TENANT_ID: &str = "t1";
/// Client id used by the end-to-end scenario.
pub const CLIENT_ID: &str = "c1";
/// Client secret used by the end-to-end scenario.
pub const CLIENT_SECRET: &str = "s1";
/// Vault name used by the end-to-end scenario.
pub const VAULT_NAME: &str = "v1";
/// Key name used by the end-to-end scenario.
pub const KEY_NAME: &str = "k1";
/// Bearer token handed out by the mock identity provider.
pub const ACCESS_TOKEN: &str = "TOKEN123";

/// Token endpoint success body.
#[must_use]
pub fn token_response(access_token: &str) -> Value {
    json!({
        "token_type": "Bearer",
        "expires_in": "3599",
        "ext_expires_in": "3599",
        "resource": "https://vault.azure.net",
        "access_token": access_token,
    })
}

/// Key bundle as the vault returns it for a GET.
#[must_use]
pub fn key_bundle(vault_name: &str, key_name: &str) -> Value {
    json!({
        "key": {
            "kid": format!("https://{vault_name}.vault.azure.net/keys/{key_name}/78deebed173b48e48f55abf87ed4cf71"),
            "kty": "oct",
            "key_ops": ["encrypt", "decrypt", "wrapKey", "unwrapKey"],
        },
        "attributes": {
            "enabled": true,
            "created": 1_493_942_451,
            "updated": 1_493_942_451,
            "recoveryLevel": "Recoverable+Purgeable",
        },
    })
}

/// Key bundle reporting `k` as the stored value, as returned after a rotation.
#[must_use]
pub fn rotated_key_bundle(key_name: &str, k: &str) -> Value {
    json!({
        "key": {
            "kid": format!("https://vault.invalid/keys/{key_name}/rotated"),
            "kty": "oct",
            "k": k,
        },
        "attributes": {
            "enabled": true,
        },
    })
}

/// Error body in the vault's format.
#[must_use]
pub fn vault_error(code: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_carries_token() {
        assert_eq!(token_response("abc")["access_token"], "abc");
    }

    #[test]
    fn test_key_bundle_kid() {
        let bundle = key_bundle(VAULT_NAME, KEY_NAME);
        let kid = bundle["key"]["kid"].as_str().unwrap();
        assert!(kid.starts_with("https://v1.vault.azure.net/keys/k1/"));
    }
}
