//! End-to-end tests: configuration, token exchange and vault calls together.

use azure_keyvault_client::{KeyStore, KeyVaultConfig, KeyVaultError, VaultClient};
use proptest::prelude::*;
use std::collections::HashMap;
use test_utils::{
    fixtures, key_name_strategy, tenant_id_strategy, vault_name_strategy, MockIdentityProvider,
    MockVault,
};

fn settings_for(
    idp: &MockIdentityProvider,
    vault: &MockVault,
    tenant: &str,
    vault_name: &str,
    key_name: &str,
) -> HashMap<&'static str, String> {
    HashMap::from([
        ("AZURE_TENANT_ID", tenant.to_string()),
        ("AZURE_CLIENT_ID", fixtures::CLIENT_ID.to_string()),
        ("AZURE_CLIENT_SECRET", fixtures::CLIENT_SECRET.to_string()),
        ("AZURE_KEY_VAULT_NAME", vault_name.to_string()),
        ("KEY_NAME", key_name.to_string()),
        ("AZURE_AUTHORITY_HOST", idp.authority().to_string()),
        ("AZURE_KEYVAULT_URL", vault.base_url().to_string()),
        ("KEYVAULT_HTTP_TIMEOUT_SECS", "5".to_string()),
    ])
}

fn load(settings: &HashMap<&'static str, String>) -> KeyVaultConfig {
    KeyVaultConfig::from_lookup(&|name: &str| settings.get(name).cloned()).unwrap()
}

/// t1/c1/s1/v1/k1 against an identity provider that hands out TOKEN123.
#[tokio::test]
async fn get_key_issues_authorized_get_for_configured_key() {
    let idp = MockIdentityProvider::start().await;
    let vault = MockVault::start().await;
    idp.grant_token(fixtures::TENANT_ID, fixtures::ACCESS_TOKEN).await;
    vault
        .serve_key(
            fixtures::KEY_NAME,
            fixtures::ACCESS_TOKEN,
            fixtures::key_bundle(fixtures::VAULT_NAME, fixtures::KEY_NAME),
        )
        .await;

    let settings = settings_for(
        &idp,
        &vault,
        fixtures::TENANT_ID,
        fixtures::VAULT_NAME,
        fixtures::KEY_NAME,
    );
    let mut public = settings.clone();
    public.remove("AZURE_KEYVAULT_URL");
    assert_eq!(
        load(&public).key_url().unwrap().as_str(),
        "https://v1.vault.azure.net/keys/k1?api-version=7.0"
    );

    let config = load(&settings);
    let client = VaultClient::new(&config).unwrap();
    let material = client.get_key(&config.key).await.unwrap();

    let requests = vault.requests().await;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method.as_str(), "GET");
    assert_eq!(request.url.path(), "/keys/k1");
    assert_eq!(request.url.query(), Some("api-version=7.0"));
    assert_eq!(
        request.headers.get("authorization").unwrap().to_str().unwrap(),
        "Bearer TOKEN123"
    );
    assert_eq!(
        material.as_value(),
        &fixtures::key_bundle(fixtures::VAULT_NAME, fixtures::KEY_NAME)
    );

    let tokens = idp.token_requests().await;
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0]["client_id"], "c1");
    assert_eq!(tokens[0]["client_secret"], "s1");
}

/// Fetch failure followed by a successful rotation, driven through the trait.
#[tokio::test]
async fn rotation_proceeds_after_failed_fetch() {
    let idp = MockIdentityProvider::start().await;
    let vault = MockVault::start().await;
    idp.grant_token(fixtures::TENANT_ID, fixtures::ACCESS_TOKEN).await;
    vault.fail("GET", fixtures::KEY_NAME, 401).await;
    vault
        .echo_rotations(fixtures::KEY_NAME, fixtures::ACCESS_TOKEN)
        .await;

    let config = load(&settings_for(
        &idp,
        &vault,
        fixtures::TENANT_ID,
        fixtures::VAULT_NAME,
        fixtures::KEY_NAME,
    ));
    let client = VaultClient::new(&config).unwrap();
    let store: &dyn KeyStore = &client;

    let fetch = store.get_key(&config.key).await;
    let rotated = store.rotate_key(&config.key).await.unwrap();

    let err = fetch.unwrap_err();
    assert!(matches!(err, KeyVaultError::Fetch(_)));
    assert!(err.to_string().contains("401"));

    let requests = vault.requests().await;
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .unwrap();
    let submitted: serde_json::Value = put.body_json().unwrap();
    assert_eq!(rotated.pointer("/key/k"), submitted.get("k"));

    assert_eq!(idp.token_requests().await.len(), 2, "one token per operation");
}

/// Rotation overwrites with a different value every run.
#[tokio::test]
async fn repeated_runs_never_reuse_key_material() {
    let idp = MockIdentityProvider::start().await;
    let vault = MockVault::start().await;
    idp.grant_token(fixtures::TENANT_ID, fixtures::ACCESS_TOKEN).await;
    vault
        .echo_rotations(fixtures::KEY_NAME, fixtures::ACCESS_TOKEN)
        .await;

    let config = load(&settings_for(
        &idp,
        &vault,
        fixtures::TENANT_ID,
        fixtures::VAULT_NAME,
        fixtures::KEY_NAME,
    ));
    let client = VaultClient::new(&config).unwrap();

    let mut seen = std::collections::HashSet::new();
    for _ in 0..20 {
        let material = client.rotate_key(&config.key).await.unwrap();
        let k = material.pointer("/key/k").unwrap().as_str().unwrap().to_string();
        assert_eq!(k.len(), 64);
        assert!(seen.insert(k));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// For any tenant, vault and key, the token goes to the tenant's endpoint
    /// and the fetch targets that key.
    #[test]
    fn prop_requests_follow_configuration(
        tenant in tenant_id_strategy(),
        vault_name in vault_name_strategy(),
        key_name in key_name_strategy(),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let idp = MockIdentityProvider::start().await;
            let vault = MockVault::start().await;
            idp.grant_token(&tenant, fixtures::ACCESS_TOKEN).await;
            vault.serve_key(&key_name, fixtures::ACCESS_TOKEN, serde_json::json!({"key": {}})).await;

            let config = load(&settings_for(&idp, &vault, &tenant, &vault_name, &key_name));
            let client = VaultClient::new(&config).unwrap();
            client.get_key(&config.key).await.unwrap();

            let requests = vault.requests().await;
            prop_assert_eq!(requests.len(), 1);
            let expected_path = format!("/keys/{key_name}");
            prop_assert_eq!(requests[0].url.path(), expected_path.as_str());
            prop_assert_eq!(idp.token_requests().await.len(), 1);
            Ok(())
        })?;
    }
}
