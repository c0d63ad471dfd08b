//! Shared proptest generators.

use proptest::prelude::*;

/// Generate tenant ids in GUID form.
pub fn tenant_id_strategy() -> impl Strategy<Value = String> {
    "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
}

/// Generate application (client) ids in GUID form.
pub fn client_id_strategy() -> impl Strategy<Value = String> {
    "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
}

/// Generate client secrets like the ones the portal issues.
pub fn client_secret_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9~._-]{16,40}"
}

/// Generate valid vault names: 3-24 chars, starting with a letter.
pub fn vault_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{1,21}[a-z0-9]"
}

/// Generate valid key names.
pub fn key_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("signing-key".to_string()),
        Just("dek-wrapper".to_string()),
        "[a-zA-Z0-9][a-zA-Z0-9-]{0,62}",
    ]
}

/// Generate opaque bearer tokens.
pub fn access_token_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{20,80}"
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn prop_vault_names_fit_limits(name in vault_name_strategy()) {
            prop_assert!((3..=24).contains(&name.len()));
            prop_assert!(name.starts_with(|c: char| c.is_ascii_lowercase()));
        }
    }
}
