//! One run of the rotation job: fetch the key, then rotate it.
//!
//! A failed fetch does not stop the rotation. Results and error messages are
//! written to `out`, one line each.

use azure_keyvault_client::{KeyIdentity, KeyStore};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info};

/// Outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobReport {
    /// The key was read
    pub fetched: bool,
    /// The key was overwritten
    pub rotated: bool,
}

impl JobReport {
    /// Success only when both steps succeeded.
    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        if self.fetched && self.rotated {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Fetch then rotate `identity`, printing each result to `out`.
///
/// # Errors
///
/// Only fails if writing to `out` fails.
pub async fn run<S, W>(store: &S, identity: &KeyIdentity, out: &mut W) -> io::Result<JobReport>
where
    S: KeyStore + ?Sized,
    W: Write,
{
    info!(key = %identity, "Starting key rotation job");

    let fetched = match store.get_key(identity).await {
        Ok(material) => {
            writeln!(out, "Key: {material}")?;
            true
        }
        Err(err) => {
            error!(error = %err, "Fetch step failed");
            writeln!(out, "{err}")?;
            false
        }
    };

    let rotated = match store.rotate_key(identity).await {
        Ok(material) => {
            writeln!(out, "New Key: {material}")?;
            true
        }
        Err(err) => {
            error!(error = %err, "Rotate step failed");
            writeln!(out, "{err}")?;
            false
        }
    };

    info!(fetched, rotated, "Key rotation job finished");
    Ok(JobReport { fetched, rotated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use azure_keyvault_client::{Cause, KeyMaterial, KeyVaultError, KeyVaultResult, StatusCode};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        fail_fetch: bool,
        fail_rotate: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    fn unauthorized() -> Cause {
        Cause::Status {
            status: StatusCode::UNAUTHORIZED,
            body: String::new(),
        }
    }

    #[async_trait]
    impl KeyStore for FakeStore {
        async fn get_key(&self, _identity: &KeyIdentity) -> KeyVaultResult<KeyMaterial> {
            self.calls.lock().unwrap().push("get");
            if self.fail_fetch {
                return Err(KeyVaultError::Fetch(unauthorized()));
            }
            Ok(KeyMaterial::new(json!({"key": {"kid": "old"}})))
        }

        async fn rotate_key(&self, _identity: &KeyIdentity) -> KeyVaultResult<KeyMaterial> {
            self.calls.lock().unwrap().push("rotate");
            if self.fail_rotate {
                return Err(KeyVaultError::Rotate(unauthorized()));
            }
            Ok(KeyMaterial::new(json!({"key": {"kid": "new"}})))
        }
    }

    fn identity() -> KeyIdentity {
        KeyIdentity::new("v1", "k1").unwrap()
    }

    #[tokio::test]
    async fn test_prints_both_results() {
        let store = FakeStore::default();
        let mut out = Vec::new();

        let report = run(&store, &identity(), &mut out).await.unwrap();

        assert_eq!(report, JobReport { fetched: true, rotated: true });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Key: {\"key\":{\"kid\":\"old\"}}\nNew Key: {\"key\":{\"kid\":\"new\"}}\n"
        );
    }

    #[tokio::test]
    async fn test_rotates_even_when_fetch_fails() {
        let store = FakeStore {
            fail_fetch: true,
            ..FakeStore::default()
        };
        let mut out = Vec::new();

        let report = run(&store, &identity(), &mut out).await.unwrap();

        assert_eq!(*store.calls.lock().unwrap(), vec!["get", "rotate"]);
        assert_eq!(report, JobReport { fetched: false, rotated: true });
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Error fetching key: Status 401 Unauthorized"));
        assert!(printed.contains("New Key: "));
    }

    #[tokio::test]
    async fn test_rotation_failure_reported() {
        let store = FakeStore {
            fail_rotate: true,
            ..FakeStore::default()
        };
        let mut out = Vec::new();

        let report = run(&store, &identity(), &mut out).await.unwrap();

        assert!(!report.rotated);
        assert!(String::from_utf8(out)
            .unwrap()
            .ends_with("Error rotating key: Status 401 Unauthorized: \n"));
    }
}
