//! New key values for rotation.

use rand::{rngs::OsRng, RngCore};
use serde::Serialize;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Number of random bytes in a rotated key.
pub const KEY_BYTES: usize = 32;

/// Body of a rotation PUT: `{"k": "<64 lowercase hex chars>"}`.
///
/// The vault's key-import API documents a full JSON Web Key (`kty` and the
/// type-specific fields) under a `key` member. This body carries only `k` and
/// is sent as-is; a vault that enforces the documented schema will reject it.
#[derive(Serialize, Zeroize, ZeroizeOnDrop)]
pub struct RotationRequest {
    k: String,
}

impl RotationRequest {
    /// Draw [`KEY_BYTES`] bytes from the OS random source and hex-encode them.
    ///
    /// # Errors
    ///
    /// Returns the random source's error if it cannot supply bytes.
    pub fn generate() -> Result<Self, rand::Error> {
        let mut bytes = [0u8; KEY_BYTES];
        OsRng.try_fill_bytes(&mut bytes)?;
        let k = hex::encode(bytes);
        bytes.zeroize();
        Ok(Self { k })
    }

    /// Hex-encoded key value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.k
    }
}

impl fmt::Debug for RotationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotationRequest")
            .field("k", &"[REDACTED]")
            .finish()
    }
}
