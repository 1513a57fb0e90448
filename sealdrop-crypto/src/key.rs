//! Key material: random symmetric keys, passphrase derivation, wrap-key
//! derivation.
//!
//! Two derivations live here and must not be confused:
//! - [`derive_key`] stretches a low-entropy passphrase with PBKDF2 and is
//!   deliberately slow.
//! - [`derive_wrap_key`] mixes a high-entropy KEM shared secret with HKDF and
//!   is cheap; its context label binds the output to the key-wrap protocol.

use core::fmt;

use hkdf::Hkdf;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};
use crate::kem::SharedSecret;

/// Symmetric key length in bytes (ChaCha20-Poly1305 native).
pub const KEY_SIZE: usize = 32;

/// KDF salt length in bytes, for both wrap and passphrase derivations.
pub const SALT_SIZE: usize = 16;

/// Lowest acceptable PBKDF2 iteration count.
pub const MIN_KDF_ITERATIONS: u32 = 200_000;

/// HKDF context label for wrap-key derivation. Wrap and unwrap must use the
/// same label; a mismatch derives a different key and surfaces as an
/// integrity failure downstream.
pub(crate) const WRAP_CONTEXT: &[u8] = b"file-wrap";

/// A 32-byte symmetric key. Zeroized on drop; `Debug` redacts the bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    /// Generates a fresh random key from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey(REDACTED)")
    }
}

/// Random KDF salt, stored alongside whatever it salted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salt(#[serde(with = "crate::encoding::b64_array")] [u8; SALT_SIZE]);

impl Salt {
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// Parameters for passphrase key derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// PBKDF2-HMAC-SHA256 iteration count.
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: MIN_KDF_ITERATIONS,
        }
    }
}

/// Derives a symmetric key from a passphrase via PBKDF2-HMAC-SHA256.
///
/// Rejects iteration counts below [`MIN_KDF_ITERATIONS`].
pub fn derive_key(passphrase: &str, salt: &Salt, params: &KdfParams) -> CryptoResult<SymmetricKey> {
    if params.iterations < MIN_KDF_ITERATIONS {
        return Err(CryptoError::KeyDerivation(format!(
            "iteration count {} is below the {MIN_KDF_ITERATIONS} floor",
            params.iterations
        )));
    }

    let mut okm = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        passphrase.as_bytes(),
        salt.as_bytes(),
        params.iterations,
        &mut okm,
    );

    let key = SymmetricKey::from_bytes(okm);
    okm.zeroize();
    Ok(key)
}

/// Derives a wrap key from a KEM shared secret via HKDF-SHA256.
pub fn derive_wrap_key(shared_secret: &SharedSecret, salt: &Salt) -> CryptoResult<SymmetricKey> {
    let hk = Hkdf::<Sha256>::new(Some(salt.as_bytes()), shared_secret.as_bytes());
    let mut okm = [0u8; KEY_SIZE];
    hk.expand(WRAP_CONTEXT, &mut okm)
        .map_err(|_| CryptoError::KeyDerivation("hkdf expand failed".to_string()))?;

    let key = SymmetricKey::from_bytes(okm);
    okm.zeroize();
    Ok(key)
}
