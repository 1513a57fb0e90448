//! ML-KEM-768 key encapsulation adapter.
//!
//! A single fixed interface over the linked KEM implementation: `keypair`,
//! `encapsulate`, `decapsulate`, all on raw encoded bytes. The [`MlKem`]
//! handle is constructed explicitly and passed to the
//! [`KeyWrapEngine`](crate::wrap::KeyWrapEngine); nothing here is cached in
//! module state.
//!
//! ML-KEM decapsulation uses implicit rejection: a ciphertext produced for a
//! different keypair decapsulates without error into a deterministic wrong
//! secret, and the mismatch only becomes observable when the downstream AEAD
//! tag fails. [`CryptoError::Decapsulation`] therefore covers malformed key
//! or ciphertext material, not wrong-recipient cases.

use core::fmt;

use ml_kem::kem::{Decapsulate, Encapsulate};
use ml_kem::{Ciphertext, EncodedSizeUser, KemCore, MlKem768};
use rand::rngs::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// ML-KEM-768 encapsulation (public) key length in bytes.
pub const PUBLIC_KEY_SIZE: usize = 1184;

/// ML-KEM-768 decapsulation (private) key length in bytes.
pub const PRIVATE_KEY_SIZE: usize = 2400;

/// ML-KEM-768 ciphertext length in bytes.
pub const KEM_CIPHERTEXT_SIZE: usize = 1088;

/// KEM shared secret length in bytes.
pub const SHARED_SECRET_SIZE: usize = 32;

/// KEM keypair as raw encoded bytes.
///
/// The public key is published to the key directory; the private key goes
/// straight to passphrase custody and must never be persisted in the clear.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KemKeyPair {
    pub public_key: Vec<u8>,
    pub private_key: Vec<u8>,
}

impl fmt::Debug for KemKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KemKeyPair")
            .field("public_key", &format_args!("{} bytes", self.public_key.len()))
            .field("private_key", &"REDACTED")
            .finish()
    }
}

/// Shared secret recovered from encapsulation or decapsulation.
///
/// Exists only transiently while a wrap key is derived from it; zeroized on
/// drop and never persisted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_SIZE]);

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(REDACTED)")
    }
}

/// Owned handle over the linked ML-KEM implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct MlKem;

impl MlKem {
    pub fn new() -> Self {
        Self
    }

    /// Generates a fresh ML-KEM-768 keypair.
    pub fn generate_keypair(&self) -> KemKeyPair {
        let mut rng = OsRng;
        let (dk, ek) = MlKem768::generate(&mut rng);
        KemKeyPair {
            public_key: ek.as_bytes().to_vec(),
            private_key: dk.as_bytes().to_vec(),
        }
    }

    /// Encapsulates against a recipient public key, returning the KEM
    /// ciphertext and the shared secret.
    pub fn encapsulate(&self, public_key: &[u8]) -> CryptoResult<(Vec<u8>, SharedSecret)> {
        let encoded = public_key.try_into().map_err(|_| {
            CryptoError::Validation(format!(
                "recipient public key must be {PUBLIC_KEY_SIZE} bytes, got {}",
                public_key.len()
            ))
        })?;
        let ek = <MlKem768 as KemCore>::EncapsulationKey::from_bytes(&encoded);

        let mut rng = OsRng;
        let (ct, shared) = ek
            .encapsulate(&mut rng)
            .map_err(|_| CryptoError::Encryption("kem encapsulation failed".to_string()))?;

        let mut secret = [0u8; SHARED_SECRET_SIZE];
        secret.copy_from_slice(shared.as_slice());
        Ok((ct.as_slice().to_vec(), SharedSecret(secret)))
    }

    /// Recovers the shared secret from a KEM ciphertext with the matching
    /// private key.
    pub fn decapsulate(&self, kem_ciphertext: &[u8], private_key: &[u8]) -> CryptoResult<SharedSecret> {
        let encoded = private_key
            .try_into()
            .map_err(|_| CryptoError::Decapsulation("private key length"))?;
        let dk = <MlKem768 as KemCore>::DecapsulationKey::from_bytes(&encoded);

        let ct: Ciphertext<MlKem768> = kem_ciphertext
            .try_into()
            .map_err(|_| CryptoError::Decapsulation("ciphertext length"))?;

        let shared = dk
            .decapsulate(&ct)
            .map_err(|_| CryptoError::Decapsulation("decapsulation failed"))?;

        let mut secret = [0u8; SHARED_SECRET_SIZE];
        secret.copy_from_slice(shared.as_slice());
        Ok(SharedSecret(secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypair_has_expected_encoded_sizes() {
        let kp = MlKem::new().generate_keypair();
        assert_eq!(kp.public_key.len(), PUBLIC_KEY_SIZE);
        assert_eq!(kp.private_key.len(), PRIVATE_KEY_SIZE);
    }

    #[test]
    fn encapsulate_decapsulate_agree() {
        let kem = MlKem::new();
        let kp = kem.generate_keypair();

        let (ct, secret_enc) = kem.encapsulate(&kp.public_key).unwrap();
        assert_eq!(ct.len(), KEM_CIPHERTEXT_SIZE);

        let secret_dec = kem.decapsulate(&ct, &kp.private_key).unwrap();
        assert_eq!(secret_enc.as_bytes(), secret_dec.as_bytes());
    }

    #[test]
    fn wrong_private_key_yields_different_secret() {
        let kem = MlKem::new();
        let alice = kem.generate_keypair();
        let mallory = kem.generate_keypair();

        let (ct, secret) = kem.encapsulate(&alice.public_key).unwrap();
        // Implicit rejection: no error, but the secret must not match.
        let decapsulated = kem.decapsulate(&ct, &mallory.private_key).unwrap();
        assert_ne!(secret.as_bytes(), decapsulated.as_bytes());
    }

    #[test]
    fn truncated_public_key_rejected() {
        let kem = MlKem::new();
        let kp = kem.generate_keypair();
        let err = kem.encapsulate(&kp.public_key[..100]).unwrap_err();
        assert!(matches!(err, CryptoError::Validation(_)));
    }

    #[test]
    fn truncated_ciphertext_rejected() {
        let kem = MlKem::new();
        let kp = kem.generate_keypair();
        let err = kem.decapsulate(&[0u8; 16], &kp.private_key).unwrap_err();
        assert!(matches!(err, CryptoError::Decapsulation(_)));
    }

    #[test]
    fn keypair_debug_redacts_private_key() {
        let kp = MlKem::new().generate_keypair();
        let debug = format!("{kp:?}");
        assert!(debug.contains("REDACTED"));
    }
}
