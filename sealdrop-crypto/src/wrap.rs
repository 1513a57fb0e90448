//! Per-recipient file-key wrapping.
//!
//! Each recipient gets an independent wrap record: ML-KEM encapsulation
//! against their public key, HKDF-SHA256 over the shared secret with a fresh
//! salt, and an AEAD encryption of the file key under the derived wrap key.
//! The shared secret and wrap key are dropped (and zeroized) before the
//! record is returned; neither is ever persisted.

use serde::{Deserialize, Serialize};

use crate::cipher::{EncryptedData, decrypt, encrypt};
use crate::error::{CryptoError, CryptoResult};
use crate::kem::MlKem;
use crate::key::{KEY_SIZE, Salt, SymmetricKey, derive_wrap_key};

/// One recipient's wrapped copy of a file key.
///
/// The KEM ciphertext and salt are unique per (file, recipient) pair, so a
/// compromise of one derived key never propagates to other ciphertexts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipientWrap {
    /// Recipient user id, as registered in the key directory.
    pub user_id: String,
    /// ML-KEM ciphertext encapsulating this recipient's shared secret.
    #[serde(with = "crate::encoding::b64")]
    pub kem_ciphertext: Vec<u8>,
    /// Salt fed to HKDF alongside the shared secret.
    pub kdf_salt: Salt,
    /// File key encrypted under the derived wrap key.
    pub wrapped_key: EncryptedData,
}

/// Wraps and unwraps file keys for recipients.
///
/// Holds the injected KEM handle; construct one per client rather than
/// reaching for global state.
#[derive(Clone, Debug)]
pub struct KeyWrapEngine {
    kem: MlKem,
}

impl KeyWrapEngine {
    pub fn new(kem: MlKem) -> Self {
        Self { kem }
    }

    /// Wraps `file_key` for the holder of `public_key`.
    ///
    /// Draws a fresh salt and nonce on every call, so repeated wraps of the
    /// same key for the same recipient never share derived material.
    pub fn wrap_for(
        &self,
        user_id: &str,
        public_key: &[u8],
        file_key: &SymmetricKey,
    ) -> CryptoResult<RecipientWrap> {
        let (kem_ciphertext, shared_secret) = self.kem.encapsulate(public_key)?;
        let kdf_salt = Salt::random();
        let wrap_key = derive_wrap_key(&shared_secret, &kdf_salt)?;
        let wrapped_key = encrypt(&wrap_key, file_key.as_bytes())?;

        Ok(RecipientWrap {
            user_id: user_id.to_string(),
            kem_ciphertext,
            kdf_salt,
            wrapped_key,
        })
    }

    /// Recovers the file key from `wrap` using the recipient's private key.
    ///
    /// A wrong private key usually surfaces as
    /// [`CryptoError::Integrity`]: ML-KEM decapsulation rejects implicitly,
    /// so the mismatch is only caught by the AEAD tag on the wrapped key.
    pub fn unwrap_with(
        &self,
        private_key: &[u8],
        wrap: &RecipientWrap,
    ) -> CryptoResult<SymmetricKey> {
        let shared_secret = self.kem.decapsulate(&wrap.kem_ciphertext, private_key)?;
        let wrap_key = derive_wrap_key(&shared_secret, &wrap.kdf_salt)?;
        let plaintext = decrypt(&wrap_key, &wrap.wrapped_key)?;

        if plaintext.len() != KEY_SIZE {
            return Err(CryptoError::Integrity);
        }
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(&plaintext);
        Ok(SymmetricKey::from_bytes(bytes))
    }
}
