//! ChaCha20-Poly1305 authenticated encryption.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};
use crate::key::SymmetricKey;

/// ChaCha20-Poly1305 nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// Nonce + ciphertext pair produced by [`encrypt`].
///
/// In textual payloads (JSON) both fields serialize as Base64 strings; in
/// binary payloads (CBOR) they serialize as raw byte strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncryptedData {
    #[serde(with = "crate::encoding::b64_array")]
    pub nonce: [u8; NONCE_SIZE],
    #[serde(with = "crate::encoding::b64")]
    pub ciphertext: Vec<u8>,
}

impl EncryptedData {
    /// Compact single-string form: `base64(nonce || ciphertext)`.
    pub fn to_base64(&self) -> String {
        let mut combined = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        combined.extend_from_slice(&self.nonce);
        combined.extend_from_slice(&self.ciphertext);
        STANDARD.encode(&combined)
    }

    /// Parses the compact form produced by [`Self::to_base64`].
    pub fn from_base64(text: &str) -> CryptoResult<Self> {
        let combined = STANDARD
            .decode(text)
            .map_err(|e| CryptoError::Validation(format!("invalid base64: {e}")))?;
        if combined.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CryptoError::Validation(format!(
                "encrypted payload too short: {} bytes",
                combined.len()
            )));
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&combined[..NONCE_SIZE]);
        Ok(Self {
            nonce,
            ciphertext: combined[NONCE_SIZE..].to_vec(),
        })
    }
}

/// Encrypts `plaintext` under `key` with a fresh random nonce.
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> CryptoResult<EncryptedData> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));

    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::Encryption("aead encryption failed".to_string()))?;

    Ok(EncryptedData { nonce, ciphertext })
}

/// Decrypts and authenticates. Fails with [`CryptoError::Integrity`] on any
/// tag mismatch; callers must not attempt partial recovery.
pub fn decrypt(key: &SymmetricKey, data: &EncryptedData) -> CryptoResult<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    cipher
        .decrypt(Nonce::from_slice(&data.nonce), data.ciphertext.as_ref())
        .map_err(|_| CryptoError::Integrity)
}
