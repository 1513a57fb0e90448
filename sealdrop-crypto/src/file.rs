//! Whole-file encryption under a fresh per-file key.

use crate::cipher::{EncryptedData, decrypt, encrypt};
use crate::error::CryptoResult;
use crate::key::SymmetricKey;

/// Encrypts a file body under a freshly generated random key.
///
/// Returns the transient file key together with the nonce + ciphertext pair.
/// The key exists only in memory: it is wrapped per recipient and never
/// persisted in the clear. No size limit is enforced here; transport and
/// storage layers own their own limits.
pub fn encrypt_file(plaintext: &[u8]) -> CryptoResult<(SymmetricKey, EncryptedData)> {
    let file_key = SymmetricKey::generate();
    let sealed = encrypt(&file_key, plaintext)?;
    Ok((file_key, sealed))
}

/// Decrypts a file body.
///
/// Fails with [`CryptoError::Integrity`](crate::CryptoError::Integrity) if
/// the authentication tag does not verify — corrupted transport, wrong key,
/// or tampering; the caller must not attempt partial recovery.
pub fn decrypt_file(file_key: &SymmetricKey, sealed: &EncryptedData) -> CryptoResult<Vec<u8>> {
    decrypt(file_key, sealed)
}
