//! Passphrase protection for the user's KEM private key.
//!
//! A separate AEAD + KDF instance from file encryption: the passphrase is
//! stretched with PBKDF2-HMAC-SHA256 and the private key encrypted under the
//! result. The blob lives in local secure storage and is never transmitted.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::cipher::{EncryptedData, decrypt, encrypt};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{KdfParams, Salt, derive_key};

/// Passphrase-encrypted private key, as held in local secure storage.
///
/// Bundles the PBKDF2 salt with the encrypted key so the passphrase is the
/// only input needed to unlock.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredPrivateKeyBlob {
    pub kdf_salt: Salt,
    pub encrypted: EncryptedData,
}

/// Locks a private key under a passphrase.
///
/// Draws an independent random salt and a fresh nonce on every call.
pub fn lock_private_key(
    passphrase: &str,
    private_key: &[u8],
    params: &KdfParams,
) -> CryptoResult<StoredPrivateKeyBlob> {
    let kdf_salt = Salt::random();
    let key = derive_key(passphrase, &kdf_salt, params)?;
    let encrypted = encrypt(&key, private_key)?;

    Ok(StoredPrivateKeyBlob { kdf_salt, encrypted })
}

/// Unlocks a stored private key.
///
/// A wrong passphrase and a corrupted blob fail identically with
/// [`CryptoError::InvalidPassphrase`]; callers get no oracle to tell the two
/// apart. The returned buffer is zeroized on drop.
pub fn unlock_private_key(
    passphrase: &str,
    blob: &StoredPrivateKeyBlob,
    params: &KdfParams,
) -> CryptoResult<Zeroizing<Vec<u8>>> {
    let key = derive_key(passphrase, &blob.kdf_salt, params)?;
    let plaintext = decrypt(&key, &blob.encrypted).map_err(|_| CryptoError::InvalidPassphrase)?;
    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_unlock_roundtrip() {
        let private_key = vec![0x5A; 64];
        let params = KdfParams::default();

        let blob = lock_private_key("correct-horse-battery-staple", &private_key, &params).unwrap();
        let recovered =
            unlock_private_key("correct-horse-battery-staple", &blob, &params).unwrap();

        assert_eq!(recovered.as_slice(), private_key.as_slice());
    }

    #[test]
    fn wrong_passphrase_fails() {
        let params = KdfParams::default();
        let blob = lock_private_key("right", &[1, 2, 3], &params).unwrap();

        let err = unlock_private_key("wrong", &blob, &params).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidPassphrase));
    }

    #[test]
    fn corrupted_blob_fails_like_wrong_passphrase() {
        let params = KdfParams::default();
        let mut blob = lock_private_key("right", &[1, 2, 3], &params).unwrap();
        blob.encrypted.ciphertext[0] ^= 0xFF;

        let err = unlock_private_key("right", &blob, &params).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidPassphrase));
    }
}
