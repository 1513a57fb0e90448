//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur during encryption, wrapping, or custody operations.
///
/// Cryptographic failures are deterministic for given inputs; callers must
/// not retry them or fall back to alternative decryption paths. Error
/// messages never carry key material.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Malformed or incomplete input, rejected before any cryptographic work.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The caller is absent from the envelope's recipient list.
    #[error("user {0} is not a recipient of this file")]
    NotARecipient(String),

    /// KEM-level failure: malformed key or ciphertext material.
    #[error("key decapsulation failed: {0}")]
    Decapsulation(&'static str),

    /// AEAD tag verification failed: wrong key or tampered data.
    #[error("integrity check failed (wrong key or tampered data)")]
    Integrity,

    /// Wrong passphrase or corrupted key blob; the two are indistinguishable.
    #[error("invalid passphrase or corrupted key blob")]
    InvalidPassphrase,

    /// Key derivation failure.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// AEAD encryption failure.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Wire-format encoding failure.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
