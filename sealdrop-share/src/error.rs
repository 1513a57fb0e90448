//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ShareResult<T> = Result<T, ShareError>;

/// Errors that can occur in identity and sharing flows.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("crypto error: {0}")]
    Crypto(#[from] sealdrop_crypto::CryptoError),

    #[error("storage error: {0}")]
    Store(#[from] sealdrop_store::StoreError),

    #[error("no stored private key; create or restore an identity first")]
    NoStoredKey,

    #[error("identity is locked; unlock with the passphrase first")]
    Locked,

    #[error("background task failed: {0}")]
    Task(String),
}
