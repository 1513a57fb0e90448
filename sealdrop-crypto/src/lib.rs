//! Encryption core for Sealdrop.
//!
//! Implements the encrypt-once, share-to-many protocol using:
//! - ML-KEM-768 for per-recipient key encapsulation
//! - HKDF-SHA256 for wrap-key derivation
//! - ChaCha20-Poly1305 for authenticated encryption of file bodies and keys
//! - PBKDF2-HMAC-SHA256 for passphrase protection of the private key
//!
//! # Architecture
//!
//! A file is encrypted exactly once under a random **file key**. For each
//! recipient, the file key is then wrapped independently:
//!
//! 1. ML-KEM encapsulation against the recipient's public key yields a
//!    ciphertext and a shared secret.
//! 2. HKDF-SHA256 over the shared secret and a fresh salt derives a wrap key.
//! 3. The file key is AEAD-encrypted under the wrap key.
//!
//! The file ciphertext and all wrap records travel together as a
//! [`FileEnvelope`]. Adding a recipient after assembly would require the file
//! key again, so the recipient list is fixed at creation.
//!
//! The user's own private key never leaves the device in the clear; it is
//! held passphrase-encrypted as a [`StoredPrivateKeyBlob`].

mod cipher;
pub mod custody;
mod encoding;
pub mod envelope;
mod error;
mod file;
mod kem;
mod key;
pub mod wrap;

pub use cipher::{EncryptedData, NONCE_SIZE, TAG_SIZE, decrypt, encrypt};
pub use custody::{StoredPrivateKeyBlob, lock_private_key, unlock_private_key};
pub use envelope::FileEnvelope;
pub use error::{CryptoError, CryptoResult};
pub use file::{decrypt_file, encrypt_file};
pub use kem::{
    KEM_CIPHERTEXT_SIZE, KemKeyPair, MlKem, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, SHARED_SECRET_SIZE,
    SharedSecret,
};
pub use key::{
    KEY_SIZE, KdfParams, MIN_KDF_ITERATIONS, SALT_SIZE, Salt, SymmetricKey, derive_key,
    derive_wrap_key,
};
pub use wrap::{KeyWrapEngine, RecipientWrap};
