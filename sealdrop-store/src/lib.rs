//! Storage ports for Sealdrop.
//!
//! The encryption core talks to three narrow collaborators, each expressed
//! as a trait here with in-memory and filesystem implementations:
//!
//! - [`KeyDirectory`] — published KEM public keys, looked up by user id
//! - [`EnvelopeStore`] — persisted file envelopes, byte-exact round-trip
//! - [`PrivateKeyStore`] — the device's single passphrase-locked private key
//!
//! The in-memory implementations back tests and single-process embedding;
//! the filesystem implementations are the default for a real device.

mod directory;
mod envelope_store;
mod error;
mod key_store;

pub use directory::{FsDirectory, KeyDirectory, MemoryDirectory};
pub use envelope_store::{EnvelopeStore, FsEnvelopeStore, MemoryEnvelopeStore};
pub use error::{StoreError, StoreResult};
pub use key_store::{FsPrivateKeyStore, MemoryPrivateKeyStore, PrivateKeyStore};
