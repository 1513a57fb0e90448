//! Envelope persistence port.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use sealdrop_crypto::FileEnvelope;
use uuid::Uuid;

use crate::directory::validate_id;
use crate::error::{StoreError, StoreResult};

/// Persisted file envelopes, keyed by assigned file id.
///
/// Implementations must round-trip every field byte-exactly, and `put` must
/// be atomic from the caller's point of view: a reader can never observe an
/// envelope with the ciphertext present but wrap records missing.
pub trait EnvelopeStore: Send + Sync {
    /// Persists a complete envelope, returning its assigned file id.
    fn put(&self, envelope: &FileEnvelope) -> StoreResult<String>;

    /// Fetches an envelope by file id.
    fn get(&self, file_id: &str) -> StoreResult<FileEnvelope>;
}

/// In-memory envelope store.
#[derive(Default)]
pub struct MemoryEnvelopeStore {
    envelopes: RwLock<HashMap<String, FileEnvelope>>,
}

impl MemoryEnvelopeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored envelopes.
    pub fn len(&self) -> usize {
        self.envelopes.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EnvelopeStore for MemoryEnvelopeStore {
    fn put(&self, envelope: &FileEnvelope) -> StoreResult<String> {
        envelope.validate()?;
        let file_id = Uuid::new_v4().to_string();
        self.envelopes
            .write()
            .map_err(|e| StoreError::Storage(e.to_string()))?
            .insert(file_id.clone(), envelope.clone());
        Ok(file_id)
    }

    fn get(&self, file_id: &str) -> StoreResult<FileEnvelope> {
        self.envelopes
            .read()
            .map_err(|e| StoreError::Storage(e.to_string()))?
            .get(file_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("envelope {file_id}")))
    }
}

/// Envelope store persisting each envelope as one binary file
/// (`<file_id>.env`, the envelope's CBOR attachment form) under a root
/// directory.
pub struct FsEnvelopeStore {
    root: PathBuf,
}

impl FsEnvelopeStore {
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn envelope_path(&self, file_id: &str) -> PathBuf {
        self.root.join(format!("{file_id}.env"))
    }
}

impl EnvelopeStore for FsEnvelopeStore {
    fn put(&self, envelope: &FileEnvelope) -> StoreResult<String> {
        envelope.validate()?;
        let file_id = Uuid::new_v4().to_string();
        let bytes = envelope.to_bytes()?;

        // Stage the whole envelope, then publish with a single rename. A
        // crash mid-write leaves only a staging file that `get` never reads.
        let staged = self.root.join(format!(".{file_id}.tmp"));
        fs::write(&staged, &bytes)?;
        fs::rename(&staged, self.envelope_path(&file_id))?;

        Ok(file_id)
    }

    fn get(&self, file_id: &str) -> StoreResult<FileEnvelope> {
        validate_id(file_id)?;
        let path = self.envelope_path(file_id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(format!("envelope {file_id}")));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(FileEnvelope::from_bytes(&bytes)?)
    }
}
