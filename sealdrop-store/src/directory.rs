//! Public-key directory port.
//!
//! Entries are mutable (last write wins) and unauthenticated: no proof of
//! possession is required to register a key. Trusting the directory is an
//! explicit assumption of the protocol; this layer cannot verify it.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{StoreError, StoreResult};

/// Rejects ids that are empty or would escape a per-id file path.
pub(crate) fn validate_id(id: &str) -> StoreResult<()> {
    if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// Published KEM public keys, keyed by user id.
pub trait KeyDirectory: Send + Sync {
    /// Publishes (or replaces) a user's public key.
    fn register(&self, user_id: &str, public_key: &[u8]) -> StoreResult<()>;

    /// Fetches a user's current public key.
    fn lookup(&self, user_id: &str) -> StoreResult<Vec<u8>>;
}

/// In-memory directory.
#[derive(Default)]
pub struct MemoryDirectory {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyDirectory for MemoryDirectory {
    fn register(&self, user_id: &str, public_key: &[u8]) -> StoreResult<()> {
        validate_id(user_id)?;
        self.entries
            .write()
            .map_err(|e| StoreError::Storage(e.to_string()))?
            .insert(user_id.to_string(), public_key.to_vec());
        Ok(())
    }

    fn lookup(&self, user_id: &str) -> StoreResult<Vec<u8>> {
        validate_id(user_id)?;
        self.entries
            .read()
            .map_err(|e| StoreError::Storage(e.to_string()))?
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("public key for {user_id}")))
    }
}

/// Directory persisted as one Base64 text file per user under a root
/// directory.
pub struct FsDirectory {
    root: PathBuf,
}

impl FsDirectory {
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn entry_path(&self, user_id: &str) -> PathBuf {
        self.root.join(format!("{user_id}.pub"))
    }
}

impl KeyDirectory for FsDirectory {
    fn register(&self, user_id: &str, public_key: &[u8]) -> StoreResult<()> {
        validate_id(user_id)?;
        let path = self.entry_path(user_id);
        // Stage then rename so a concurrent lookup never reads a torn entry.
        let staged = self.root.join(format!(".{user_id}.pub.tmp"));
        fs::write(&staged, STANDARD.encode(public_key))?;
        fs::rename(&staged, &path)?;
        Ok(())
    }

    fn lookup(&self, user_id: &str) -> StoreResult<Vec<u8>> {
        validate_id(user_id)?;
        let path = self.entry_path(user_id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(format!("public key for {user_id}")));
            }
            Err(e) => return Err(e.into()),
        };
        STANDARD
            .decode(text.trim())
            .map_err(|e| StoreError::Storage(format!("corrupt directory entry: {e}")))
    }
}
