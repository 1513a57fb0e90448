//! Local secure storage port for the passphrase-locked private key.
//!
//! Single slot per device: one stored private key at a time. Re-saving
//! replaces the previous blob; multi-identity storage is out of scope.

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use sealdrop_crypto::StoredPrivateKeyBlob;

use crate::error::{StoreError, StoreResult};

/// The device's single passphrase-locked private key slot.
pub trait PrivateKeyStore: Send + Sync {
    /// Saves (or replaces) the stored key blob.
    fn save(&self, blob: &StoredPrivateKeyBlob) -> StoreResult<()>;

    /// Loads the stored key blob, if any.
    fn load(&self) -> StoreResult<Option<StoredPrivateKeyBlob>>;

    /// Removes the stored key blob. Succeeds if the slot is already empty.
    fn clear(&self) -> StoreResult<()>;
}

/// In-memory key slot.
#[derive(Default)]
pub struct MemoryPrivateKeyStore {
    slot: RwLock<Option<StoredPrivateKeyBlob>>,
}

impl MemoryPrivateKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrivateKeyStore for MemoryPrivateKeyStore {
    fn save(&self, blob: &StoredPrivateKeyBlob) -> StoreResult<()> {
        *self
            .slot
            .write()
            .map_err(|e| StoreError::Storage(e.to_string()))? = Some(blob.clone());
        Ok(())
    }

    fn load(&self) -> StoreResult<Option<StoredPrivateKeyBlob>> {
        Ok(self
            .slot
            .read()
            .map_err(|e| StoreError::Storage(e.to_string()))?
            .clone())
    }

    fn clear(&self) -> StoreResult<()> {
        *self
            .slot
            .write()
            .map_err(|e| StoreError::Storage(e.to_string()))? = None;
        Ok(())
    }
}

/// Key slot persisted as a single JSON file.
pub struct FsPrivateKeyStore {
    path: PathBuf,
}

impl FsPrivateKeyStore {
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    fn staged_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }
}

impl PrivateKeyStore for FsPrivateKeyStore {
    fn save(&self, blob: &StoredPrivateKeyBlob) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(blob)?;
        let staged = self.staged_path();
        fs::write(&staged, &json)?;
        fs::rename(&staged, &self.path)?;
        Ok(())
    }

    fn load(&self) -> StoreResult<Option<StoredPrivateKeyBlob>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn clear(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
