//! Client configuration.

use std::path::PathBuf;

use sealdrop_crypto::{KdfParams, MIN_KDF_ITERATIONS};
use serde::{Deserialize, Serialize};

/// Configuration for a Sealdrop client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Root directory for filesystem-backed stores.
    pub data_dir: PathBuf,

    /// PBKDF2 iteration count for private-key custody. Values below the
    /// floor are clamped up.
    pub custody_iterations: u32,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("sealdrop-data"),
            custody_iterations: MIN_KDF_ITERATIONS,
        }
    }
}

impl ShareConfig {
    /// Custody KDF parameters with the iteration floor applied.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            iterations: self.custody_iterations.max(MIN_KDF_ITERATIONS),
        }
    }
}
