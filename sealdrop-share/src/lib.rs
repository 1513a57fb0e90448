//! High-level Sealdrop client.
//!
//! Ties the encryption core to the storage ports:
//! - [`IdentityManager`] — keypair creation, passphrase custody, directory
//!   publication, session unlock
//! - [`ShareClient`] — upload (encrypt once, wrap per recipient, persist
//!   atomically) and download (locate own wrap record, unwrap, decrypt)

pub mod client;
pub mod config;
pub mod error;
pub mod identity;

pub use client::{DownloadedFile, ShareClient};
pub use config::ShareConfig;
pub use error::{ShareError, ShareResult};
pub use identity::IdentityManager;
