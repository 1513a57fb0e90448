//! Identity lifecycle: keypair creation, custody, publication, unlock.

use std::sync::Arc;

use sealdrop_crypto::{KdfParams, MlKem, lock_private_key, unlock_private_key};
use sealdrop_store::{KeyDirectory, PrivateKeyStore};
use tracing::info;
use zeroize::Zeroizing;

use crate::config::ShareConfig;
use crate::error::{ShareError, ShareResult};

/// Manages the local user's KEM keypair.
///
/// The private key is held passphrase-encrypted in the key store and only
/// exists in the clear inside the unlocked session, which is zeroized on
/// drop or lock.
pub struct IdentityManager {
    directory: Arc<dyn KeyDirectory>,
    key_store: Arc<dyn PrivateKeyStore>,
    kem: MlKem,
    kdf: KdfParams,
    session: Option<Zeroizing<Vec<u8>>>,
}

impl IdentityManager {
    pub fn new(
        directory: Arc<dyn KeyDirectory>,
        key_store: Arc<dyn PrivateKeyStore>,
        config: &ShareConfig,
    ) -> Self {
        Self {
            directory,
            key_store,
            kem: MlKem::new(),
            kdf: config.kdf_params(),
            session: None,
        }
    }

    /// Generates a keypair, locks the private key under `passphrase`, and
    /// publishes the public key to the directory.
    ///
    /// Replaces any existing identity: the directory entry is overwritten,
    /// and wrap records created against the old public key become
    /// permanently undecryptable. The fresh keypair is left unlocked in the
    /// session.
    pub fn create_identity(&mut self, user_id: &str, passphrase: &str) -> ShareResult<()> {
        let keypair = self.kem.generate_keypair();
        let blob = lock_private_key(passphrase, &keypair.private_key, &self.kdf)?;
        self.key_store.save(&blob)?;
        self.directory.register(user_id, &keypair.public_key)?;
        info!("registered public key for {user_id}");

        self.session = Some(Zeroizing::new(keypair.private_key.clone()));
        Ok(())
    }

    /// Unlocks the stored private key into the session.
    pub fn unlock(&mut self, passphrase: &str) -> ShareResult<()> {
        let blob = self.key_store.load()?.ok_or(ShareError::NoStoredKey)?;
        let private_key = unlock_private_key(passphrase, &blob, &self.kdf)?;
        self.session = Some(private_key);
        Ok(())
    }

    /// Drops the unlocked private key from memory, keeping the stored blob.
    pub fn lock(&mut self) {
        self.session = None;
    }

    /// Removes both the unlocked session and the stored blob.
    pub fn clear_identity(&mut self) -> ShareResult<()> {
        self.session = None;
        self.key_store.clear()?;
        Ok(())
    }

    /// Returns whether a private key is unlocked in the session.
    pub fn is_unlocked(&self) -> bool {
        self.session.is_some()
    }

    /// The unlocked private key, or [`ShareError::Locked`].
    pub fn private_key(&self) -> ShareResult<&[u8]> {
        self.session
            .as_deref()
            .map(Vec::as_slice)
            .ok_or(ShareError::Locked)
    }
}
