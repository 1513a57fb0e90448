//! Upload and download orchestration.

use std::collections::HashSet;
use std::sync::Arc;

use sealdrop_crypto::{
    CryptoError, FileEnvelope, KeyWrapEngine, MlKem, RecipientWrap, decrypt_file, encrypt_file,
};
use sealdrop_store::{EnvelopeStore, KeyDirectory};
use tracing::{debug, info};

use crate::error::{ShareError, ShareResult};

/// A downloaded and decrypted file.
#[derive(Debug)]
pub struct DownloadedFile {
    pub filename: String,
    pub plaintext: Vec<u8>,
}

/// Encrypt-once, share-to-many client over a key directory and an envelope
/// store.
pub struct ShareClient {
    directory: Arc<dyn KeyDirectory>,
    store: Arc<dyn EnvelopeStore>,
    wrap_engine: KeyWrapEngine,
}

impl ShareClient {
    pub fn new(directory: Arc<dyn KeyDirectory>, store: Arc<dyn EnvelopeStore>) -> Self {
        Self::with_kem(directory, store, MlKem::new())
    }

    /// Builds a client around an explicitly constructed KEM handle.
    pub fn with_kem(
        directory: Arc<dyn KeyDirectory>,
        store: Arc<dyn EnvelopeStore>,
        kem: MlKem,
    ) -> Self {
        Self {
            directory,
            store,
            wrap_engine: KeyWrapEngine::new(kem),
        }
    }

    /// Encrypts `plaintext` once and persists an envelope granting access to
    /// every listed recipient. Returns the assigned file id.
    ///
    /// The recipient list is validated before any cryptographic work. Each
    /// recipient's directory lookup and wrap run on their own blocking task,
    /// so one slow lookup never delays the others. On any failure the
    /// generated key material is discarded and nothing is persisted.
    pub async fn upload(
        &self,
        filename: &str,
        plaintext: &[u8],
        recipient_ids: &[String],
        uploader: Option<String>,
    ) -> ShareResult<String> {
        validate_recipient_ids(recipient_ids)?;

        let (file_key, sealed) = encrypt_file(plaintext)?;
        debug!(
            "encrypted {} ({} bytes) for {} recipients",
            filename,
            plaintext.len(),
            recipient_ids.len()
        );

        let mut tasks = Vec::with_capacity(recipient_ids.len());
        for user_id in recipient_ids {
            let directory = Arc::clone(&self.directory);
            let engine = self.wrap_engine.clone();
            let file_key = file_key.clone();
            let user_id = user_id.clone();
            tasks.push(tokio::task::spawn_blocking(
                move || -> ShareResult<RecipientWrap> {
                    let public_key = directory.lookup(&user_id)?;
                    Ok(engine.wrap_for(&user_id, &public_key, &file_key)?)
                },
            ));
        }

        let mut recipients = Vec::with_capacity(tasks.len());
        for task in tasks {
            recipients.push(task.await.map_err(|e| ShareError::Task(e.to_string()))??);
        }

        let envelope = FileEnvelope::assemble(filename, sealed, recipients, uploader)?;
        let file_id = self.store.put(&envelope)?;
        info!(
            "stored envelope {file_id} for {} recipients",
            envelope.recipients.len()
        );
        Ok(file_id)
    }

    /// Fetches an envelope and decrypts it as `user_id`.
    ///
    /// Fails with `NotARecipient` before attempting any decapsulation if the
    /// user has no wrap record in the envelope.
    pub async fn download(
        &self,
        file_id: &str,
        user_id: &str,
        private_key: &[u8],
    ) -> ShareResult<DownloadedFile> {
        let envelope = self.store.get(file_id)?;
        let wrap = envelope.wrap_for_user(user_id)?;

        let file_key = self.wrap_engine.unwrap_with(private_key, wrap)?;
        let plaintext = decrypt_file(&file_key, &envelope.file)?;
        debug!(
            "decrypted {} ({} bytes) for {user_id}",
            envelope.filename,
            plaintext.len()
        );

        Ok(DownloadedFile {
            filename: envelope.filename,
            plaintext,
        })
    }
}

/// Rejects empty and duplicate-bearing recipient lists before any key
/// material is generated.
fn validate_recipient_ids(recipient_ids: &[String]) -> ShareResult<()> {
    if recipient_ids.is_empty() {
        return Err(ShareError::Crypto(CryptoError::Validation(
            "recipient list is empty".to_string(),
        )));
    }
    let mut seen = HashSet::new();
    for user_id in recipient_ids {
        if !seen.insert(user_id.as_str()) {
            return Err(ShareError::Crypto(CryptoError::Validation(format!(
                "duplicate recipient {user_id}"
            ))));
        }
    }
    Ok(())
}
