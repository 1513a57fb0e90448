//! File envelope assembly and recipient lookup.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cipher::EncryptedData;
use crate::error::{CryptoError, CryptoResult};
use crate::wrap::RecipientWrap;

/// The complete persisted/transmitted bundle: file ciphertext plus every
/// recipient's wrap record.
///
/// Immutable once assembled. Adding a recipient later would require the file
/// key again, so the list is fixed at creation; sharing with someone new
/// means re-running the whole protocol.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEnvelope {
    pub filename: String,
    /// File body nonce + ciphertext.
    pub file: EncryptedData,
    /// One wrap record per recipient; non-empty, unique user ids.
    pub recipients: Vec<RecipientWrap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,
    /// Unix timestamp of assembly.
    pub created_at: i64,
}

impl FileEnvelope {
    /// Assembles an envelope from the encrypted file body and the
    /// per-recipient wrap records.
    ///
    /// Fails with [`CryptoError::Validation`] on an empty recipient list or
    /// duplicate user ids.
    pub fn assemble(
        filename: impl Into<String>,
        file: EncryptedData,
        recipients: Vec<RecipientWrap>,
        uploader: Option<String>,
    ) -> CryptoResult<Self> {
        let envelope = Self {
            filename: filename.into(),
            file,
            recipients,
            uploader,
            created_at: chrono::Utc::now().timestamp(),
        };
        envelope.validate()?;
        Ok(envelope)
    }

    /// Re-checks assembly invariants, for envelopes arriving from an
    /// untrusted source.
    pub fn validate(&self) -> CryptoResult<()> {
        if self.recipients.is_empty() {
            return Err(CryptoError::Validation(
                "envelope has no recipients".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for wrap in &self.recipients {
            if !seen.insert(wrap.user_id.as_str()) {
                return Err(CryptoError::Validation(format!(
                    "duplicate recipient {}",
                    wrap.user_id
                )));
            }
        }
        Ok(())
    }

    /// Returns the wrap record for `user_id`, or
    /// [`CryptoError::NotARecipient`].
    ///
    /// A linear scan: recipient lists are tens of entries, not millions.
    pub fn wrap_for_user(&self, user_id: &str) -> CryptoResult<&RecipientWrap> {
        self.recipients
            .iter()
            .find(|wrap| wrap.user_id == user_id)
            .ok_or_else(|| CryptoError::NotARecipient(user_id.to_string()))
    }

    /// Encodes to the binary attachment form (CBOR with raw byte strings).
    pub fn to_bytes(&self) -> CryptoResult<Vec<u8>> {
        serde_cbor::to_vec(self).map_err(|e| CryptoError::Serialization(e.to_string()))
    }

    /// Decodes the binary attachment form, re-validating the recipient list.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let envelope: Self = serde_cbor::from_slice(bytes)
            .map_err(|e| CryptoError::Validation(format!("malformed envelope: {e}")))?;
        envelope.validate()?;
        Ok(envelope)
    }
}
