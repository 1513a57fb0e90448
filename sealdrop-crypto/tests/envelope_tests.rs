//! Envelope assembly, validation, recipient lookup, and wire-format tests.

use sealdrop_crypto::{
    CryptoError, FileEnvelope, KeyWrapEngine, MlKem, RecipientWrap, SymmetricKey, encrypt_file,
};

fn wrapped_for(user_ids: &[&str]) -> (SymmetricKey, Vec<RecipientWrap>) {
    let kem = MlKem::new();
    let engine = KeyWrapEngine::new(kem);
    let file_key = SymmetricKey::generate();

    let recipients = user_ids
        .iter()
        .map(|uid| {
            let kp = kem.generate_keypair();
            engine.wrap_for(uid, &kp.public_key, &file_key).unwrap()
        })
        .collect();
    (file_key, recipients)
}

#[test]
fn assemble_and_find_recipient() {
    let (_, sealed) = encrypt_file(b"payload").unwrap();
    let (_, recipients) = wrapped_for(&["bob", "carol"]);

    let envelope =
        FileEnvelope::assemble("report.pdf", sealed, recipients, Some("alice".into())).unwrap();

    assert_eq!(envelope.filename, "report.pdf");
    assert_eq!(envelope.uploader.as_deref(), Some("alice"));
    assert_eq!(envelope.wrap_for_user("bob").unwrap().user_id, "bob");
    assert_eq!(envelope.wrap_for_user("carol").unwrap().user_id, "carol");
}

#[test]
fn non_recipient_lookup_fails() {
    let (_, sealed) = encrypt_file(b"payload").unwrap();
    let (_, recipients) = wrapped_for(&["bob", "carol"]);
    let envelope = FileEnvelope::assemble("f.bin", sealed, recipients, None).unwrap();

    let err = envelope.wrap_for_user("eve").unwrap_err();
    assert!(matches!(err, CryptoError::NotARecipient(ref user) if user == "eve"));
}

#[test]
fn empty_recipient_list_rejected() {
    let (_, sealed) = encrypt_file(b"payload").unwrap();

    let err = FileEnvelope::assemble("f.bin", sealed, Vec::new(), None).unwrap_err();
    assert!(matches!(err, CryptoError::Validation(_)));
}

#[test]
fn duplicate_recipients_rejected() {
    let (_, sealed) = encrypt_file(b"payload").unwrap();
    let (_, mut recipients) = wrapped_for(&["bob"]);
    recipients.push(recipients[0].clone());

    let err = FileEnvelope::assemble("f.bin", sealed, recipients, None).unwrap_err();
    assert!(matches!(err, CryptoError::Validation(_)));
}

#[test]
fn json_roundtrip_is_exact() {
    let (_, sealed) = encrypt_file(b"textual wire form").unwrap();
    let (_, recipients) = wrapped_for(&["bob"]);
    let envelope = FileEnvelope::assemble("f.bin", sealed, recipients, None).unwrap();

    let json = serde_json::to_string(&envelope).unwrap();
    let restored: FileEnvelope = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, envelope);
}

#[test]
fn json_carries_binary_fields_as_base64_strings() {
    let (_, sealed) = encrypt_file(b"payload").unwrap();
    let (_, recipients) = wrapped_for(&["bob"]);
    let envelope = FileEnvelope::assemble("f.bin", sealed, recipients, None).unwrap();

    let value: serde_json::Value = serde_json::to_value(&envelope).unwrap();
    assert!(value["file"]["ciphertext"].is_string());
    assert!(value["file"]["nonce"].is_string());
    assert!(value["recipients"][0]["kem_ciphertext"].is_string());
    assert!(value["recipients"][0]["kdf_salt"].is_string());
    assert!(value["recipients"][0]["wrapped_key"]["ciphertext"].is_string());
}

#[test]
fn binary_roundtrip_is_exact() {
    let (_, sealed) = encrypt_file(b"binary wire form").unwrap();
    let (_, recipients) = wrapped_for(&["bob", "carol"]);
    let envelope = FileEnvelope::assemble("f.bin", sealed, recipients, Some("alice".into())).unwrap();

    let bytes = envelope.to_bytes().unwrap();
    let restored = FileEnvelope::from_bytes(&bytes).unwrap();
    assert_eq!(restored, envelope);
}

#[test]
fn binary_form_is_smaller_than_json_form() {
    // Raw byte strings vs Base64 text: the binary form should win clearly.
    let (_, sealed) = encrypt_file(&[0xA5; 4096]).unwrap();
    let (_, recipients) = wrapped_for(&["bob"]);
    let envelope = FileEnvelope::assemble("f.bin", sealed, recipients, None).unwrap();

    let bytes = envelope.to_bytes().unwrap();
    let json = serde_json::to_vec(&envelope).unwrap();
    assert!(bytes.len() < json.len());
}

#[test]
fn truncated_binary_envelope_rejected() {
    let (_, sealed) = encrypt_file(b"payload").unwrap();
    let (_, recipients) = wrapped_for(&["bob"]);
    let envelope = FileEnvelope::assemble("f.bin", sealed, recipients, None).unwrap();

    let bytes = envelope.to_bytes().unwrap();
    let err = FileEnvelope::from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err, CryptoError::Validation(_)));
}

#[test]
fn decoded_envelope_with_no_recipients_rejected() {
    let (_, sealed) = encrypt_file(b"payload").unwrap();
    let (_, recipients) = wrapped_for(&["bob"]);
    let mut envelope = FileEnvelope::assemble("f.bin", sealed, recipients, None).unwrap();

    // Forge a stored envelope whose recipient list was stripped.
    envelope.recipients.clear();
    let bytes = serde_cbor_bytes(&envelope);

    let err = FileEnvelope::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, CryptoError::Validation(_)));
}

// Bypasses `to_bytes` so invalid envelopes can be encoded for negative tests.
fn serde_cbor_bytes(envelope: &FileEnvelope) -> Vec<u8> {
    serde_cbor::to_vec(envelope).unwrap()
}

// Property-based tests
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use sealdrop_crypto::decrypt_file;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn file_encryption_always_roundtrips(plaintext in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let (file_key, sealed) = encrypt_file(&plaintext).unwrap();
            prop_assert_eq!(decrypt_file(&file_key, &sealed).unwrap(), plaintext);
        }
    }
}
