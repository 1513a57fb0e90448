//! Serde helpers for binary fields.
//!
//! Textual formats (JSON) carry binary fields as standard Base64 strings;
//! binary formats (CBOR) carry them as raw byte strings. Both helpers switch
//! on the (de)serializer's human-readability so the same derives serve both
//! wire forms.

use core::fmt;

use serde::de::{Deserializer, Error as DeError, SeqAccess, Visitor};
use serde::ser::Serializer;

struct BytesVisitor;

impl<'de> Visitor<'de> for BytesVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a byte string")
    }

    fn visit_bytes<E: DeError>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(v.to_vec())
    }

    fn visit_byte_buf<E: DeError>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(v)
    }

    // Some binary formats encode byte strings as sequences of integers.
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        Ok(bytes)
    }
}

fn decode_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    use base64::Engine;
    use serde::Deserialize;

    if deserializer.is_human_readable() {
        let text = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(&text)
            .map_err(DeError::custom)
    } else {
        deserializer.deserialize_byte_buf(BytesVisitor)
    }
}

/// Variable-length binary fields (`Vec<u8>`).
pub mod b64 {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        use base64::Engine;

        if serializer.is_human_readable() {
            serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
        } else {
            serializer.serialize_bytes(bytes)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        decode_bytes(deserializer)
    }
}

/// Fixed-length binary fields (`[u8; N]`); the length is enforced on decode.
pub mod b64_array {
    use super::*;

    pub fn serialize<S: Serializer, const N: usize>(
        bytes: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        super::b64::serialize(bytes, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        let bytes = decode_bytes(deserializer)?;
        <[u8; N]>::try_from(bytes.as_slice())
            .map_err(|_| DeError::invalid_length(bytes.len(), &"fixed-length byte string"))
    }
}
