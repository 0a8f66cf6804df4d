//! The value carried across a pipeline call boundary.

use bytes::Bytes;
use relay_types::error::Result;
use relay_types::TensorMessage;

use crate::codec::PayloadCodec;

/// One tensor message, held either in wire form or in structured form.
///
/// Neither form is mutated after construction. Converting between them is
/// explicit and goes through a [`PayloadCodec`]: encoding is total, decoding
/// validates.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Encoded bytes, sent on the wire untouched.
    Bytes(Bytes),
    Message(TensorMessage),
}

impl Payload {
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Wire form. Byte payloads are returned as-is (a cheap refcount clone).
    pub fn to_bytes(&self, codec: &dyn PayloadCodec) -> Bytes {
        match self {
            Self::Bytes(bytes) => bytes.clone(),
            Self::Message(msg) => codec.encode(msg),
        }
    }

    /// Structured form, decoding byte payloads.
    pub fn to_message(&self, codec: &dyn PayloadCodec) -> Result<TensorMessage> {
        match self {
            Self::Bytes(bytes) => codec.decode(bytes),
            Self::Message(msg) => Ok(msg.clone()),
        }
    }

    pub fn into_message(self, codec: &dyn PayloadCodec) -> Result<TensorMessage> {
        match self {
            Self::Bytes(bytes) => codec.decode(&bytes),
            Self::Message(msg) => Ok(msg),
        }
    }

    /// Raw bytes, if this payload is held in wire form.
    pub fn as_raw(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Message(_) => None,
        }
    }
}

impl From<TensorMessage> for Payload {
    fn from(msg: TensorMessage) -> Self {
        Self::Message(msg)
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes.into())
    }
}

impl From<&'static str> for Payload {
    fn from(text: &'static str) -> Self {
        Self::Bytes(Bytes::from_static(text.as_bytes()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonCodec;
    use relay_types::NdValue;

    #[test]
    fn bytes_are_passed_through_unchanged() {
        let raw = r#" {"data":{"ndarray":[1.1,2.0]}}"#;
        let payload = Payload::from(raw);
        assert_eq!(payload.to_bytes(&JsonCodec).as_ref(), raw.as_bytes());
        assert_eq!(payload.as_raw().map(|b| b.len()), Some(raw.len()));
    }

    #[test]
    fn structured_payload_encodes_and_decodes() {
        let msg = TensorMessage::ndarray(vec![NdValue::row(&[0.9, 0.1])]).with_names(["a", "b"]);
        let payload = Payload::from(msg.clone());
        assert!(payload.as_raw().is_none());

        let wire = Payload::from_bytes(payload.to_bytes(&JsonCodec));
        assert_eq!(wire.to_message(&JsonCodec).unwrap(), msg);
        assert_eq!(wire.into_message(&JsonCodec).unwrap(), msg);
    }

    #[test]
    fn invalid_bytes_fail_to_decode() {
        let payload = Payload::from(b"not json".to_vec());
        assert!(payload.to_message(&JsonCodec).is_err());
    }
}
