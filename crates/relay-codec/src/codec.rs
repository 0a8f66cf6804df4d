//! Payload codecs.
//!
//! [`PayloadCodec`] is the seam a client uses to turn structured messages
//! into request bodies and response bodies back into messages. The default
//! [`JsonCodec`] speaks the `{"data": {...}}` envelope.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use relay_types::error::Result;
use relay_types::TensorMessage;

use crate::envelope;

/// Field of the object wrapping the ordered payload list of a combine call.
/// Combiner nodes read their inputs from this key.
pub const SEQUENCE_FIELD: &str = "seldonMessages";

/// Converts between wire bytes and [`TensorMessage`].
pub trait PayloadCodec: Send + Sync + fmt::Debug {
    /// Value sent as `Content-Type` and `Accept`.
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    /// Serialize a message. Total over messages that pass
    /// [`TensorMessage::validate`] and hold finite values.
    fn encode(&self, msg: &TensorMessage) -> Bytes;

    /// Parse and validate a message.
    fn decode(&self, bytes: &[u8]) -> Result<TensorMessage>;

    /// Wrap already-encoded payloads, in order, into one combine body.
    fn encode_sequence(&self, parts: &[Bytes]) -> Bytes;
}

// ── JsonCodec ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Parse a combine body back into its messages, preserving order.
    pub fn decode_sequence(&self, bytes: &[u8]) -> Result<Vec<TensorMessage>> {
        envelope::sequence_from_slice(bytes, SEQUENCE_FIELD)?
            .into_iter()
            .map(envelope::from_value)
            .collect()
    }
}

impl PayloadCodec for JsonCodec {
    fn encode(&self, msg: &TensorMessage) -> Bytes {
        Bytes::from(envelope::to_value(msg).to_string())
    }

    fn decode(&self, bytes: &[u8]) -> Result<TensorMessage> {
        envelope::from_slice(bytes)
    }

    /// Parts are spliced verbatim; each is expected to be one JSON value.
    fn encode_sequence(&self, parts: &[Bytes]) -> Bytes {
        let prefix = format!("{{\"{SEQUENCE_FIELD}\":[");
        let capacity = prefix.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>() + 2;

        let mut buf = BytesMut::with_capacity(capacity);
        buf.put_slice(prefix.as_bytes());
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                buf.put_u8(b',');
            }
            buf.put_slice(part);
        }
        buf.put_slice(b"]}");
        buf.freeze()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
