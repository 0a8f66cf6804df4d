//! `relay-codec` — wire form of tensor messages.
//!
//! Request and response bodies are JSON envelopes:
//!
//! ```text
//! {"data": {"names": ["a", "b"], "ndarray": [[0.9, 0.1]]}}
//! {"data": {"tensor": {"shape": [1, 2], "values": [0.9, 0.1]}}}
//! ```
//!
//! [`JsonCodec`] converts between those bytes and
//! [`TensorMessage`](relay_types::TensorMessage); [`Payload`] is what callers
//! hand to, and receive from, the transport.

pub mod codec;
mod envelope;
pub mod payload;

// ── Public re-exports ────────────────────────────────────────────────────────

pub use codec::{JsonCodec, PayloadCodec, SEQUENCE_FIELD};
pub use payload::Payload;
pub use relay_types::error::Result;
