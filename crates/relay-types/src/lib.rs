//! `relay-types` — shared model for the pipeline node transport.
//!
//! Holds the structured tensor message, the operation kinds a node can
//! serve, and the path layout used to reach each of them.

pub mod config;
pub mod error;
pub mod operation;
pub mod tensor;

// ── Public re-exports ────────────────────────────────────────────────────────

pub use config::EndpointPaths;
pub use error::{CodecError, UnknownOperation};
pub use operation::Operation;
pub use tensor::{NdValue, TensorData, TensorMessage};
