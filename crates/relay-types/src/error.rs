// Errors raised while decoding or validating tensor messages.

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    // ── Envelope ──────────────────────────────────────────────────────────

    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("envelope has no `data` field")]
    MissingData,

    #[error("`{path}` must be a JSON object")]
    NotAnObject { path: &'static str },

    #[error("`{path}` is missing")]
    MissingField { path: &'static str },

    #[error("`data` carries neither `ndarray` nor `tensor`")]
    MissingArray,

    #[error("`data` carries both `ndarray` and `tensor`")]
    AmbiguousArray,

    // ── Array contents ────────────────────────────────────────────────────

    #[error("`{path}` must be a JSON array")]
    NotAnArray { path: &'static str },

    #[error("non-numeric value at {path}")]
    NonNumeric { path: String },

    #[error("ragged array at {path}")]
    Ragged { path: String },

    #[error("{names} names for an innermost dimension of {width}")]
    NamesMismatch { names: usize, width: usize },

    #[error("tensor shape expects {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("tensor shape {shape:?} holds more values than can be addressed")]
    ShapeOverflow { shape: Vec<usize> },
}

/// Convenience alias used throughout the relay crates for codec results.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Returned when parsing an [`Operation`](crate::Operation) from text fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation `{0}` (expected predict, transform-input, transform-output, route or combine)")]
pub struct UnknownOperation(pub String);
