//! The five call shapes a pipeline node can be asked to serve.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownOperation;

/// Semantic role of a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Predict,
    TransformInput,
    TransformOutput,
    /// Payload in, branch index out.
    Route,
    /// Two or more payloads in, one out.
    Combine,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Self::Predict,
        Self::TransformInput,
        Self::TransformOutput,
        Self::Route,
        Self::Combine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Predict => "predict",
            Self::TransformInput => "transform-input",
            Self::TransformOutput => "transform-output",
            Self::Route => "route",
            Self::Combine => "combine",
        }
    }

    /// True for the one operation that sends an ordered sequence of payloads.
    pub fn takes_sequence(&self) -> bool {
        matches!(self, Self::Combine)
    }

    /// Check an input count against the call shape. Returns a description of
    /// the expected count on mismatch.
    pub fn check_arity(&self, inputs: usize) -> Result<(), String> {
        match self {
            Self::Combine if inputs < 2 => Err(format!(
                "{self} needs at least 2 payloads, got {inputs}"
            )),
            Self::Combine => Ok(()),
            _ if inputs != 1 => Err(format!("{self} takes exactly 1 payload, got {inputs}")),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_name() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
        assert!("aggregate".parse::<Operation>().is_err());
    }

    #[test]
    fn combine_needs_two_inputs() {
        assert!(Operation::Combine.check_arity(1).is_err());
        assert!(Operation::Combine.check_arity(2).is_ok());
        assert!(Operation::Combine.check_arity(5).is_ok());
    }

    #[test]
    fn unary_operations_take_one_input() {
        for op in [Operation::Predict, Operation::TransformInput, Operation::TransformOutput, Operation::Route] {
            assert!(op.check_arity(1).is_ok());
            assert!(op.check_arity(0).is_err());
            assert!(op.check_arity(2).is_err());
            assert!(!op.takes_sequence());
        }
    }
}
