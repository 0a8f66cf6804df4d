//! Branch selection from a router's reply.
//!
//! The router decides remotely; this only reads its answer. The selector is
//! the first innermost row of the reply ([`TensorData::leading_row`]):
//!
//! - one value: that value is the branch index;
//! - several values: the index of the largest, first occurrence on ties.

use relay_types::{TensorData, TensorMessage};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error("router reply holds no values")]
    Empty,

    #[error("router selected a negative branch ({0})")]
    Negative(f64),

    #[error("router selected a non-integral branch ({0})")]
    Fractional(f64),

    #[error("router selected a branch beyond any index ({0})")]
    OutOfRange(f64),
}

/// Extract the selected branch index from a router reply.
pub fn route_index(msg: &TensorMessage) -> Result<usize, RouteError> {
    select(&msg.data)
}

fn select(data: &TensorData) -> Result<usize, RouteError> {
    match data.leading_row().as_slice() {
        [] => Err(RouteError::Empty),
        [only] => as_index(*only),
        scores => Ok(argmax(scores)),
    }
}

fn as_index(value: f64) -> Result<usize, RouteError> {
    if value < 0.0 {
        return Err(RouteError::Negative(value));
    }
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(RouteError::Fractional(value));
    }
    // `usize::MAX as f64` can round up past `usize::MAX` itself.
    if value >= usize::MAX as f64 {
        return Err(RouteError::OutOfRange(value));
    }
    Ok(value as usize)
}

fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = i;
        }
    }
    best
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use relay_types::NdValue;

    fn flat(values: &[f64]) -> TensorMessage {
        TensorMessage::ndarray(values.iter().copied().map(NdValue::Scalar).collect())
    }

    #[test]
    fn single_value_is_the_index() {
        assert_eq!(route_index(&flat(&[1.0])), Ok(1));
        assert_eq!(route_index(&flat(&[0.0])), Ok(0));
    }

    #[test]
    fn nested_single_value() {
        let msg = TensorMessage::ndarray(vec![NdValue::row(&[2.0])]);
        assert_eq!(route_index(&msg), Ok(2));
    }

    #[test]
    fn scores_pick_the_maximum() {
        assert_eq!(route_index(&flat(&[0.1, 0.7, 0.2])), Ok(1));
        let msg = TensorMessage::ndarray(vec![NdValue::row(&[0.3, 0.1, 0.6]), NdValue::row(&[0.9, 0.0, 0.1])]);
        assert_eq!(route_index(&msg), Ok(2));
    }

    #[test]
    fn ties_take_first_occurrence() {
        assert_eq!(route_index(&flat(&[0.4, 0.4, 0.2])), Ok(0));
        assert_eq!(route_index(&flat(&[0.1, 0.5, 0.5])), Ok(1));
    }

    #[test]
    fn tensor_reply() {
        let msg = TensorMessage::tensor(vec![1, 3], vec![0.2, 0.1, 0.9]);
        assert_eq!(route_index(&msg), Ok(2));
        let msg = TensorMessage::tensor(vec![], vec![3.0]);
        assert_eq!(route_index(&msg), Ok(3));
    }

    #[test]
    fn rejects_uninterpretable_replies() {
        assert_eq!(route_index(&flat(&[])), Err(RouteError::Empty));
        assert_eq!(
            route_index(&TensorMessage::ndarray(vec![NdValue::List(vec![])])),
            Err(RouteError::Empty)
        );
        assert_eq!(route_index(&flat(&[-1.0])), Err(RouteError::Negative(-1.0)));
        assert_eq!(route_index(&flat(&[1.5])), Err(RouteError::Fractional(1.5)));
    }

    #[test]
    fn rejects_indices_that_do_not_fit() {
        assert_eq!(route_index(&flat(&[1e20])), Err(RouteError::OutOfRange(1e20)));
        let edge = usize::MAX as f64;
        assert_eq!(route_index(&flat(&[edge])), Err(RouteError::OutOfRange(edge)));
        assert_eq!(route_index(&flat(&[4096.0])), Ok(4096));
    }
}
