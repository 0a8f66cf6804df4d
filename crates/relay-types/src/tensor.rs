//! Structured form of the tensor messages exchanged between pipeline nodes.
//!
//! A message carries its numbers either as a nested `ndarray` (rows of rows
//! of scalars, any rank) or as a flat `tensor` with an explicit shape. Both
//! may be labelled by `names`, one per column of the innermost dimension.
//!
//! Values are always `f64`. Messages built by hand should be checked with
//! [`TensorMessage::validate`]; the codec validates everything it decodes.

use serde_json::{Map, Value};

use crate::error::{CodecError, Result};

// ── NdValue ──────────────────────────────────────────────────────────────────

/// One element of a nested `ndarray`: a scalar leaf or a nested row.
#[derive(Debug, Clone, PartialEq)]
pub enum NdValue {
    Scalar(f64),
    List(Vec<NdValue>),
}

impl NdValue {
    /// Build a row of scalars.
    pub fn row(values: &[f64]) -> Self {
        Self::List(values.iter().copied().map(Self::Scalar).collect())
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[NdValue]> {
        match self {
            Self::Scalar(_) => None,
            Self::List(items) => Some(items),
        }
    }
}

impl From<f64> for NdValue {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec<f64>> for NdValue {
    fn from(values: Vec<f64>) -> Self {
        Self::row(&values)
    }
}

// ── TensorData ───────────────────────────────────────────────────────────────

/// The numeric body of a message: a tagged union over the two wire encodings.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    /// Nested array, outermost dimension first.
    NdArray(Vec<NdValue>),
    /// Row-major flat values with an explicit shape. An empty shape is a
    /// scalar holding exactly one value.
    Tensor { shape: Vec<usize>, values: Vec<f64> },
}

impl TensorData {
    /// Dimensions of the array. For `ndarray` these are read along the
    /// leading edge (index 0 at every level); [`validate`](Self::validate)
    /// checks the rest of the array conforms.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::NdArray(rows) => {
                let mut dims = vec![rows.len()];
                let mut level = rows.as_slice();
                while let Some(NdValue::List(inner)) = level.first() {
                    dims.push(inner.len());
                    level = inner;
                }
                dims
            }
            Self::Tensor { shape, .. } => shape.clone(),
        }
    }

    /// Size of the innermost dimension (1 for a scalar tensor).
    pub fn innermost_width(&self) -> usize {
        self.shape().last().copied().unwrap_or(1)
    }

    /// The first innermost row: follow index 0 through every outer
    /// dimension and collect the scalars found there.
    pub fn leading_row(&self) -> Vec<f64> {
        match self {
            Self::NdArray(rows) => {
                let mut level = rows.as_slice();
                while let Some(NdValue::List(inner)) = level.first() {
                    level = inner;
                }
                level.iter().filter_map(NdValue::as_scalar).collect()
            }
            Self::Tensor { values, .. } => {
                let width = self.innermost_width().min(values.len());
                values[..width].to_vec()
            }
        }
    }

    /// Check the array is rectangular (ndarray) or that the shape matches
    /// the number of values (tensor).
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::NdArray(rows) => {
                let dims = self.shape();
                conform(rows, &dims, "ndarray")
            }
            Self::Tensor { shape, values } => {
                let expected = if shape.contains(&0) {
                    0
                } else {
                    shape
                        .iter()
                        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
                        .ok_or_else(|| CodecError::ShapeOverflow { shape: shape.clone() })?
                };
                if expected != values.len() {
                    return Err(CodecError::ShapeMismatch {
                        expected,
                        actual: values.len(),
                    });
                }
                Ok(())
            }
        }
    }
}

/// Recursively check that `level` has exactly the dimensions `dims`.
fn conform(level: &[NdValue], dims: &[usize], path: &str) -> Result<()> {
    let Some((&len, rest)) = dims.split_first() else {
        return Err(CodecError::Ragged { path: path.to_string() });
    };
    if level.len() != len {
        return Err(CodecError::Ragged { path: path.to_string() });
    }

    for (i, value) in level.iter().enumerate() {
        match (value, rest.is_empty()) {
            (NdValue::Scalar(_), true) => {}
            (NdValue::List(items), false) => conform(items, rest, &format!("{path}[{i}]"))?,
            _ => return Err(CodecError::Ragged { path: format!("{path}[{i}]") }),
        }
    }
    Ok(())
}

// ── TensorMessage ────────────────────────────────────────────────────────────

/// A decoded tensor message.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorMessage {
    /// Column labels for the innermost dimension.
    pub names: Option<Vec<String>>,
    pub data: TensorData,
    /// Opaque request metadata, carried through untouched.
    pub meta: Option<Map<String, Value>>,
}

impl TensorMessage {
    pub fn ndarray(rows: Vec<NdValue>) -> Self {
        Self {
            names: None,
            data: TensorData::NdArray(rows),
            meta: None,
        }
    }

    pub fn tensor(shape: Vec<usize>, values: Vec<f64>) -> Self {
        Self {
            names: None,
            data: TensorData::Tensor { shape, values },
            meta: None,
        }
    }

    pub fn with_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Validate the array and, when present, that `names` labels every
    /// column of the innermost dimension.
    pub fn validate(&self) -> Result<()> {
        self.data.validate()?;
        if let Some(names) = &self.names {
            let width = self.data.innermost_width();
            if names.len() != width {
                return Err(CodecError::NamesMismatch {
                    names: names.len(),
                    width,
                });
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_of_nested_rows() {
        let data = TensorData::NdArray(vec![NdValue::row(&[0.9, 0.1]), NdValue::row(&[0.2, 0.8])]);
        assert_eq!(data.shape(), vec![2, 2]);
        assert_eq!(data.innermost_width(), 2);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn flat_ndarray_is_rank_one() {
        let data = TensorData::NdArray(vec![NdValue::Scalar(1.1), NdValue::Scalar(2.0)]);
        assert_eq!(data.shape(), vec![2]);
        assert_eq!(data.leading_row(), vec![1.1, 2.0]);
    }

    #[test]
    fn rejects_rows_of_different_length() {
        let data = TensorData::NdArray(vec![NdValue::row(&[1.0, 2.0]), NdValue::row(&[3.0])]);
        match data.validate() {
            Err(CodecError::Ragged { path }) => assert_eq!(path, "ndarray[1]"),
            other => panic!("expected ragged error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_mixed_depth() {
        let data = TensorData::NdArray(vec![NdValue::row(&[1.0]), NdValue::Scalar(2.0)]);
        assert!(matches!(data.validate(), Err(CodecError::Ragged { .. })));
    }

    #[test]
    fn empty_rows_are_rectangular() {
        let data = TensorData::NdArray(vec![NdValue::List(vec![]), NdValue::List(vec![])]);
        assert_eq!(data.shape(), vec![2, 0]);
        assert!(data.validate().is_ok());
        assert!(data.leading_row().is_empty());
    }

    #[test]
    fn tensor_shape_must_cover_values() {
        let ok = TensorData::Tensor { shape: vec![2, 3], values: vec![0.0; 6] };
        assert!(ok.validate().is_ok());
        assert_eq!(ok.leading_row().len(), 3);

        let bad = TensorData::Tensor { shape: vec![2, 3], values: vec![0.0; 5] };
        assert!(matches!(
            bad.validate(),
            Err(CodecError::ShapeMismatch { expected: 6, actual: 5 })
        ));
    }

    #[test]
    fn oversized_shape_is_an_error() {
        let huge = TensorData::Tensor { shape: vec![usize::MAX / 2, 3], values: vec![] };
        assert!(matches!(huge.validate(), Err(CodecError::ShapeOverflow { .. })));

        let zero_dim = TensorData::Tensor { shape: vec![usize::MAX, usize::MAX, 0], values: vec![] };
        assert!(zero_dim.validate().is_ok());
    }

    #[test]
    fn scalar_tensor() {
        let data = TensorData::Tensor { shape: vec![], values: vec![4.0] };
        assert!(data.validate().is_ok());
        assert_eq!(data.innermost_width(), 1);
        assert_eq!(data.leading_row(), vec![4.0]);
    }

    #[test]
    fn names_must_match_innermost_width() {
        let msg = TensorMessage::ndarray(vec![NdValue::row(&[0.9, 0.1])]).with_names(["a", "b"]);
        assert!(msg.validate().is_ok());

        let msg = TensorMessage::ndarray(vec![NdValue::row(&[0.9, 0.1])]).with_names(["a"]);
        assert!(matches!(
            msg.validate(),
            Err(CodecError::NamesMismatch { names: 1, width: 2 })
        ));
    }

    #[test]
    fn names_on_tensor_use_last_dimension() {
        let msg = TensorMessage::tensor(vec![1, 3], vec![1.0, 2.0, 3.0]).with_names(["x", "y", "z"]);
        assert!(msg.validate().is_ok());
    }
}
