// Conversion between the JSON envelope and TensorMessage.
//
// Every level of the envelope must be a JSON object; arrays are never read
// positionally. Unknown fields (status, strData, ...) are ignored on decode.

use relay_types::error::{CodecError, Result};
use relay_types::{NdValue, TensorData, TensorMessage};
use serde_json::{Map, Value};

// ── Decode ───────────────────────────────────────────────────────────────────

pub(crate) fn from_slice(bytes: &[u8]) -> Result<TensorMessage> {
    let value: Value = serde_json::from_slice(bytes)?;
    from_value(value)
}

pub(crate) fn from_value(value: Value) -> Result<TensorMessage> {
    let mut envelope = into_object(value, "envelope")?;
    let mut data = match envelope.remove("data") {
        None | Some(Value::Null) => return Err(CodecError::MissingData),
        Some(data) => into_object(data, "data")?,
    };

    let names = match data.remove("names") {
        None | Some(Value::Null) => None,
        Some(names) => Some(serde_json::from_value::<Vec<String>>(names)?),
    };

    let ndarray = data.remove("ndarray").filter(|v| !v.is_null());
    let tensor = data.remove("tensor").filter(|v| !v.is_null());
    let body = match (ndarray, tensor) {
        (Some(_), Some(_)) => return Err(CodecError::AmbiguousArray),
        (None, None) => return Err(CodecError::MissingArray),
        (Some(ndarray), None) => TensorData::NdArray(parse_rows(&ndarray)?),
        (None, Some(tensor)) => parse_tensor(tensor)?,
    };

    let meta = match envelope.remove("meta") {
        None | Some(Value::Null) => None,
        Some(meta) => Some(into_object(meta, "meta")?),
    };

    let msg = TensorMessage { names, data: body, meta };
    msg.validate()?;
    Ok(msg)
}

/// Split a combine body into its envelopes, in order.
pub(crate) fn sequence_from_slice(bytes: &[u8], field: &'static str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_slice(bytes)?;
    match into_object(value, "sequence")?.remove(field) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(CodecError::NotAnArray { path: field }),
        None => Err(CodecError::MissingField { path: field }),
    }
}

fn into_object(value: Value, path: &'static str) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CodecError::NotAnObject { path }),
    }
}

fn parse_tensor(value: Value) -> Result<TensorData> {
    let mut tensor = into_object(value, "tensor")?;
    let shape = match tensor.remove("shape") {
        Some(shape) => serde_json::from_value::<Vec<usize>>(shape)?,
        None => return Err(CodecError::MissingField { path: "tensor.shape" }),
    };
    let values = match tensor.remove("values") {
        Some(Value::Array(values)) => values,
        Some(_) => return Err(CodecError::NotAnArray { path: "tensor.values" }),
        None => return Err(CodecError::MissingField { path: "tensor.values" }),
    };

    let values = values
        .iter()
        .enumerate()
        .map(|(i, v)| number(v, || format!("tensor.values[{i}]")))
        .collect::<Result<Vec<_>>>()?;
    Ok(TensorData::Tensor { shape, values })
}

fn parse_rows(value: &Value) -> Result<Vec<NdValue>> {
    let Value::Array(items) = value else {
        return Err(CodecError::NotAnArray { path: "ndarray" });
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_nd(item, format!("ndarray[{i}]")))
        .collect()
}

fn parse_nd(value: &Value, path: String) -> Result<NdValue> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_nd(item, format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(NdValue::List),
        other => number(other, || path).map(NdValue::Scalar),
    }
}

/// Integers and floats both normalise to f64.
fn number(value: &Value, path: impl FnOnce() -> String) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| CodecError::NonNumeric { path: path() })
}

// ── Encode ───────────────────────────────────────────────────────────────────

pub(crate) fn to_value(msg: &TensorMessage) -> Value {
    let mut data = Map::new();
    if let Some(names) = &msg.names {
        data.insert("names".into(), Value::from(names.clone()));
    }
    match &msg.data {
        TensorData::NdArray(rows) => {
            data.insert(
                "ndarray".into(),
                Value::Array(rows.iter().map(nd_to_value).collect()),
            );
        }
        TensorData::Tensor { shape, values } => {
            let mut tensor = Map::new();
            tensor.insert("shape".into(), Value::from(shape.clone()));
            tensor.insert("values".into(), Value::from(values.clone()));
            data.insert("tensor".into(), Value::Object(tensor));
        }
    }

    let mut envelope = Map::new();
    envelope.insert("data".into(), Value::Object(data));
    if let Some(meta) = &msg.meta {
        envelope.insert("meta".into(), Value::Object(meta.clone()));
    }
    Value::Object(envelope)
}

fn nd_to_value(value: &NdValue) -> Value {
    match value {
        NdValue::Scalar(v) => Value::from(*v),
        NdValue::List(items) => Value::Array(items.iter().map(nd_to_value).collect()),
    }
}
