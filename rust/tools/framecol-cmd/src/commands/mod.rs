//! Command implementations for framecol-cmd

use anyhow::{Context, Result};
use framecol_format::Frame;
use framecol_vector::Value;

pub mod head;
pub mod inspect;

/// Loads and wraps the frame stored at `path`.
pub fn read_frame(path: &str) -> Result<Frame> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read frame file {path}"))?;
    Frame::wrap(bytes).with_context(|| format!("Invalid frame in {path}"))
}

/// Renders a decoded value as JSON.
///
/// Complex values holding JSON documents are emitted as-is, byte payloads as arrays
/// of numbers, other complex objects as their debug representation.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Long(v) => (*v).into(),
        Value::Float(v) => float_to_json(*v as f64),
        Value::Double(v) => float_to_json(*v),
        Value::String(s) => s.as_str().into(),
        Value::Array(values) => values.iter().map(value_to_json).collect(),
        Value::Complex(c) => {
            if let Some(json) = c.downcast_ref::<serde_json::Value>() {
                json.clone()
            } else if let Some(bytes) = c.downcast_ref::<Vec<u8>>() {
                bytes.iter().copied().collect()
            } else {
                format!("{c:?}").into()
            }
        }
    }
}

/// NaN and infinities have no JSON number representation and are rendered as null.
fn float_to_json(v: f64) -> serde_json::Value {
    serde_json::Number::from_f64(v).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use framecol_testkit::FrameBuilder;
    use framecol_vector::ComplexValue;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_value_to_json() {
        assert_eq!(value_to_json(&Value::Null), json!(null));
        assert_eq!(value_to_json(&Value::Long(-3)), json!(-3));
        assert_eq!(value_to_json(&Value::Float(0.5)), json!(0.5));
        assert_eq!(value_to_json(&Value::Double(f64::NAN)), json!(null));
        assert_eq!(
            value_to_json(&Value::Array(vec![Value::String("a".into()), Value::Null])),
            json!(["a", null])
        );
        assert_eq!(
            value_to_json(&Value::Complex(ComplexValue::new("json", json!({"x": 1})))),
            json!({"x": 1})
        );
        assert_eq!(
            value_to_json(&Value::Complex(ComplexValue::new("bytes", vec![1u8, 2]))),
            json!([1, 2])
        );
    }

    #[test]
    fn test_read_frame() {
        let bytes = FrameBuilder::new().add_long(&[Some(1)]).to_bytes();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        let path = file.path().to_str().unwrap();
        let frame = read_frame(path).unwrap();
        assert_eq!(frame.row_count(), 1);

        let err = read_frame("/nonexistent/frame.bin").unwrap_err();
        assert!(err.to_string().contains("Failed to read frame file"));
    }

    #[test]
    fn test_read_invalid_frame() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x11, 0, 0]).unwrap();
        let err = read_frame(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid frame in"));
    }
}
