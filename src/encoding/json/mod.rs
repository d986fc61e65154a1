// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Conversion between [`CodecValue`] trees and JSON.
//!
//! Used for the `json` wire type, for [`LazyView::to_json`], and by the
//! command line tool to read and print messages.
//!
//! [`LazyView::to_json`]: crate::encoding::ros1::LazyView::to_json

use crate::{CodecError, CodecValue, DecodedMessage, Result as CoreResult};

/// Convert a codec value to a JSON value.
///
/// `time` and `duration` become `{"sec": .., "nsec": ..}` objects so they
/// convert back to structs the writer accepts. Byte payloads become arrays
/// of numbers. Floats that JSON cannot represent (NaN, infinities) become
/// `null`.
pub fn codec_value_to_json(value: &CodecValue) -> serde_json::Value {
    use serde_json::Value;

    match value {
        CodecValue::Null => Value::Null,
        CodecValue::Bool(b) => Value::Bool(*b),
        CodecValue::Int8(i) => Value::from(*i),
        CodecValue::Int16(i) => Value::from(*i),
        CodecValue::Int32(i) => Value::from(*i),
        CodecValue::Int64(i) => Value::from(*i),
        CodecValue::UInt8(u) => Value::from(*u),
        CodecValue::UInt16(u) => Value::from(*u),
        CodecValue::UInt32(u) => Value::from(*u),
        CodecValue::UInt64(u) => Value::from(*u),
        CodecValue::Float32(f) => float_to_json(f64::from(*f)),
        CodecValue::Float64(f) => float_to_json(*f),
        CodecValue::String(s) => Value::String(s.clone()),
        CodecValue::Bytes(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
        CodecValue::Time { sec, nsec } => serde_json::json!({ "sec": sec, "nsec": nsec }),
        CodecValue::Duration { sec, nsec } => serde_json::json!({ "sec": sec, "nsec": nsec }),
        CodecValue::Array(items) => Value::Array(items.iter().map(codec_value_to_json).collect()),
        CodecValue::Struct(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, val)| (key.clone(), codec_value_to_json(val)))
                .collect(),
        ),
    }
}

fn float_to_json(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// Convert a JSON value to a codec value.
///
/// Integers become `Int64` (or `UInt64` above `i64::MAX`), other numbers
/// `Float64`, objects `Struct`. The writer coerces these to the declared
/// field types.
pub fn json_to_codec_value(value: &serde_json::Value) -> CoreResult<CodecValue> {
    use serde_json::Value;

    match value {
        Value::Null => Ok(CodecValue::Null),
        Value::Bool(b) => Ok(CodecValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(CodecValue::Int64(i))
            } else if let Some(u) = n.as_u64() {
                Ok(CodecValue::UInt64(u))
            } else if let Some(f) = n.as_f64() {
                Ok(CodecValue::Float64(f))
            } else {
                Err(CodecError::parse("number", "unknown number format"))
            }
        }
        Value::String(s) => Ok(CodecValue::String(s.clone())),
        Value::Array(items) => items
            .iter()
            .map(json_to_codec_value)
            .collect::<CoreResult<Vec<_>>>()
            .map(CodecValue::Array),
        Value::Object(obj) => {
            let mut fields = DecodedMessage::with_capacity(obj.len());
            for (key, val) in obj {
                fields.insert(key.clone(), json_to_codec_value(val)?);
            }
            Ok(CodecValue::Struct(fields))
        }
    }
}

/// Parse JSON text into a codec value.
pub fn parse_json(text: &str) -> CoreResult<CodecValue> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| CodecError::parse("json", format!("{e}")))?;
    json_to_codec_value(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object() {
        let value = parse_json(r#"{"x": 1, "y": -2, "z": 1.5, "s": "hi"}"#).unwrap();
        let fields = value.as_struct().unwrap();
        assert_eq!(fields.get("x"), Some(&CodecValue::Int64(1)));
        assert_eq!(fields.get("y"), Some(&CodecValue::Int64(-2)));
        assert_eq!(fields.get("z"), Some(&CodecValue::Float64(1.5)));
        assert_eq!(fields.get("s"), Some(&CodecValue::String("hi".into())));
    }

    #[test]
    fn test_large_unsigned() {
        let value = parse_json("18446744073709551615").unwrap();
        assert_eq!(value, CodecValue::UInt64(u64::MAX));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_json("{not json"),
            Err(CodecError::ParseError { .. })
        ));
    }

    #[test]
    fn test_time_renders_as_object() {
        let json = codec_value_to_json(&CodecValue::Time { sec: 3, nsec: 4 });
        assert_eq!(json, serde_json::json!({"sec": 3, "nsec": 4}));
        let json = codec_value_to_json(&CodecValue::Duration { sec: -1, nsec: 0 });
        assert_eq!(json, serde_json::json!({"sec": -1, "nsec": 0}));
    }

    #[test]
    fn test_bytes_render_as_numbers() {
        let json = codec_value_to_json(&CodecValue::Bytes(vec![1, 255]));
        assert_eq!(json, serde_json::json!([1, 255]));
    }

    #[test]
    fn test_non_finite_floats_become_null() {
        assert_eq!(
            codec_value_to_json(&CodecValue::Float64(f64::NAN)),
            serde_json::Value::Null
        );
        assert_eq!(
            codec_value_to_json(&CodecValue::Float32(f32::INFINITY)),
            serde_json::Value::Null
        );
    }

    #[test]
    fn test_nested_round_trip() {
        let value = CodecValue::from_fields([
            ("a", CodecValue::Array(vec![CodecValue::Int64(1), CodecValue::Null])),
            (
                "b",
                CodecValue::from_fields([("c", CodecValue::Bool(true))]),
            ),
        ]);
        let json = codec_value_to_json(&value);
        assert_eq!(json_to_codec_value(&json).unwrap(), value);
    }
}
