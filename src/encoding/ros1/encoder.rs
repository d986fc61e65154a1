// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema-driven encode walk shared by sizing and writing.
//!
//! [`MessageEncoder`] walks a [`CodecValue`] against a compiled type and
//! emits primitive calls into a [`WireSink`]. The size calculator and the
//! writer are both sinks, so sizing and writing always agree.

use crate::core::{CodecValue, PrimitiveType};
use crate::encoding::json::codec_value_to_json;
use crate::{CodecError, Result as CoreResult};

use super::compiler::CompiledCodec;
use super::plan::{ArrayKind, ElementKind, FieldPlan, TypeIndex};

/// Receiver of primitive wire values during an encode walk.
pub trait WireSink {
    fn bool(&mut self, value: bool) -> CoreResult<()>;
    fn int8(&mut self, value: i8) -> CoreResult<()>;
    fn uint8(&mut self, value: u8) -> CoreResult<()>;
    fn int16(&mut self, value: i16) -> CoreResult<()>;
    fn uint16(&mut self, value: u16) -> CoreResult<()>;
    fn int32(&mut self, value: i32) -> CoreResult<()>;
    fn uint32(&mut self, value: u32) -> CoreResult<()>;
    fn int64(&mut self, value: i64) -> CoreResult<()>;
    fn uint64(&mut self, value: u64) -> CoreResult<()>;
    fn float32(&mut self, value: f32) -> CoreResult<()>;
    fn float64(&mut self, value: f64) -> CoreResult<()>;
    /// Length-prefixed UTF-8 string
    fn string(&mut self, value: &str) -> CoreResult<()>;
    /// Raw bytes, no prefix
    fn bytes(&mut self, value: &[u8]) -> CoreResult<()>;
    fn time(&mut self, sec: u32, nsec: u32) -> CoreResult<()>;
    fn duration(&mut self, sec: i32, nsec: i32) -> CoreResult<()>;

    /// Dynamic array count prefix.
    fn array_length(&mut self, len: usize) -> CoreResult<()> {
        let len = u32::try_from(len).map_err(|_| {
            CodecError::encode(
                "ROS1",
                format!("Array of {len} elements exceeds u32 length prefix"),
            )
        })?;
        self.uint32(len)
    }
}

/// Length prefix of a string of `len` UTF-8 bytes.
///
/// Every sink checks strings through here so sizing fails exactly where
/// writing would.
pub(crate) fn string_length_prefix(len: usize) -> CoreResult<u32> {
    u32::try_from(len).map_err(|_| {
        CodecError::encode(
            "ROS1",
            format!("String of {len} bytes exceeds u32 length prefix"),
        )
    })
}

/// Walks values against compiled types and feeds a sink.
pub struct MessageEncoder<'a, S> {
    codec: &'a CompiledCodec,
    sink: &'a mut S,
}

impl<'a, S: WireSink> MessageEncoder<'a, S> {
    pub fn new(codec: &'a CompiledCodec, sink: &'a mut S) -> Self {
        Self { codec, sink }
    }

    /// Encode `value` as an instance of the type at `type_index`.
    pub fn encode_message(&mut self, type_index: TypeIndex, value: &CodecValue) -> CoreResult<()> {
        self.encode_type(type_index, value, 0)
    }

    fn encode_type(
        &mut self,
        type_index: TypeIndex,
        value: &CodecValue,
        depth: usize,
    ) -> CoreResult<()> {
        let max_depth = self.codec.options().max_depth;
        if depth > max_depth {
            return Err(CodecError::encode(
                "ROS1",
                format!("Maximum encoding depth exceeded ({max_depth}), possible circular reference"),
            ));
        }

        let codec = self.codec;
        let ty = codec.type_at(type_index);
        let message = match value {
            CodecValue::Struct(message) => message,
            other => {
                return Err(CodecError::encode(
                    "ROS1",
                    format!(
                        "Expected struct for type '{}', got {}",
                        ty.display_name(),
                        other.type_name()
                    ),
                ))
            }
        };

        for field in &ty.fields {
            let field_value = message.get(&field.name).ok_or_else(|| {
                CodecError::encode(
                    "ROS1",
                    format!(
                        "Missing field '{}' in value for type '{}'",
                        field.name,
                        ty.display_name()
                    ),
                )
            })?;
            self.encode_field(field, field_value, depth)?;
        }
        Ok(())
    }

    fn encode_field(&mut self, field: &FieldPlan, value: &CodecValue, depth: usize) -> CoreResult<()> {
        let expected_len = match field.array {
            ArrayKind::Single => return self.encode_element(field.element, value, depth),
            ArrayKind::Fixed(n) => Some(n),
            ArrayKind::Dynamic => None,
        };

        match (field.element, value) {
            (
                ElementKind::Primitive(PrimitiveType::UInt8 | PrimitiveType::Int8),
                CodecValue::Bytes(bytes),
            ) => {
                self.array_prefix(field, expected_len, bytes.len())?;
                self.sink.bytes(bytes)
            }
            (element, CodecValue::Array(items)) => {
                self.array_prefix(field, expected_len, items.len())?;
                for item in items {
                    self.encode_element(element, item, depth)?;
                }
                Ok(())
            }
            (_, other) => Err(CodecError::encode(
                "ROS1",
                format!(
                    "Expected array for field '{}', got {}",
                    field.name,
                    other.type_name()
                ),
            )),
        }
    }

    /// Write the count prefix of a dynamic array, or check the length of a
    /// fixed one.
    fn array_prefix(
        &mut self,
        field: &FieldPlan,
        expected_len: Option<usize>,
        actual_len: usize,
    ) -> CoreResult<()> {
        match expected_len {
            None => self.sink.array_length(actual_len),
            Some(n) if n == actual_len => Ok(()),
            Some(n) => Err(CodecError::encode(
                "ROS1",
                format!(
                    "Fixed array field '{}' expects {n} elements, got {actual_len}",
                    field.name
                ),
            )),
        }
    }

    fn encode_element(
        &mut self,
        element: ElementKind,
        value: &CodecValue,
        depth: usize,
    ) -> CoreResult<()> {
        match element {
            ElementKind::Primitive(prim) => self.encode_primitive(value, prim),
            ElementKind::Complex(idx) => self.encode_type(idx, value, depth + 1),
        }
    }

    /// Encode a primitive value with numeric coercion.
    ///
    /// Integers convert to any integer type they fit in and to floats;
    /// floats convert between widths. Everything else must match exactly.
    fn encode_primitive(&mut self, value: &CodecValue, prim: PrimitiveType) -> CoreResult<()> {
        match prim {
            PrimitiveType::Bool => match value {
                CodecValue::Bool(b) => self.sink.bool(*b),
                _ => type_mismatch("bool", value),
            },
            PrimitiveType::Int8 => self.sink.int8(coerce_to_i8(value)?),
            PrimitiveType::Int16 => self.sink.int16(coerce_to_i16(value)?),
            PrimitiveType::Int32 => self.sink.int32(coerce_to_i32(value)?),
            PrimitiveType::Int64 => self.sink.int64(coerce_to_i64(value)?),
            PrimitiveType::UInt8 => self.sink.uint8(coerce_to_u8(value)?),
            PrimitiveType::UInt16 => self.sink.uint16(coerce_to_u16(value)?),
            PrimitiveType::UInt32 => self.sink.uint32(coerce_to_u32(value)?),
            PrimitiveType::UInt64 => self.sink.uint64(coerce_to_u64(value)?),
            PrimitiveType::Float32 => self.sink.float32(coerce_to_f32(value)?),
            PrimitiveType::Float64 => self.sink.float64(coerce_to_f64(value)?),
            PrimitiveType::String => match value {
                CodecValue::String(s) => self.sink.string(s),
                _ => type_mismatch("string", value),
            },
            PrimitiveType::Time => {
                let (sec, nsec) = time_parts(value, "time")?;
                self.sink.time(
                    u32::try_from(sec).map_err(|_| overflow_error("time", value))?,
                    u32::try_from(nsec).map_err(|_| overflow_error("time", value))?,
                )
            }
            PrimitiveType::Duration => {
                let (sec, nsec) = time_parts(value, "duration")?;
                self.sink.duration(
                    i32::try_from(sec).map_err(|_| overflow_error("duration", value))?,
                    i32::try_from(nsec).map_err(|_| overflow_error("duration", value))?,
                )
            }
            PrimitiveType::Json => {
                let text = codec_value_to_json(value).to_string();
                self.sink.string(&text)
            }
        }
    }
}

/// Seconds and nanoseconds of a temporal value.
///
/// Accepts the matching temporal variant or a struct with integer `sec`
/// and `nsec` fields.
fn time_parts(value: &CodecValue, expected: &str) -> CoreResult<(i64, i64)> {
    match (expected, value) {
        ("time", CodecValue::Time { sec, nsec }) => Ok((i64::from(*sec), i64::from(*nsec))),
        ("duration", CodecValue::Duration { sec, nsec }) => {
            Ok((i64::from(*sec), i64::from(*nsec)))
        }
        (_, CodecValue::Struct(fields)) => {
            let part = |name: &str| {
                fields
                    .get(name)
                    .and_then(CodecValue::as_i64)
                    .ok_or_else(|| coerce_error(expected, value))
            };
            Ok((part("sec")?, part("nsec")?))
        }
        _ => Err(coerce_error(expected, value)),
    }
}

/// Coerce a CodecValue to i8.
fn coerce_to_i8(value: &CodecValue) -> CoreResult<i8> {
    let wide = coerce_integer(value, "int8")?;
    i8::try_from(wide).map_err(|_| overflow_error("int8", value))
}

/// Coerce a CodecValue to i16.
fn coerce_to_i16(value: &CodecValue) -> CoreResult<i16> {
    let wide = coerce_integer(value, "int16")?;
    i16::try_from(wide).map_err(|_| overflow_error("int16", value))
}

/// Coerce a CodecValue to i32.
fn coerce_to_i32(value: &CodecValue) -> CoreResult<i32> {
    let wide = coerce_integer(value, "int32")?;
    i32::try_from(wide).map_err(|_| overflow_error("int32", value))
}

/// Coerce a CodecValue to i64.
fn coerce_to_i64(value: &CodecValue) -> CoreResult<i64> {
    let wide = coerce_integer(value, "int64")?;
    i64::try_from(wide).map_err(|_| overflow_error("int64", value))
}

/// Coerce a CodecValue to u8.
fn coerce_to_u8(value: &CodecValue) -> CoreResult<u8> {
    let wide = coerce_integer(value, "uint8")?;
    u8::try_from(wide).map_err(|_| overflow_error("uint8", value))
}

/// Coerce a CodecValue to u16.
fn coerce_to_u16(value: &CodecValue) -> CoreResult<u16> {
    let wide = coerce_integer(value, "uint16")?;
    u16::try_from(wide).map_err(|_| overflow_error("uint16", value))
}

/// Coerce a CodecValue to u32.
fn coerce_to_u32(value: &CodecValue) -> CoreResult<u32> {
    let wide = coerce_integer(value, "uint32")?;
    u32::try_from(wide).map_err(|_| overflow_error("uint32", value))
}

/// Coerce a CodecValue to u64.
fn coerce_to_u64(value: &CodecValue) -> CoreResult<u64> {
    let wide = coerce_integer(value, "uint64")?;
    u64::try_from(wide).map_err(|_| overflow_error("uint64", value))
}

/// Widen any integer variant to i128 so range checks are exact.
fn coerce_integer(value: &CodecValue, expected: &str) -> CoreResult<i128> {
    match value {
        CodecValue::Int8(i) => Ok(i128::from(*i)),
        CodecValue::Int16(i) => Ok(i128::from(*i)),
        CodecValue::Int32(i) => Ok(i128::from(*i)),
        CodecValue::Int64(i) => Ok(i128::from(*i)),
        CodecValue::UInt8(u) => Ok(i128::from(*u)),
        CodecValue::UInt16(u) => Ok(i128::from(*u)),
        CodecValue::UInt32(u) => Ok(i128::from(*u)),
        CodecValue::UInt64(u) => Ok(i128::from(*u)),
        _ => Err(coerce_error(expected, value)),
    }
}

/// Coerce a CodecValue to f32.
fn coerce_to_f32(value: &CodecValue) -> CoreResult<f32> {
    match value {
        CodecValue::Float32(f) => Ok(*f),
        CodecValue::Float64(f) => Ok(*f as f32),
        _ => coerce_integer(value, "float32").map(|i| i as f32),
    }
}

/// Coerce a CodecValue to f64.
fn coerce_to_f64(value: &CodecValue) -> CoreResult<f64> {
    match value {
        CodecValue::Float32(f) => Ok(f64::from(*f)),
        CodecValue::Float64(f) => Ok(*f),
        _ => coerce_integer(value, "float64").map(|i| i as f64),
    }
}

/// Create an overflow error for type coercion.
fn overflow_error(expected: &str, actual: &CodecValue) -> CodecError {
    CodecError::encode(
        "ROS1",
        format!("Value {actual:?} overflows target type {expected}"),
    )
}

/// Create a coercion error for incompatible types.
fn coerce_error(expected: &str, actual: &CodecValue) -> CodecError {
    CodecError::encode("ROS1", format!("Cannot coerce {actual:?} to {expected}"))
}

/// Create a type mismatch error.
fn type_mismatch(expected: &str, actual: &CodecValue) -> CoreResult<()> {
    Err(CodecError::encode(
        "ROS1",
        format!("Type mismatch: expected {expected}, got {actual:?}"),
    ))
}
