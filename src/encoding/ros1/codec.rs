// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encode and decode entry points of a compiled ROS1 codec.

use std::ops::Deref;
use std::sync::Arc;

use tracing::trace;

use crate::core::{CodecOptions, CodecValue};
use crate::schema::{parse_message_definition, ParseOptions, TypeDefinition};
use crate::{CodecError, Result as CoreResult};

use super::calculator::SizeCalculator;
use super::compiler::{compile_with_options, CompiledCodec};
use super::encoder::MessageEncoder;
use super::lazy::LazyView;
use super::plan::TypeIndex;
use super::scan::Scanner;
use super::writer::Ros1Writer;

impl CompiledCodec {
    /// Encoded size of `value` as the root type.
    pub fn calculate_byte_size(&self, value: &CodecValue) -> CoreResult<usize> {
        self.size_value(self.root_index(), value)
    }

    /// Encoded size of `value` as the named type.
    pub fn calculate_type_byte_size(&self, type_name: &str, value: &CodecValue) -> CoreResult<usize> {
        self.size_value(self.resolve(Some(type_name))?, value)
    }

    /// Write `value` as the root type into `dest[offset..offset + len]`.
    ///
    /// Returns the number of bytes written. Nothing outside the range is
    /// touched, and a range too small for the value is an error.
    pub fn write(
        &self,
        value: &CodecValue,
        dest: &mut [u8],
        offset: usize,
        len: usize,
    ) -> CoreResult<usize> {
        self.write_value(self.root_index(), value, dest, offset, len)
    }

    /// Write `value` as the named type into `dest[offset..offset + len]`.
    pub fn write_type(
        &self,
        type_name: &str,
        value: &CodecValue,
        dest: &mut [u8],
        offset: usize,
        len: usize,
    ) -> CoreResult<usize> {
        self.write_value(self.resolve(Some(type_name))?, value, dest, offset, len)
    }

    /// Size and write `value` as the root type into a new buffer.
    pub fn write_message(&self, value: &CodecValue) -> CoreResult<Vec<u8>> {
        let size = self.calculate_byte_size(value)?;
        let mut buf = vec![0u8; size];
        let written = self.write(value, &mut buf, 0, size)?;
        if written != size {
            return Err(CodecError::encode(
                "ROS1",
                format!("Wrote {written} bytes but calculated {size}"),
            ));
        }
        trace!(type_name = self.root_type().display_name(), size, "encoded message");
        Ok(buf)
    }

    /// Lazy view of the root type over `src[offset..offset + len]`.
    ///
    /// Offsets inside the view are relative to `offset`, so the result does
    /// not depend on where the message sits in `src`.
    pub fn decode<'a>(&'a self, src: &'a [u8], offset: usize, len: usize) -> CoreResult<LazyView<'a>> {
        self.view(self.root_index(), src, offset, len)
    }

    /// Lazy view of the named type over `src[offset..offset + len]`.
    pub fn decode_type<'a>(
        &'a self,
        type_name: &str,
        src: &'a [u8],
        offset: usize,
        len: usize,
    ) -> CoreResult<LazyView<'a>> {
        self.view(self.resolve(Some(type_name))?, src, offset, len)
    }

    /// Lazy view of the root type over all of `src`.
    pub fn decode_message<'a>(&'a self, src: &'a [u8]) -> LazyView<'a> {
        LazyView::new(self, self.root_index(), src)
    }

    /// Encoded length of the root-type message at the start of `src`.
    ///
    /// Only length prefixes are read; `src` may extend past the message.
    pub fn size(&self, src: &[u8]) -> CoreResult<usize> {
        Scanner::new(self, src).skip_type(self.root_index(), 0, 0)
    }

    /// Encoded length of a named-type message at the start of `src`.
    pub fn type_size(&self, type_name: &str, src: &[u8]) -> CoreResult<usize> {
        Scanner::new(self, src).skip_type(self.resolve(Some(type_name))?, 0, 0)
    }

    fn size_value(&self, type_index: TypeIndex, value: &CodecValue) -> CoreResult<usize> {
        let mut calc = SizeCalculator::new();
        MessageEncoder::new(self, &mut calc).encode_message(type_index, value)?;
        Ok(calc.size())
    }

    fn write_value(
        &self,
        type_index: TypeIndex,
        value: &CodecValue,
        dest: &mut [u8],
        offset: usize,
        len: usize,
    ) -> CoreResult<usize> {
        let region = checked_range(dest.len(), offset, len)?;
        let mut writer = Ros1Writer::new(&mut dest[region]);
        MessageEncoder::new(self, &mut writer).encode_message(type_index, value)?;
        Ok(writer.position())
    }

    fn view<'a>(
        &'a self,
        type_index: TypeIndex,
        src: &'a [u8],
        offset: usize,
        len: usize,
    ) -> CoreResult<LazyView<'a>> {
        let region = checked_range(src.len(), offset, len)?;
        Ok(LazyView::new(self, type_index, &src[region]))
    }
}

fn checked_range(
    buffer_len: usize,
    offset: usize,
    len: usize,
) -> CoreResult<std::ops::Range<usize>> {
    match offset.checked_add(len) {
        Some(end) if end <= buffer_len => Ok(offset..end),
        _ => Err(CodecError::buffer_too_short(
            len,
            buffer_len.saturating_sub(offset),
            offset as u64,
        )),
    }
}

/// A ROS1 codec built from message definition text.
///
/// Keeps the parsed definitions next to the shared compiled codec and
/// dereferences to [`CompiledCodec`] for encoding and decoding.
///
/// # Example
///
/// ```
/// use robomsg::{CodecValue, Ros1Codec};
///
/// let codec = Ros1Codec::from_definition("string data").unwrap();
/// let value = CodecValue::from_fields([("data", CodecValue::String("hello".into()))]);
/// let bytes = codec.write_message(&value).unwrap();
/// assert_eq!(bytes, [5, 0, 0, 0, b'h', b'e', b'l', b'l', b'o']);
///
/// let view = codec.decode_message(&bytes);
/// assert_eq!(view.materialize().unwrap(), value);
/// ```
#[derive(Debug, Clone)]
pub struct Ros1Codec {
    definitions: Vec<TypeDefinition>,
    compiled: Arc<CompiledCodec>,
}

impl Ros1Codec {
    /// Parse and compile definition text with default options.
    pub fn from_definition(definition: &str) -> CoreResult<Self> {
        Self::from_definition_with(definition, &ParseOptions::default(), CodecOptions::default())
    }

    /// Parse and compile definition text.
    pub fn from_definition_with(
        definition: &str,
        parse_options: &ParseOptions,
        options: CodecOptions,
    ) -> CoreResult<Self> {
        let definitions = parse_message_definition(definition, parse_options)?;
        Self::from_types_with(definitions, options)
    }

    /// Compile already parsed definitions.
    pub fn from_types(definitions: Vec<TypeDefinition>) -> CoreResult<Self> {
        Self::from_types_with(definitions, CodecOptions::default())
    }

    pub fn from_types_with(
        definitions: Vec<TypeDefinition>,
        options: CodecOptions,
    ) -> CoreResult<Self> {
        let compiled = Arc::new(compile_with_options(&definitions, options)?);
        Ok(Self {
            definitions,
            compiled,
        })
    }

    /// The definitions this codec was compiled from.
    pub fn definitions(&self) -> &[TypeDefinition] {
        &self.definitions
    }

    /// Shared handle to the compiled codec.
    pub fn shared(&self) -> Arc<CompiledCodec> {
        Arc::clone(&self.compiled)
    }
}

impl Deref for Ros1Codec {
    type Target = CompiledCodec;

    fn deref(&self) -> &CompiledCodec {
        &self.compiled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_message(s: &str) -> CodecValue {
        CodecValue::from_fields([("data", CodecValue::String(s.to_string()))])
    }

    #[test]
    fn test_hello_string_layout() {
        let codec = Ros1Codec::from_definition("string data").unwrap();
        let value = string_message("hello");
        assert_eq!(codec.calculate_byte_size(&value).unwrap(), 9);
        let bytes = codec.write_message(&value).unwrap();
        assert_eq!(bytes, [0x05, 0x00, 0x00, 0x00, 0x68, 0x65, 0x6c, 0x6c, 0x6f]);
        assert_eq!(codec.size(&bytes).unwrap(), 9);
    }

    #[test]
    fn test_write_into_sub_range() {
        let codec = Ros1Codec::from_definition("uint16 a\nuint8 b").unwrap();
        let value = CodecValue::from_fields([
            ("a", CodecValue::UInt16(0x0201)),
            ("b", CodecValue::UInt8(3)),
        ]);
        let mut buf = [0xeeu8; 8];
        let written = codec.write(&value, &mut buf, 2, 4).unwrap();
        assert_eq!(written, 3);
        assert_eq!(buf, [0xee, 0xee, 0x01, 0x02, 0x03, 0xee, 0xee, 0xee]);
    }

    #[test]
    fn test_write_range_too_small() {
        let codec = Ros1Codec::from_definition("string data").unwrap();
        let mut buf = [0u8; 16];
        let err = codec
            .write(&string_message("hello"), &mut buf, 0, 6)
            .unwrap_err();
        assert!(matches!(err, CodecError::StringOverflow { written: 5, .. }));

        assert!(codec
            .write(&string_message("hello"), &mut buf, 10, 9)
            .is_err());
    }

    #[test]
    fn test_decode_range_checks() {
        let codec = Ros1Codec::from_definition("uint8 a").unwrap();
        let data = [1, 2, 3];
        let view = codec.decode(&data, 2, 1).unwrap();
        assert_eq!(view.materialize().unwrap(), CodecValue::from_fields([("a", CodecValue::UInt8(3))]));
        assert!(codec.decode(&data, 2, 2).is_err());
        assert!(codec.decode(&data, usize::MAX, 2).is_err());
    }

    #[test]
    fn test_named_type_entry_points() {
        let codec = Ros1Codec::from_definition(
            "pkg/Point p\n====\nMSG: pkg/Point\nfloat32 x\nfloat32 y",
        )
        .unwrap();
        let point = CodecValue::from_fields([
            ("x", CodecValue::Float32(1.0)),
            ("y", CodecValue::Float32(2.0)),
        ]);
        assert_eq!(codec.calculate_type_byte_size("pkg/Point", &point).unwrap(), 8);

        let mut buf = [0u8; 8];
        codec.write_type("pkg/Point", &point, &mut buf, 0, 8).unwrap();
        assert_eq!(codec.type_size("pkg/Point", &buf).unwrap(), 8);
        let view = codec.decode_type("pkg/Point", &buf, 0, 8).unwrap();
        assert_eq!(view.materialize().unwrap(), point);

        assert!(matches!(
            codec.calculate_type_byte_size("pkg/Missing", &point),
            Err(CodecError::TypeNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_field_is_error() {
        let codec = Ros1Codec::from_definition("int32 a\nint32 b").unwrap();
        let value = CodecValue::from_fields([("a", CodecValue::Int32(1))]);
        let err = codec.calculate_byte_size(&value).unwrap_err();
        assert!(err.to_string().contains("Missing field 'b'"));
    }

    #[test]
    fn test_json_field_round_trip() {
        let codec = Ros1Codec::from_definition("json payload\nuint8 tag").unwrap();
        let payload = CodecValue::from_fields([(
            "a",
            CodecValue::Array(vec![CodecValue::Int64(1), CodecValue::Bool(true)]),
        )]);
        let value = CodecValue::from_fields([
            ("payload", payload.clone()),
            ("tag", CodecValue::UInt8(9)),
        ]);

        let text = br#"{"a":[1,true]}"#;
        assert_eq!(codec.calculate_byte_size(&value).unwrap(), 4 + text.len() + 1);

        let bytes = codec.write_message(&value).unwrap();
        let mut expected = (text.len() as u32).to_le_bytes().to_vec();
        expected.extend_from_slice(text);
        expected.push(9);
        assert_eq!(bytes, expected);

        let view = codec.decode_message(&bytes);
        assert_eq!(view.get("payload").unwrap().as_scalar(), Some(&payload));
        assert_eq!(view.materialize().unwrap(), value);
    }

    #[test]
    fn test_json_field_rejects_invalid_text() {
        let codec = Ros1Codec::from_definition("json payload").unwrap();
        let bytes = [3, 0, 0, 0, b'{', b'{', b'}'];
        let view = codec.decode_message(&bytes);
        assert!(view.get("payload").is_err());
    }

    #[test]
    fn test_shared_handle() {
        let codec = Ros1Codec::from_definition("int8 a").unwrap();
        let shared = codec.shared();
        assert_eq!(shared.root_type().fields.len(), 1);
        assert_eq!(codec.definitions().len(), 1);
    }
}
