// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Skip over encoded values without decoding them.
//!
//! Used to find where a field starts, how long a message is, and where the
//! next array element begins. Fixed-size regions are skipped by arithmetic;
//! only length prefixes are read.

use crate::{CodecError, Result as CoreResult};

use super::compiler::CompiledCodec;
use super::cursor::Ros1Cursor;
use super::plan::{ArrayKind, ElementKind, FieldPlan, TypeIndex};

/// Offsets returned by a scanner are relative to the start of `data`.
pub(crate) struct Scanner<'a> {
    codec: &'a CompiledCodec,
    data: &'a [u8],
}

impl<'a> Scanner<'a> {
    pub fn new(codec: &'a CompiledCodec, data: &'a [u8]) -> Self {
        Self { codec, data }
    }

    /// End of a `size`-byte region starting at `pos`, checked against the data.
    pub fn span(&self, pos: usize, size: usize) -> CoreResult<usize> {
        match pos.checked_add(size) {
            Some(end) if end <= self.data.len() => Ok(end),
            _ => Err(CodecError::buffer_too_short(
                size,
                self.data.len().saturating_sub(pos),
                pos as u64,
            )),
        }
    }

    /// End of the message of type `type_index` starting at `pos`.
    pub fn skip_type(&self, type_index: TypeIndex, pos: usize, depth: usize) -> CoreResult<usize> {
        check_depth(self.codec, depth)?;
        let ty = self.codec.type_at(type_index);
        if let Some(size) = ty.fixed_size {
            return self.span(pos, size);
        }

        let mut at = pos;
        for field in &ty.fields {
            let start = at;
            at = self
                .skip_field(field, start, depth)
                .map_err(|e| e.in_field(&field.name, &field.declared_type(), start - pos))?;
        }
        Ok(at)
    }

    /// End of `field` starting at `pos` inside a message at `depth`.
    pub fn skip_field(&self, field: &FieldPlan, pos: usize, depth: usize) -> CoreResult<usize> {
        if let Some(size) = field.fixed_size {
            return self.span(pos, size);
        }
        match field.array {
            ArrayKind::Single => self.skip_element(field.element, pos, depth),
            ArrayKind::Fixed(n) => self.skip_elements(field, n, pos, depth),
            ArrayKind::Dynamic => {
                let (count, start) = self.array_count(field, pos)?;
                self.skip_elements(field, count, start, depth)
            }
        }
    }

    /// Read a dynamic array's count; returns the count and the offset of
    /// the first element.
    ///
    /// A count whose elements could not fit in the remaining bytes, even at
    /// their smallest encoding, is rejected before anything is allocated.
    pub fn array_count(&self, field: &FieldPlan, pos: usize) -> CoreResult<(usize, usize)> {
        let mut cursor = Ros1Cursor::at(self.data, pos);
        let count = cursor.read_length(
            self.codec.options().max_array_length,
            field.min_element_size,
        )?;
        Ok((count, cursor.position()))
    }

    fn skip_elements(
        &self,
        field: &FieldPlan,
        count: usize,
        pos: usize,
        depth: usize,
    ) -> CoreResult<usize> {
        if let Some(size) = field.element_size {
            let total = size.checked_mul(count).ok_or_else(|| {
                CodecError::length_exceeded(count, pos, self.data.len())
            })?;
            return self.span(pos, total);
        }
        let mut at = pos;
        for _ in 0..count {
            at = self.skip_element(field.element, at, depth)?;
        }
        Ok(at)
    }

    /// End of one element starting at `pos`, for an element of a message
    /// at `depth`.
    pub fn skip_element(&self, element: ElementKind, pos: usize, depth: usize) -> CoreResult<usize> {
        match element {
            ElementKind::Primitive(prim) => {
                let mut cursor = Ros1Cursor::at(self.data, pos);
                cursor.skip_primitive(prim, self.codec.options())?;
                Ok(cursor.position())
            }
            ElementKind::Complex(idx) => self.skip_type(idx, pos, depth + 1),
        }
    }
}

/// Fail once nesting goes past the configured limit.
pub(crate) fn check_depth(codec: &CompiledCodec, depth: usize) -> CoreResult<()> {
    let max_depth = codec.options().max_depth;
    if depth > max_depth {
        return Err(CodecError::Other(format!(
            "Maximum decoding depth exceeded ({max_depth})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::ros1::compile;
    use crate::schema::parse_message_definition;
    use crate::ParseOptions;

    fn codec(text: &str) -> CompiledCodec {
        compile(&parse_message_definition(text, &ParseOptions::default()).unwrap()).unwrap()
    }

    #[test]
    fn test_skip_fixed_type_is_arithmetic() {
        let codec = codec("int32 a\nfloat64 b");
        let data = [0u8; 12];
        let scanner = Scanner::new(&codec, &data);
        assert_eq!(scanner.skip_type(codec.root_index(), 0, 0).unwrap(), 12);
        assert!(scanner.skip_type(codec.root_index(), 4, 0).is_err());
    }

    #[test]
    fn test_skip_strings_and_dynamic_arrays() {
        let codec = codec("string s\nint16[] v\nstring[] names");
        let mut data = Vec::new();
        data.extend_from_slice(&[2, 0, 0, 0, b'h', b'i']);
        data.extend_from_slice(&[2, 0, 0, 0, 1, 0, 2, 0]);
        data.extend_from_slice(&[2, 0, 0, 0, 1, 0, 0, 0, b'a', 0, 0, 0, 0]);
        let scanner = Scanner::new(&codec, &data);
        assert_eq!(scanner.skip_type(codec.root_index(), 0, 0).unwrap(), data.len());
    }

    #[test]
    fn test_skip_reports_failing_field() {
        let codec = codec("int32 a\nstring s");
        let data = [0, 0, 0, 0, 9, 0, 0, 0, b'x'];
        let scanner = Scanner::new(&codec, &data);
        let err = scanner.skip_type(codec.root_index(), 0, 0).unwrap_err();
        match err {
            CodecError::FieldDecodeError {
                field_name,
                cursor_pos,
                ..
            } => {
                assert_eq!(field_name, "s");
                assert_eq!(cursor_pos, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_array_count_rejects_impossible_counts() {
        let codec = codec("float64[] v");
        let data = [3, 0, 0, 0, 0, 0, 0, 0];
        let scanner = Scanner::new(&codec, &data);
        let field = &codec.root_type().fields[0];
        assert!(matches!(
            scanner.array_count(field, 0),
            Err(CodecError::LengthExceeded { length: 3, .. })
        ));
    }
}
