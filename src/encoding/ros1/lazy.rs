// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Lazy, read-only views over encoded ROS1 messages.
//!
//! A [`LazyView`] borrows the encoded bytes and decodes a field only when it
//! is asked for. Field offsets and decoded values are memoized per view in
//! [`OnceLock`] cells, so repeated access is cheap and views can be shared
//! across threads. All offsets are relative to the view's own start, which
//! is why a view over a sub-slice of a larger buffer decodes exactly like
//! one over a standalone copy.
//!
//! ```
//! use robomsg::Ros1Codec;
//!
//! let codec = Ros1Codec::from_definition("string name\nuint32[] ids").unwrap();
//! let data = [2, 0, 0, 0, b'h', b'i', 1, 0, 0, 0, 7, 0, 0, 0];
//! let view = codec.decode_message(&data);
//!
//! assert_eq!(view.get("name").unwrap().as_scalar().and_then(|v| v.as_str()), Some("hi"));
//! assert_eq!(view.size().unwrap(), data.len());
//! ```

use std::fmt;
use std::sync::OnceLock;

use crate::core::{CodecValue, DecodedMessage, PrimitiveType};
use crate::encoding::json::codec_value_to_json;
use crate::{CodecError, Result as CoreResult};

use super::compiler::CompiledCodec;
use super::cursor::Ros1Cursor;
use super::plan::{ArrayKind, CompiledType, ElementKind, FieldPlan, TypeIndex};
use super::scan::{check_depth, Scanner};

// ============================================================================
// Offset memoization
// ============================================================================

/// Memoized end offsets of a sequence of variable-size items.
///
/// The end of item `i` is the start of item `i + 1`. Resolving an item walks
/// forward from the closest already-known end, so sequential access skips
/// each item once.
struct OffsetTable {
    ends: Box<[OnceLock<usize>]>,
}

impl OffsetTable {
    fn new(len: usize) -> Self {
        Self {
            ends: (0..len).map(|_| OnceLock::new()).collect(),
        }
    }

    fn start<F>(&self, index: usize, skip: F) -> CoreResult<usize>
    where
        F: Fn(usize, usize) -> CoreResult<usize>,
    {
        if index == 0 {
            Ok(0)
        } else {
            self.end(index - 1, skip)
        }
    }

    /// `skip(i, start)` returns the end of item `i`.
    fn end<F>(&self, index: usize, skip: F) -> CoreResult<usize>
    where
        F: Fn(usize, usize) -> CoreResult<usize>,
    {
        if let Some(end) = self.ends[index].get() {
            return Ok(*end);
        }

        let mut first = index;
        let mut pos = 0;
        while first > 0 {
            if let Some(end) = self.ends[first - 1].get() {
                pos = *end;
                break;
            }
            first -= 1;
        }

        for i in first..=index {
            pos = skip(i, pos)?;
            // A concurrent reader may have stored the same offset first.
            let _ = self.ends[i].set(pos);
        }
        Ok(pos)
    }
}

fn empty_cells<T>(len: usize) -> Box<[OnceLock<T>]> {
    (0..len).map(|_| OnceLock::new()).collect()
}

fn tail(data: &[u8], start: usize) -> CoreResult<&[u8]> {
    data.get(start..)
        .ok_or_else(|| CodecError::buffer_too_short(start, data.len(), 0))
}

// ============================================================================
// LazyView
// ============================================================================

/// Read-only view of one encoded message.
///
/// Creating a view reads nothing. Each accessor decodes on first use and
/// caches the result for the lifetime of the view.
pub struct LazyView<'a> {
    codec: &'a CompiledCodec,
    type_index: TypeIndex,
    data: &'a [u8],
    depth: usize,
    offsets: OffsetTable,
    // wire fields first, then constants
    values: Box<[OnceLock<LazyValue<'a>>]>,
}

impl<'a> LazyView<'a> {
    /// View over `data`, which starts at the message and may extend past it.
    pub(crate) fn new(codec: &'a CompiledCodec, type_index: TypeIndex, data: &'a [u8]) -> Self {
        Self::with_depth(codec, type_index, data, 0)
    }

    fn with_depth(
        codec: &'a CompiledCodec,
        type_index: TypeIndex,
        data: &'a [u8],
        depth: usize,
    ) -> Self {
        let ty = codec.type_at(type_index);
        Self {
            codec,
            type_index,
            data,
            depth,
            offsets: OffsetTable::new(ty.fields.len()),
            values: empty_cells(ty.fields.len() + ty.constants.len()),
        }
    }

    fn nested(
        codec: &'a CompiledCodec,
        type_index: TypeIndex,
        data: &'a [u8],
        depth: usize,
    ) -> CoreResult<Self> {
        check_depth(codec, depth)?;
        Ok(Self::with_depth(codec, type_index, data, depth))
    }

    /// Layout plan of the viewed type.
    pub fn compiled_type(&self) -> &'a CompiledType {
        self.codec.type_at(self.type_index)
    }

    /// Name of the viewed type (`<root>` for an unnamed root).
    pub fn type_name(&self) -> &'a str {
        self.compiled_type().display_name()
    }

    /// Wire field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'a str> {
        self.compiled_type().fields.iter().map(|f| f.name.as_str())
    }

    /// Number of wire fields.
    pub fn len(&self) -> usize {
        self.compiled_type().fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field or constant by name.
    ///
    /// Constants come back as the value declared in the schema; they are
    /// never read from the buffer.
    pub fn get(&self, name: &str) -> CoreResult<&LazyValue<'a>> {
        let ty = self.compiled_type();
        if let Some(index) = ty.field_index(name) {
            return self.field(index);
        }
        if let Some(index) = ty.constant_index(name) {
            let slot = &self.values[ty.fields.len() + index];
            return Ok(slot.get_or_init(|| LazyValue::Scalar(ty.constants[index].value.clone())));
        }
        Err(CodecError::field_not_found(self.type_name(), name))
    }

    /// Wire field by position.
    pub fn field(&self, index: usize) -> CoreResult<&LazyValue<'a>> {
        let ty = self.compiled_type();
        if index >= ty.fields.len() {
            return Err(CodecError::index_out_of_bounds(index, ty.fields.len()));
        }
        if let Some(value) = self.values[index].get() {
            return Ok(value);
        }

        let field = &ty.fields[index];
        let start = self.field_start(index)?;
        let value = self
            .decode_field(field, start)
            .map_err(|e| e.in_field(&field.name, &field.declared_type(), start))?;
        Ok(self.values[index].get_or_init(|| value))
    }

    /// Schema value of a constant.
    pub fn constant(&self, name: &str) -> Option<&'a CodecValue> {
        self.compiled_type().constant(name).map(|c| &c.value)
    }

    /// Encoded length of this message in bytes.
    ///
    /// Fixed-size types answer without reading; otherwise the last field's
    /// end is resolved.
    pub fn size(&self) -> CoreResult<usize> {
        let ty = self.compiled_type();
        if let Some(size) = ty.fixed_size {
            return Scanner::new(self.codec, self.data).span(0, size);
        }
        match ty.fields.len() {
            0 => Ok(0),
            n => self.field_end(n - 1),
        }
    }

    /// The encoded bytes of this message.
    pub fn as_bytes(&self) -> CoreResult<&'a [u8]> {
        let size = self.size()?;
        Ok(&self.data[..size])
    }

    /// Decode every wire field into a plain value tree.
    ///
    /// Constants are not included. Writing the result back with the same
    /// codec reproduces the original bytes.
    pub fn materialize(&self) -> CoreResult<CodecValue> {
        let ty = self.compiled_type();
        let mut message = DecodedMessage::with_capacity(ty.fields.len());
        for (index, field) in ty.fields.iter().enumerate() {
            message.insert(field.name.clone(), self.field(index)?.materialize()?);
        }
        Ok(CodecValue::Struct(message))
    }

    /// Materialize and convert to JSON.
    pub fn to_json(&self) -> CoreResult<serde_json::Value> {
        Ok(codec_value_to_json(&self.materialize()?))
    }

    fn field_start(&self, index: usize) -> CoreResult<usize> {
        if let Some(offset) = self.compiled_type().static_offset(index) {
            return Ok(offset);
        }
        self.offsets.start(index, |i, pos| self.skip_field(i, pos))
    }

    fn field_end(&self, index: usize) -> CoreResult<usize> {
        self.offsets.end(index, |i, pos| self.skip_field(i, pos))
    }

    fn skip_field(&self, index: usize, pos: usize) -> CoreResult<usize> {
        let field = &self.compiled_type().fields[index];
        Scanner::new(self.codec, self.data)
            .skip_field(field, pos, self.depth)
            .map_err(|e| e.in_field(&field.name, &field.declared_type(), pos))
    }

    fn decode_field(&self, field: &FieldPlan, start: usize) -> CoreResult<LazyValue<'a>> {
        match field.array {
            ArrayKind::Single => match field.element {
                ElementKind::Primitive(prim) => {
                    let mut cursor = Ros1Cursor::at(self.data, start);
                    Ok(LazyValue::Scalar(
                        cursor.read_primitive(prim, self.codec.options())?,
                    ))
                }
                ElementKind::Complex(idx) => Ok(LazyValue::View(LazyView::nested(
                    self.codec,
                    idx,
                    tail(self.data, start)?,
                    self.depth + 1,
                )?)),
            },
            ArrayKind::Fixed(n) => self.decode_array(field, n, start),
            ArrayKind::Dynamic => {
                let (count, first) = Scanner::new(self.codec, self.data).array_count(field, start)?;
                self.decode_array(field, count, first)
            }
        }
    }

    fn decode_array(&self, field: &FieldPlan, count: usize, start: usize) -> CoreResult<LazyValue<'a>> {
        let fixed_bytes = match field.element_size {
            Some(size) => Some(
                size.checked_mul(count)
                    .ok_or_else(|| CodecError::length_exceeded(count, start, self.data.len()))?,
            ),
            None => None,
        };

        if let (ElementKind::Primitive(prim), Some(len)) = (field.element, fixed_bytes) {
            let bytes = Ros1Cursor::at(self.data, start).read_bytes(len)?;
            return Ok(LazyValue::Primitives(PrimitiveArray::new(prim, count, bytes)));
        }

        let data = match fixed_bytes {
            Some(len) => Ros1Cursor::at(self.data, start).read_bytes(len)?,
            None => tail(self.data, start)?,
        };
        Ok(LazyValue::Array(LazyArray::new(
            self.codec,
            field.element,
            field.element_size,
            count,
            data,
            self.depth,
        )))
    }
}

impl fmt::Debug for LazyView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyView")
            .field("type", &self.type_name())
            .field("bytes", &self.data.len())
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// LazyValue
// ============================================================================

/// A decoded field: a scalar, an array, or a nested view.
#[derive(Debug)]
pub enum LazyValue<'a> {
    /// A single primitive, or a constant
    Scalar(CodecValue),
    /// Array of fixed-width primitives, borrowed from the buffer
    Primitives(PrimitiveArray<'a>),
    /// Array of strings or messages, decoded per element on access
    Array(LazyArray<'a>),
    /// Nested message
    View(LazyView<'a>),
}

impl<'a> LazyValue<'a> {
    pub fn as_scalar(&self) -> Option<&CodecValue> {
        match self {
            LazyValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_view(&self) -> Option<&LazyView<'a>> {
        match self {
            LazyValue::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&LazyArray<'a>> {
        match self {
            LazyValue::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_primitives(&self) -> Option<&PrimitiveArray<'a>> {
        match self {
            LazyValue::Primitives(array) => Some(array),
            _ => None,
        }
    }

    /// Raw payload of a `uint8` array.
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            LazyValue::Primitives(array) => array.as_bytes(),
            _ => None,
        }
    }

    /// Element count for arrays.
    pub fn array_len(&self) -> Option<usize> {
        match self {
            LazyValue::Primitives(array) => Some(array.len()),
            LazyValue::Array(array) => Some(array.len()),
            _ => None,
        }
    }

    /// Convert to a plain value tree.
    pub fn materialize(&self) -> CoreResult<CodecValue> {
        match self {
            LazyValue::Scalar(value) => Ok(value.clone()),
            LazyValue::Primitives(array) => Ok(array.materialize()),
            LazyValue::Array(array) => array.materialize(),
            LazyValue::View(view) => view.materialize(),
        }
    }

    /// Materialize and convert to JSON.
    pub fn to_json(&self) -> CoreResult<serde_json::Value> {
        Ok(codec_value_to_json(&self.materialize()?))
    }
}

// ============================================================================
// PrimitiveArray
// ============================================================================

/// Fixed-width primitive elements, read by offset arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveArray<'a> {
    primitive: PrimitiveType,
    len: usize,
    data: &'a [u8],
}

impl<'a> PrimitiveArray<'a> {
    /// `data` must hold exactly `len` elements.
    fn new(primitive: PrimitiveType, len: usize, data: &'a [u8]) -> Self {
        Self {
            primitive,
            len,
            data,
        }
    }

    pub const fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The encoded elements, without any count prefix.
    pub const fn raw(&self) -> &'a [u8] {
        self.data
    }

    /// The payload when the elements are `uint8`.
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        (self.primitive == PrimitiveType::UInt8).then_some(self.data)
    }

    /// Element `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<CodecValue> {
        if index >= self.len {
            return None;
        }
        let size = self.primitive.fixed_size()?;
        let start = index * size;
        let chunk = self.data.get(start..start + size)?;
        Ros1Cursor::new(chunk)
            .read_primitive(self.primitive, &Default::default())
            .ok()
    }

    /// Every element in order.
    ///
    /// The payload length is checked against `len` when the array is read,
    /// so each index below `len` decodes; a missing element is a bug and
    /// shows up as [`CodecValue::Null`] rather than a shorter array.
    pub fn iter(&self) -> impl Iterator<Item = CodecValue> + '_ {
        (0..self.len).map(move |i| self.get(i).unwrap_or(CodecValue::Null))
    }

    /// `uint8` elements become [`CodecValue::Bytes`], everything else an array.
    pub fn materialize(&self) -> CodecValue {
        match self.as_bytes() {
            Some(bytes) => CodecValue::Bytes(bytes.to_vec()),
            None => CodecValue::Array(self.iter().collect()),
        }
    }
}

// ============================================================================
// LazyArray
// ============================================================================

/// Array of strings or messages.
///
/// Elements are decoded on first access and cached. Fixed-size message
/// elements are located by arithmetic; variable-size ones by skipping from
/// the closest element whose end is already known. The per-element caches
/// are allocated on the first element access, not when the array is read.
pub struct LazyArray<'a> {
    codec: &'a CompiledCodec,
    element: ElementKind,
    element_size: Option<usize>,
    len: usize,
    data: &'a [u8],
    // depth of the message that owns the field
    depth: usize,
    offsets: OnceLock<OffsetTable>,
    values: OnceLock<Box<[OnceLock<LazyValue<'a>>]>>,
}

impl<'a> LazyArray<'a> {
    fn new(
        codec: &'a CompiledCodec,
        element: ElementKind,
        element_size: Option<usize>,
        len: usize,
        data: &'a [u8],
        depth: usize,
    ) -> Self {
        Self {
            codec,
            element,
            element_size,
            len,
            data,
            depth,
            offsets: OnceLock::new(),
            values: OnceLock::new(),
        }
    }

    fn cells(&self) -> &[OnceLock<LazyValue<'a>>] {
        self.values.get_or_init(|| empty_cells(self.len))
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Element `index`, decoded on first access.
    pub fn get(&self, index: usize) -> CoreResult<&LazyValue<'a>> {
        if index >= self.len {
            return Err(CodecError::index_out_of_bounds(index, self.len));
        }
        let cells = self.cells();
        if let Some(value) = cells[index].get() {
            return Ok(value);
        }

        let start = self.element_start(index)?;
        let value = match self.element {
            ElementKind::Primitive(prim) => {
                let mut cursor = Ros1Cursor::at(self.data, start);
                LazyValue::Scalar(cursor.read_primitive(prim, self.codec.options())?)
            }
            ElementKind::Complex(idx) => LazyValue::View(LazyView::nested(
                self.codec,
                idx,
                tail(self.data, start)?,
                self.depth + 1,
            )?),
        };
        Ok(cells[index].get_or_init(|| value))
    }

    pub fn iter(&self) -> impl Iterator<Item = CoreResult<&LazyValue<'a>>> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }

    /// Decode every element into a plain array.
    pub fn materialize(&self) -> CoreResult<CodecValue> {
        let items = self
            .iter()
            .map(|item| item?.materialize())
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(CodecValue::Array(items))
    }

    fn element_start(&self, index: usize) -> CoreResult<usize> {
        match self.element_size {
            Some(size) => Ok(index * size),
            None => self
                .offsets
                .get_or_init(|| OffsetTable::new(self.len))
                .start(index, |_, pos| {
                    Scanner::new(self.codec, self.data).skip_element(
                        self.element,
                        pos,
                        self.depth,
                    )
                }),
        }
    }
}

impl fmt::Debug for LazyArray<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyArray")
            .field("element", &self.element)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
