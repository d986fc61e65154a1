// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS1 cursor for reading little-endian data.
//!
//! ROS1 has no encapsulation header and no alignment, so the cursor is a
//! plain position over a byte slice with bounds-checked reads.

use byteorder::{ByteOrder, LittleEndian};

use crate::core::{CodecOptions, CodecValue, PrimitiveType};
use crate::encoding::json::json_to_codec_value;
use crate::{CodecError, Result as CoreResult};

/// Read position over ROS1-encoded bytes.
///
/// # Example
///
/// ```
/// use robomsg::encoding::ros1::cursor::Ros1Cursor;
///
/// let data = [0x2a, 0x00, 0x00, 0x00];
/// let mut cursor = Ros1Cursor::new(&data);
/// assert_eq!(cursor.read_u32().unwrap(), 42);
/// assert!(cursor.is_at_end());
/// ```
#[derive(Debug, Clone)]
pub struct Ros1Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Ros1Cursor<'a> {
    /// Create a cursor at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Create a cursor at `offset` into `data`.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, offset }
    }

    /// Get the current read position.
    pub const fn position(&self) -> usize {
        self.offset
    }

    /// Get the number of bytes left.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Whether all bytes have been consumed.
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume the next `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> CoreResult<&'a [u8]> {
        if count > self.remaining() {
            return Err(CodecError::buffer_too_short(
                count,
                self.remaining(),
                self.offset as u64,
            ));
        }
        let start = self.offset;
        self.offset += count;
        Ok(&self.data[start..self.offset])
    }

    /// Advance past `count` bytes.
    pub fn skip(&mut self, count: usize) -> CoreResult<()> {
        self.read_bytes(count).map(|_| ())
    }

    pub fn read_u8(&mut self) -> CoreResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> CoreResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a bool; any nonzero byte is `true`.
    pub fn read_bool(&mut self) -> CoreResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> CoreResult<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> CoreResult<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> CoreResult<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> CoreResult<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_u64(&mut self) -> CoreResult<u64> {
        Ok(LittleEndian::read_u64(self.read_bytes(8)?))
    }

    pub fn read_i64(&mut self) -> CoreResult<i64> {
        Ok(LittleEndian::read_i64(self.read_bytes(8)?))
    }

    pub fn read_f32(&mut self) -> CoreResult<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_f64(&mut self) -> CoreResult<f64> {
        Ok(LittleEndian::read_f64(self.read_bytes(8)?))
    }

    /// Read a u32 length prefix and check it against `max` and the data.
    ///
    /// `unit` is the byte size of one counted item, used to reject counts
    /// the remaining bytes cannot possibly hold.
    pub fn read_length(&mut self, max: usize, unit: usize) -> CoreResult<usize> {
        let position = self.offset;
        let length = self.read_u32()? as usize;
        let needed = length.saturating_mul(unit);
        if length > max || needed > self.remaining() {
            return Err(CodecError::length_exceeded(
                length,
                position,
                self.data.len(),
            ));
        }
        Ok(length)
    }

    /// Read a length-prefixed string as borrowed UTF-8.
    pub fn read_str(&mut self, max: usize) -> CoreResult<&'a str> {
        let position = self.offset;
        let len = self.read_length(max, 1)?;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes).map_err(|e| {
            CodecError::parse(
                "string",
                format!("invalid UTF-8 at position {position}: {e}"),
            )
        })
    }

    /// Skip a length-prefixed string without validating it.
    pub fn skip_string(&mut self, max: usize) -> CoreResult<()> {
        let len = self.read_length(max, 1)?;
        self.skip(len)
    }

    /// Read one primitive value.
    pub fn read_primitive(
        &mut self,
        prim: PrimitiveType,
        options: &CodecOptions,
    ) -> CoreResult<CodecValue> {
        Ok(match prim {
            PrimitiveType::Bool => CodecValue::Bool(self.read_bool()?),
            PrimitiveType::Int8 => CodecValue::Int8(self.read_i8()?),
            PrimitiveType::Int16 => CodecValue::Int16(self.read_i16()?),
            PrimitiveType::Int32 => CodecValue::Int32(self.read_i32()?),
            PrimitiveType::Int64 => CodecValue::Int64(self.read_i64()?),
            PrimitiveType::UInt8 => CodecValue::UInt8(self.read_u8()?),
            PrimitiveType::UInt16 => CodecValue::UInt16(self.read_u16()?),
            PrimitiveType::UInt32 => CodecValue::UInt32(self.read_u32()?),
            PrimitiveType::UInt64 => CodecValue::UInt64(self.read_u64()?),
            PrimitiveType::Float32 => CodecValue::Float32(self.read_f32()?),
            PrimitiveType::Float64 => CodecValue::Float64(self.read_f64()?),
            PrimitiveType::String => {
                CodecValue::String(self.read_str(options.max_string_length)?.to_string())
            }
            PrimitiveType::Time => CodecValue::Time {
                sec: self.read_u32()?,
                nsec: self.read_u32()?,
            },
            PrimitiveType::Duration => CodecValue::Duration {
                sec: self.read_i32()?,
                nsec: self.read_i32()?,
            },
            PrimitiveType::Json => {
                let text = self.read_str(options.max_string_length)?;
                let json: serde_json::Value = serde_json::from_str(text)
                    .map_err(|e| CodecError::parse("json", format!("{e}")))?;
                json_to_codec_value(&json)?
            }
        })
    }

    /// Advance past one primitive value.
    pub fn skip_primitive(&mut self, prim: PrimitiveType, options: &CodecOptions) -> CoreResult<()> {
        match prim.fixed_size() {
            Some(size) => self.skip(size),
            None => self.skip_string(options.max_string_length),
        }
    }
}
