// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS1 writer over a caller-provided byte range.
//!
//! Every write checks the remaining space first, so a writer never touches
//! bytes outside the slice it was given.

use byteorder::{ByteOrder, LittleEndian};

use super::encoder::{string_length_prefix, WireSink};
use crate::{CodecError, Result as CoreResult};

/// Little-endian writer into a fixed byte slice.
///
/// # Example
///
/// ```
/// use robomsg::encoding::ros1::writer::Ros1Writer;
///
/// let mut buf = [0u8; 9];
/// let mut writer = Ros1Writer::new(&mut buf);
/// writer.write_string("hello").unwrap();
/// assert_eq!(writer.position(), 9);
/// assert_eq!(buf, [5, 0, 0, 0, b'h', b'e', b'l', b'l', b'o']);
/// ```
pub struct Ros1Writer<'a> {
    buf: &'a mut [u8],
    offset: usize,
}

impl<'a> Ros1Writer<'a> {
    /// Create a writer positioned at the start of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Bytes written so far.
    pub const fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left in the destination.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// Claim the next `count` bytes.
    fn take(&mut self, count: usize) -> CoreResult<&mut [u8]> {
        if count > self.remaining() {
            return Err(CodecError::buffer_too_short(
                count,
                self.remaining(),
                self.offset as u64,
            ));
        }
        let start = self.offset;
        self.offset += count;
        Ok(&mut self.buf[start..self.offset])
    }

    pub fn write_u8(&mut self, value: u8) -> CoreResult<()> {
        self.take(1)?[0] = value;
        Ok(())
    }

    pub fn write_i8(&mut self, value: i8) -> CoreResult<()> {
        self.write_u8(value as u8)
    }

    pub fn write_u16(&mut self, value: u16) -> CoreResult<()> {
        LittleEndian::write_u16(self.take(2)?, value);
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> CoreResult<()> {
        LittleEndian::write_i16(self.take(2)?, value);
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> CoreResult<()> {
        LittleEndian::write_u32(self.take(4)?, value);
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> CoreResult<()> {
        LittleEndian::write_i32(self.take(4)?, value);
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> CoreResult<()> {
        LittleEndian::write_u64(self.take(8)?, value);
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> CoreResult<()> {
        LittleEndian::write_i64(self.take(8)?, value);
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> CoreResult<()> {
        LittleEndian::write_f32(self.take(4)?, value);
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> CoreResult<()> {
        LittleEndian::write_f64(self.take(8)?, value);
        Ok(())
    }

    /// Write raw bytes with no prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> CoreResult<()> {
        self.take(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Write a length-prefixed UTF-8 string.
    ///
    /// Fails with [`CodecError::StringOverflow`] when the encoded bytes do
    /// not fit after the length prefix.
    pub fn write_string(&mut self, value: &str) -> CoreResult<()> {
        let bytes = value.as_bytes();
        self.write_u32(string_length_prefix(bytes.len())?)?;
        if bytes.len() > self.remaining() {
            return Err(CodecError::string_overflow(
                bytes.len(),
                self.remaining(),
                self.offset,
            ));
        }
        self.write_bytes(bytes)
    }
}

impl WireSink for Ros1Writer<'_> {
    fn bool(&mut self, value: bool) -> CoreResult<()> {
        self.write_u8(u8::from(value))
    }

    fn int8(&mut self, value: i8) -> CoreResult<()> {
        self.write_i8(value)
    }

    fn uint8(&mut self, value: u8) -> CoreResult<()> {
        self.write_u8(value)
    }

    fn int16(&mut self, value: i16) -> CoreResult<()> {
        self.write_i16(value)
    }

    fn uint16(&mut self, value: u16) -> CoreResult<()> {
        self.write_u16(value)
    }

    fn int32(&mut self, value: i32) -> CoreResult<()> {
        self.write_i32(value)
    }

    fn uint32(&mut self, value: u32) -> CoreResult<()> {
        self.write_u32(value)
    }

    fn int64(&mut self, value: i64) -> CoreResult<()> {
        self.write_i64(value)
    }

    fn uint64(&mut self, value: u64) -> CoreResult<()> {
        self.write_u64(value)
    }

    fn float32(&mut self, value: f32) -> CoreResult<()> {
        self.write_f32(value)
    }

    fn float64(&mut self, value: f64) -> CoreResult<()> {
        self.write_f64(value)
    }

    fn string(&mut self, value: &str) -> CoreResult<()> {
        self.write_string(value)
    }

    fn bytes(&mut self, value: &[u8]) -> CoreResult<()> {
        self.write_bytes(value)
    }

    fn time(&mut self, sec: u32, nsec: u32) -> CoreResult<()> {
        self.write_u32(sec)?;
        self.write_u32(nsec)
    }

    fn duration(&mut self, sec: i32, nsec: i32) -> CoreResult<()> {
        self.write_i32(sec)?;
        self.write_i32(nsec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_little_endian() {
        let mut buf = [0u8; 14];
        let mut writer = Ros1Writer::new(&mut buf);
        writer.write_u16(0x0102).unwrap();
        writer.write_i32(-2).unwrap();
        writer.write_f64(1.0).unwrap();
        assert_eq!(writer.position(), 14);
        assert_eq!(&buf[..2], &[0x02, 0x01]);
        assert_eq!(&buf[2..6], &[0xfe, 0xff, 0xff, 0xff]);
        assert_eq!(&buf[6..], &1.0f64.to_le_bytes());
    }

    #[test]
    fn test_write_past_end_fails() {
        let mut buf = [0u8; 3];
        let mut writer = Ros1Writer::new(&mut buf);
        let err = writer.write_u32(1).unwrap_err();
        assert!(matches!(
            err,
            CodecError::BufferTooShort {
                requested: 4,
                available: 3,
                ..
            }
        ));
        assert_eq!(writer.position(), 0);
    }

    #[test]
    fn test_write_string() {
        let mut buf = [0xaau8; 10];
        let mut writer = Ros1Writer::new(&mut buf);
        writer.write_string("hello").unwrap();
        assert_eq!(writer.remaining(), 1);
        assert_eq!(buf, [5, 0, 0, 0, 0x68, 0x65, 0x6c, 0x6c, 0x6f, 0xaa]);
    }

    #[test]
    fn test_write_empty_string() {
        let mut buf = [0xffu8; 4];
        let mut writer = Ros1Writer::new(&mut buf);
        writer.write_string("").unwrap();
        assert_eq!(buf, [0, 0, 0, 0]);
    }

    #[test]
    fn test_string_overflow_reports_counts() {
        let mut buf = [0u8; 7];
        let mut writer = Ros1Writer::new(&mut buf);
        let err = writer.write_string("hello").unwrap_err();
        assert_eq!(
            err,
            CodecError::StringOverflow {
                written: 5,
                available: 3,
                position: 4,
            }
        );
    }

    #[test]
    fn test_sink_time_and_duration() {
        let mut buf = [0u8; 16];
        let mut writer = Ros1Writer::new(&mut buf);
        writer.time(1, 2).unwrap();
        writer.duration(-1, -2).unwrap();
        assert_eq!(&buf[..8], &[1, 0, 0, 0, 2, 0, 0, 0]);
        assert_eq!(&buf[8..12], &(-1i32).to_le_bytes());
        assert_eq!(&buf[12..], &(-2i32).to_le_bytes());
    }

    #[test]
    fn test_sink_bool_writes_one_or_zero() {
        let mut buf = [0xffu8; 2];
        let mut writer = Ros1Writer::new(&mut buf);
        writer.bool(true).unwrap();
        writer.bool(false).unwrap();
        assert_eq!(buf, [1, 0]);
    }
}
