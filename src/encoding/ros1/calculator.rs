// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS1 size calculator.
//!
//! Counts the bytes a value would occupy without touching a buffer. The
//! calculator receives exactly the same calls as [`Ros1Writer`] during the
//! encode walk, so the size it reports is the number of bytes the writer
//! will produce.
//!
//! [`Ros1Writer`]: super::writer::Ros1Writer

use super::encoder::{string_length_prefix, WireSink};
use crate::Result as CoreResult;

/// ROS1 size calculator.
///
/// ROS1 has no header and no alignment, so the size is a plain running sum.
///
/// # Example
///
/// ```
/// use robomsg::encoding::ros1::calculator::SizeCalculator;
///
/// let mut calc = SizeCalculator::new();
/// calc.int32();    // 4 bytes
/// calc.string(5);  // 4 (length) + 5 = 9 bytes
/// assert_eq!(calc.size(), 13);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SizeCalculator {
    offset: usize,
}

impl SizeCalculator {
    /// Create a new calculator at size zero.
    #[must_use]
    pub fn new() -> Self {
        Self { offset: 0 }
    }

    /// Get the current calculated size.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.offset
    }

    /// Calculate size for a bool or any 8-bit integer.
    pub fn int8(&mut self) -> usize {
        self.increment_and_return(1)
    }

    /// Calculate size for a 16-bit integer.
    pub fn int16(&mut self) -> usize {
        self.increment_and_return(2)
    }

    /// Calculate size for a 32-bit integer or float.
    pub fn int32(&mut self) -> usize {
        self.increment_and_return(4)
    }

    /// Calculate size for a 64-bit integer or float.
    pub fn int64(&mut self) -> usize {
        self.increment_and_return(8)
    }

    /// Calculate size for `time` or `duration`.
    pub fn time(&mut self) -> usize {
        self.increment_and_return(8)
    }

    /// Calculate size for a string of `length` UTF-8 bytes.
    pub fn string(&mut self, length: usize) -> usize {
        self.int32();
        self.increment_and_return(length)
    }

    /// Calculate size for a dynamic array count prefix.
    pub fn array_length(&mut self) -> usize {
        self.int32()
    }

    /// Calculate size for a run of raw bytes.
    pub fn bytes(&mut self, count: usize) -> usize {
        self.increment_and_return(count)
    }

    /// Reset the calculator to zero.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Increment the offset by `byte_count`, then return the new offset.
    fn increment_and_return(&mut self, byte_count: usize) -> usize {
        self.offset += byte_count;
        self.offset
    }
}

impl WireSink for SizeCalculator {
    fn bool(&mut self, _value: bool) -> CoreResult<()> {
        self.int8();
        Ok(())
    }

    fn int8(&mut self, _value: i8) -> CoreResult<()> {
        SizeCalculator::int8(self);
        Ok(())
    }

    fn uint8(&mut self, _value: u8) -> CoreResult<()> {
        SizeCalculator::int8(self);
        Ok(())
    }

    fn int16(&mut self, _value: i16) -> CoreResult<()> {
        SizeCalculator::int16(self);
        Ok(())
    }

    fn uint16(&mut self, _value: u16) -> CoreResult<()> {
        SizeCalculator::int16(self);
        Ok(())
    }

    fn int32(&mut self, _value: i32) -> CoreResult<()> {
        SizeCalculator::int32(self);
        Ok(())
    }

    fn uint32(&mut self, _value: u32) -> CoreResult<()> {
        SizeCalculator::int32(self);
        Ok(())
    }

    fn int64(&mut self, _value: i64) -> CoreResult<()> {
        SizeCalculator::int64(self);
        Ok(())
    }

    fn uint64(&mut self, _value: u64) -> CoreResult<()> {
        SizeCalculator::int64(self);
        Ok(())
    }

    fn float32(&mut self, _value: f32) -> CoreResult<()> {
        SizeCalculator::int32(self);
        Ok(())
    }

    fn float64(&mut self, _value: f64) -> CoreResult<()> {
        SizeCalculator::int64(self);
        Ok(())
    }

    fn string(&mut self, value: &str) -> CoreResult<()> {
        string_length_prefix(value.len())?;
        SizeCalculator::string(self, value.len());
        Ok(())
    }

    fn bytes(&mut self, value: &[u8]) -> CoreResult<()> {
        SizeCalculator::bytes(self, value.len());
        Ok(())
    }

    fn time(&mut self, _sec: u32, _nsec: u32) -> CoreResult<()> {
        SizeCalculator::time(self);
        Ok(())
    }

    fn duration(&mut self, _sec: i32, _nsec: i32) -> CoreResult<()> {
        SizeCalculator::time(self);
        Ok(())
    }
}
