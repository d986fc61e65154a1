// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decode limits carried by a compiled codec.

/// Default upper bound on a dynamic array's element count.
pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 10_000_000;

/// Default upper bound on a string's byte length (100 MiB).
pub const DEFAULT_MAX_STRING_LENGTH: usize = 100 * 1024 * 1024;

/// Default nesting limit for recursive sizing, writing and materializing.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits applied while sizing, writing and decoding messages.
///
/// Length prefixes come from untrusted bytes; these bounds turn corrupt
/// prefixes into [`CodecError::LengthExceeded`](crate::CodecError) instead of
/// huge allocations.
///
/// # Example
///
/// ```rust
/// use robomsg::CodecOptions;
///
/// let options = CodecOptions::new()
///     .max_array_length(1024)
///     .max_depth(16);
/// assert_eq!(options.max_array_length, 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Largest dynamic array count accepted from the wire
    pub max_array_length: usize,
    /// Largest string byte length accepted from the wire
    pub max_string_length: usize,
    /// Deepest nesting of complex values
    pub max_depth: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecOptions {
    /// Create options with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the largest accepted dynamic array count.
    pub fn max_array_length(mut self, max: usize) -> Self {
        self.max_array_length = max;
        self
    }

    /// Set the largest accepted string byte length.
    pub fn max_string_length(mut self, max: usize) -> Self {
        self.max_string_length = max;
        self
    }

    /// Set the nesting limit for complex values.
    pub fn max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }
}
