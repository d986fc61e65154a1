// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Robomsg
//!
//! ROS1 message serialization driven by message definition text.
//!
//! A definition such as `std_msgs/String` or a full `gendeps` dump is parsed
//! into [`TypeDefinition`]s, compiled once into a [`CompiledCodec`], and
//! then used to:
//! - compute the encoded size of a value
//! - write a value into a caller-provided byte range
//! - decode lazily through a [`LazyView`] that reads a field only when
//!   asked for it
//!
//! ## Architecture
//!
//! - `core/` - errors, the [`CodecValue`] tree, decode limits
//! - `schema/` - definition model and the pest-based parser
//! - `encoding/ros1/` - compiler, size calculator, writer, lazy views
//! - `encoding/json` - JSON conversion for values
//! - `encoding/registry` - shared cache of compiled codecs
//!
//! ## Example
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use robomsg::{CodecValue, Ros1Codec};
//!
//! let codec = Ros1Codec::from_definition(
//!     "Header header\nfloat64[] ranges\n\
//!      ================\n\
//!      MSG: std_msgs/Header\nuint32 seq\ntime stamp\nstring frame_id",
//! )?;
//!
//! let header = CodecValue::from_fields([
//!     ("seq", CodecValue::UInt32(1)),
//!     ("stamp", CodecValue::Time { sec: 10, nsec: 0 }),
//!     ("frame_id", CodecValue::String("laser".into())),
//! ]);
//! let scan = CodecValue::from_fields([
//!     ("header", header),
//!     ("ranges", CodecValue::Array(vec![CodecValue::Float64(1.5)])),
//! ]);
//!
//! let bytes = codec.write_message(&scan)?;
//! let view = codec.decode_message(&bytes);
//! let ranges = view.get("ranges")?.as_primitives().unwrap();
//! assert_eq!(ranges.get(0), Some(CodecValue::Float64(1.5)));
//! assert_eq!(view.materialize()?, scan);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{CodecError, CodecOptions, CodecValue, DecodedMessage, PrimitiveType, Result};

// Encoding/decoding
pub mod encoding;

pub use encoding::ros1::{
    compile, compile_with_options, CompiledCodec, LazyArray, LazyValue, LazyView, PrimitiveArray,
    Ros1Codec,
};
pub use encoding::{global_registry, CodecRegistry};

// Schema parsing
pub mod schema;

pub use schema::{parse_message_definition, Field, ParseOptions, TypeDefinition};
