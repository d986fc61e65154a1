// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS1 message serialization.
//!
//! The wire format is little-endian with no header and no padding:
//! - `bool` and 8-bit integers take one byte
//! - `string` is a u32 byte length followed by UTF-8 bytes
//! - `time` and `duration` are two 32-bit halves (seconds, nanoseconds)
//! - `T[]` is a u32 element count followed by the elements; `T[N]` has no count
//! - constants occupy nothing
//!
//! Definitions are compiled once into a [`CompiledCodec`]; values are sized
//! and written through the same encode walk and read back through a
//! [`LazyView`].

pub mod calculator;
pub mod codec;
pub mod compiler;
pub mod cursor;
pub mod encoder;
pub mod lazy;
pub mod plan;
mod scan;
pub mod writer;

pub use codec::Ros1Codec;
pub use compiler::{compile, compile_with_options, CompiledCodec};
pub use lazy::{LazyArray, LazyValue, LazyView, PrimitiveArray};
pub use plan::{ArrayKind, CompiledType, ConstantPlan, ElementKind, FieldPlan, TypeIndex};
