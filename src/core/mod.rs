// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout robomsg.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] - Error handling
//! - [`CodecValue`] - Plain value tree for messages
//! - [`PrimitiveType`] - ROS1 wire primitive types
//! - [`CodecOptions`] - Decode limits applied by compiled codecs

pub mod error;
pub mod options;
pub mod value;

pub use error::{CodecError, Result};
pub use options::CodecOptions;
pub use value::{CodecValue, DecodedMessage, PrimitiveType};
