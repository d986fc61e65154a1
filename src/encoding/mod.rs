// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message encoding/decoding implementations.
//!
//! - [`ros1`] - ROS1 wire format: compiler, writer, lazy views
//! - [`json`] - conversion between value trees and JSON
//! - [`registry`] - cache of compiled codecs keyed by type name

pub mod json;
pub mod registry;
pub mod ros1;

pub use json::{codec_value_to_json, json_to_codec_value, parse_json};
pub use registry::{global_registry, CodecRegistry};
pub use ros1::{compile, compile_with_options, CompiledCodec, LazyValue, LazyView, Ros1Codec};
