// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema parser implementations.

pub mod msg_parser;

pub use msg_parser::{fixup_types, normalize_type, ParseOptions};

use crate::core::Result;
use crate::schema::TypeDefinition;

/// Parse ROS1 message definition text into type definitions.
///
/// # Arguments
///
/// * `definition` - Definition text, optionally with `MSG:` dependency blocks
/// * `options` - Root naming and name fix-up options
///
/// # Returns
///
/// The definitions in file order; the root comes first.
pub fn parse_message_definition(
    definition: &str,
    options: &ParseOptions,
) -> Result<Vec<TypeDefinition>> {
    msg_parser::parse_with_options(definition, options)
}
