// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema model and ROS1 message definition parsing.
//!
//! The codec compiler consumes a list of [`TypeDefinition`]s whose complex
//! field types are already fully qualified, which is what
//! [`parse_message_definition`] produces.

pub mod ast;
pub mod parser;

pub use ast::{Field, TypeDefinition};
pub use parser::{fixup_types, parse_message_definition, ParseOptions};
