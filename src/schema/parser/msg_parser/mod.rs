// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MSG format parser using Pest.
//!
//! This module handles parsing of ROS1 message definitions, including the
//! concatenated form found in bag and MCAP connection headers.
//!
//! The format supports:
//! - Simple field lists (root message)
//! - Dependency blocks separated by `===` lines with "MSG: TypeName" headers
//! - Array types: T[] (dynamic) or T[n] (fixed)
//! - Nested types: package/MessageName, short names, `Header`
//! - Constants: `type NAME = value`
//! - Comments (# style)

use pest::Parser;
use pest_derive::Parser;
use tracing::warn;

use crate::core::Result as CoreResult;
use crate::core::{CodecError, CodecValue, PrimitiveType};
use crate::schema::ast::{Field, TypeDefinition};

/// Pest parser for single message definition lines.
#[derive(Parser)]
#[grammar = "schema/parser/msg_parser/msg.pest"] // Path relative to src/ directory
pub struct MsgParser;

const CONTEXT: &str = "msg definition";

/// Options for [`parse_with_options`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Name given to the root definition instead of leaving it unnamed
    pub top_level_type_name: Option<String>,
    /// Keep complex type names exactly as written
    pub skip_type_fixup: bool,
}

impl ParseOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the root definition.
    pub fn top_level_type_name(mut self, name: impl Into<String>) -> Self {
        self.top_level_type_name = Some(name.into());
        self
    }

    /// Skip resolving complex type names to fully qualified names.
    pub fn skip_type_fixup(mut self, skip: bool) -> Self {
        self.skip_type_fixup = skip;
        self
    }
}

/// Parse a ROS1 message definition with default options.
///
/// The first returned definition is the unnamed root type.
pub fn parse(definition: &str) -> CoreResult<Vec<TypeDefinition>> {
    parse_with_options(definition, &ParseOptions::default())
}

/// Parse a ROS1 message definition.
///
/// Structurally identical definitions are kept once, and complex field types
/// are rewritten to fully qualified names unless
/// [`ParseOptions::skip_type_fixup`] is set.
pub fn parse_with_options(
    definition: &str,
    options: &ParseOptions,
) -> CoreResult<Vec<TypeDefinition>> {
    let mut types = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in definition.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with("==") {
            types.push(build_type(&block)?);
            block.clear();
        } else {
            block.push(line);
        }
    }
    // A trailing separator does not open another definition.
    if !block.is_empty() || types.is_empty() {
        types.push(build_type(&block)?);
    }

    if let (Some(name), Some(root)) = (&options.top_level_type_name, types.first_mut()) {
        if root.name.is_none() {
            root.name = Some(name.clone());
        }
    }

    let mut unique: Vec<TypeDefinition> = Vec::with_capacity(types.len());
    for def in types {
        if unique.contains(&def) {
            warn!(
                type_name = def.display_name(),
                "dropping duplicate message definition"
            );
        } else {
            unique.push(def);
        }
    }

    if !options.skip_type_fixup {
        fixup_types(&mut unique)?;
    }

    Ok(unique)
}

/// Rewrite complex field types to the fully qualified name of the
/// definition they refer to.
///
/// Resolution order for a referenced name:
/// - names containing `/` match exactly
/// - `Header` means `std_msgs/Header`
/// - inside a namespaced type, `<namespace>/<name>` matches exactly
/// - otherwise any type whose name is `<name>` or ends in `/<name>`
pub fn fixup_types(types: &mut [TypeDefinition]) -> CoreResult<()> {
    let names: Vec<String> = types.iter().filter_map(|t| t.name.clone()).collect();

    for def in types.iter_mut() {
        let namespace = def.namespace().map(str::to_string);
        for field in def.fields.iter_mut().filter(|f| f.is_complex) {
            field.type_name = find_type_by_name(&names, &field.type_name, namespace.as_deref())?;
        }
    }
    Ok(())
}

fn find_type_by_name(names: &[String], name: &str, namespace: Option<&str>) -> CoreResult<String> {
    let suffix = format!("/{name}");
    let matches: Vec<&String> = names
        .iter()
        .filter(|type_name| {
            if name.contains('/') {
                type_name.as_str() == name
            } else if name == "Header" {
                type_name.as_str() == "std_msgs/Header"
            } else if let Some(ns) = namespace {
                type_name.strip_prefix(ns) == Some(suffix.as_str())
            } else {
                type_name.as_str() == name || type_name.ends_with(&suffix)
            }
        })
        .collect();

    match matches.as_slice() {
        [] => Err(CodecError::type_not_found(name)),
        [single] => Ok((*single).clone()),
        many => Err(CodecError::ambiguous_type(
            name,
            many.iter().map(|s| s.to_string()).collect(),
        )),
    }
}

/// Build one definition from the lines between separators.
fn build_type(lines: &[&str]) -> CoreResult<TypeDefinition> {
    let mut def = TypeDefinition::default();
    for line in lines {
        if line.starts_with("MSG:") {
            def.name = Some(parse_header(line)?);
        } else {
            def.fields.push(parse_line(line)?);
        }
    }
    Ok(def)
}

fn parse_header(line: &str) -> CoreResult<String> {
    let pair = MsgParser::parse(Rule::msg_header, line)
        .map_err(|_| CodecError::parse(CONTEXT, format!("Invalid MSG header: '{line}'")))?
        .next();
    pair.and_then(|p| p.into_inner().find(|i| i.as_rule() == Rule::type_name))
        .map(|p| p.as_str().to_string())
        .ok_or_else(|| CodecError::parse(CONTEXT, format!("Invalid MSG header: '{line}'")))
}

/// Parse a single field or constant line.
fn parse_line(line: &str) -> CoreResult<Field> {
    let not_parsed = || CodecError::parse(CONTEXT, format!("Could not parse line: '{line}'"));

    let pair = MsgParser::parse(Rule::msg_line, line)
        .map_err(|_| not_parsed())?
        .next()
        .ok_or_else(not_parsed)?;

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::field => return build_field(item, line),
            Rule::constant => return build_constant(item, line),
            _ => {}
        }
    }
    Err(not_parsed())
}

fn build_field(pair: pest::iterators::Pair<Rule>, line: &str) -> CoreResult<Field> {
    let mut field = Field::default();
    let mut type_name = "";

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::type_name => type_name = part.as_str(),
            Rule::array_spec => {
                field.is_array = true;
                if let Some(len) = part.into_inner().next() {
                    let len = len.as_str().parse().map_err(|_| {
                        CodecError::parse(CONTEXT, format!("Invalid array length in line '{line}'"))
                    })?;
                    field.array_length = Some(len);
                }
            }
            Rule::field_name => field.name = part.as_str().to_string(),
            _ => {}
        }
    }

    field.type_name = normalize_type(type_name).to_string();
    field.is_complex = PrimitiveType::try_from_str(&field.type_name).is_none();
    Ok(field)
}

fn build_constant(pair: pest::iterators::Pair<Rule>, line: &str) -> CoreResult<Field> {
    let mut type_name = "";
    let mut name = "";
    let mut raw_value = "";

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::type_name => type_name = part.as_str(),
            Rule::constant_name => name = part.as_str(),
            Rule::constant_value => raw_value = part.as_str(),
            _ => {}
        }
    }

    let type_name = normalize_type(type_name);
    let prim = PrimitiveType::try_from_str(type_name).ok_or_else(|| {
        CodecError::parse(
            CONTEXT,
            format!("Constant '{name}' has non-primitive type '{type_name}' in line '{line}'"),
        )
    })?;

    let value_text = if prim == PrimitiveType::String {
        raw_value.trim()
    } else {
        raw_value.split('#').next().unwrap_or_default().trim()
    };
    let value = parse_constant_value(prim, value_text).ok_or_else(|| {
        CodecError::parse(
            CONTEXT,
            format!("Invalid {prim} value '{value_text}' for constant '{name}'"),
        )
    })?;

    Ok(Field::constant(name, type_name, value, value_text))
}

fn parse_constant_value(prim: PrimitiveType, text: &str) -> Option<CodecValue> {
    let value = match prim {
        PrimitiveType::Bool => match text {
            "True" | "true" | "1" => CodecValue::Bool(true),
            "False" | "false" | "0" => CodecValue::Bool(false),
            _ => return None,
        },
        PrimitiveType::Int8 => CodecValue::Int8(text.parse().ok()?),
        PrimitiveType::Int16 => CodecValue::Int16(text.parse().ok()?),
        PrimitiveType::Int32 => CodecValue::Int32(text.parse().ok()?),
        PrimitiveType::Int64 => CodecValue::Int64(text.parse().ok()?),
        PrimitiveType::UInt8 => CodecValue::UInt8(text.parse().ok()?),
        PrimitiveType::UInt16 => CodecValue::UInt16(text.parse().ok()?),
        PrimitiveType::UInt32 => CodecValue::UInt32(text.parse().ok()?),
        PrimitiveType::UInt64 => CodecValue::UInt64(text.parse().ok()?),
        PrimitiveType::Float32 => CodecValue::Float32(text.parse().ok()?),
        PrimitiveType::Float64 => CodecValue::Float64(text.parse().ok()?),
        PrimitiveType::String => CodecValue::String(text.to_string()),
        PrimitiveType::Time | PrimitiveType::Duration | PrimitiveType::Json => return None,
    };
    Some(value)
}

/// Normalize deprecated type aliases.
pub fn normalize_type(type_name: &str) -> &str {
    match type_name {
        "char" => "uint8",
        "byte" => "int8",
        other => other,
    }
}
