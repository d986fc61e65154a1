// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Compiled per-type layout plans.
//!
//! A [`CompiledType`] is what the compiler produces for one message type:
//! wire fields with resolved element kinds, constants, and the fixed sizes
//! and offsets that let the writer, the scanner and the lazy view skip
//! arithmetic-known regions without reading them.

use std::collections::HashMap;
use std::fmt;

use crate::core::{CodecValue, PrimitiveType};

/// Index of a type inside its [`CompiledCodec`](super::CompiledCodec).
pub type TypeIndex = usize;

/// What a single element of a field is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A wire primitive
    Primitive(PrimitiveType),
    /// Another compiled type
    Complex(TypeIndex),
}

/// How many elements a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    /// Exactly one element, no prefix
    Single,
    /// `T[N]`: N elements, no prefix
    Fixed(usize),
    /// `T[]`: u32 count prefix, then the elements
    Dynamic,
}

impl ArrayKind {
    /// Whether the field is an array of either kind.
    pub const fn is_array(self) -> bool {
        !matches!(self, ArrayKind::Single)
    }
}

/// One wire field of a compiled type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPlan {
    /// Field name
    pub name: String,
    /// Element type as written in the schema
    pub type_name: String,
    /// Resolved element kind
    pub element: ElementKind,
    /// Array shape
    pub array: ArrayKind,
    /// Byte size of one element, when every instance has the same size
    pub element_size: Option<usize>,
    /// Fewest bytes any one element can occupy
    pub min_element_size: usize,
    /// Byte size of the whole field, when it never varies
    pub fixed_size: Option<usize>,
}

impl FieldPlan {
    /// Element primitive, if the element is not complex.
    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self.element {
            ElementKind::Primitive(prim) => Some(prim),
            ElementKind::Complex(_) => None,
        }
    }

    /// Whether this is a `uint8` array, carried as packed bytes.
    pub fn is_byte_array(&self) -> bool {
        self.array.is_array() && self.element == ElementKind::Primitive(PrimitiveType::UInt8)
    }

    /// Schema spelling of the field type, array suffix included.
    pub fn declared_type(&self) -> String {
        match self.array {
            ArrayKind::Single => self.type_name.clone(),
            ArrayKind::Fixed(n) => format!("{}[{n}]", self.type_name),
            ArrayKind::Dynamic => format!("{}[]", self.type_name),
        }
    }
}

/// A constant of a compiled type. Constants occupy no wire bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPlan {
    /// Constant name
    pub name: String,
    /// Primitive type of the constant
    pub primitive: PrimitiveType,
    /// Parsed value
    pub value: CodecValue,
    /// Value as written in the schema
    pub value_text: String,
}

/// Layout plan of one message type.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledType {
    /// Type name, `None` for an unnamed root
    pub name: Option<String>,
    /// Wire fields in declaration order
    pub fields: Vec<FieldPlan>,
    /// Constants in declaration order
    pub constants: Vec<ConstantPlan>,
    /// Encoded size when every instance has the same size
    pub fixed_size: Option<usize>,
    /// Offset of each field from the message start while all earlier
    /// fields are fixed-size; one extra slot for the end
    pub(crate) fixed_offsets: Vec<Option<usize>>,
    field_lookup: HashMap<String, usize>,
    constant_lookup: HashMap<String, usize>,
}

impl CompiledType {
    pub(crate) fn new(
        name: Option<String>,
        fields: Vec<FieldPlan>,
        constants: Vec<ConstantPlan>,
    ) -> Self {
        let field_lookup = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        let constant_lookup = constants
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Self {
            name,
            fields,
            constants,
            fixed_size: None,
            fixed_offsets: Vec::new(),
            field_lookup,
            constant_lookup,
        }
    }

    /// Name used in diagnostics.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<root>")
    }

    /// Index of a wire field by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.field_lookup.get(name).copied()
    }

    /// Wire field by name.
    pub fn field(&self, name: &str) -> Option<&FieldPlan> {
        self.field_index(name).map(|i| &self.fields[i])
    }

    /// Constant by name.
    pub fn constant(&self, name: &str) -> Option<&ConstantPlan> {
        self.constant_lookup.get(name).map(|&i| &self.constants[i])
    }

    pub(crate) fn constant_index(&self, name: &str) -> Option<usize> {
        self.constant_lookup.get(name).copied()
    }

    /// Offset of field `index` when it does not depend on the data.
    pub fn static_offset(&self, index: usize) -> Option<usize> {
        self.fixed_offsets.get(index).copied().flatten()
    }

    /// Fill in per-field sizes from the resolved fixed and minimum type
    /// sizes and derive the static offset prefix.
    pub(crate) fn finish_layout(&mut self, type_sizes: &[Option<usize>], min_sizes: &[usize]) {
        for field in &mut self.fields {
            field.element_size = match field.element {
                ElementKind::Primitive(prim) => prim.fixed_size(),
                ElementKind::Complex(idx) => type_sizes[idx],
            };
            field.min_element_size = match field.element {
                ElementKind::Primitive(prim) => prim.min_size(),
                ElementKind::Complex(idx) => min_sizes[idx],
            };
            field.fixed_size = match field.array {
                ArrayKind::Single => field.element_size,
                ArrayKind::Fixed(0) => Some(0),
                ArrayKind::Fixed(n) => field.element_size.and_then(|s| s.checked_mul(n)),
                ArrayKind::Dynamic => None,
            };
        }

        let mut offsets = Vec::with_capacity(self.fields.len() + 1);
        let mut next = Some(0usize);
        offsets.push(next);
        for field in &self.fields {
            next = match (next, field.fixed_size) {
                (Some(at), Some(size)) => at.checked_add(size),
                _ => None,
            };
            offsets.push(next);
        }
        self.fixed_offsets = offsets;
    }
}

impl fmt::Display for CompiledType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layout for '{}'", self.display_name())?;
        match self.fixed_size {
            Some(size) => writeln!(f, " (fixed, {size} bytes):")?,
            None => writeln!(f, " (variable):")?,
        }
        for (idx, field) in self.fields.iter().enumerate() {
            let offset = match self.static_offset(idx) {
                Some(off) => format!("@{off}"),
                None => "@?".to_string(),
            };
            let size = match field.fixed_size {
                Some(size) => format!("{size}B"),
                None => "var".to_string(),
            };
            writeln!(
                f,
                "  {idx:3}: {:<6} {:<5} {} {}",
                offset,
                size,
                field.declared_type(),
                field.name
            )?;
        }
        for constant in &self.constants {
            writeln!(
                f,
                "  const: {} {}={}",
                constant.primitive, constant.name, constant.value_text
            )?;
        }
        Ok(())
    }
}
