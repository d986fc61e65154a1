// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema model for parsed ROS1 message definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{CodecValue, PrimitiveType};

/// One message type: an ordered list of fields.
///
/// At most one definition in a schema set is unnamed; that one is the root
/// message type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Fully qualified name (e.g. `std_msgs/Header`), `None` for the root
    pub name: Option<String>,
    /// Fields and constants in declaration order
    pub fields: Vec<Field>,
}

impl TypeDefinition {
    /// Create an unnamed (root) definition.
    pub fn root(fields: Vec<Field>) -> Self {
        Self { name: None, fields }
    }

    /// Create a named definition.
    pub fn named(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: Some(name.into()),
            fields,
        }
    }

    /// Name used in diagnostics.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<root>")
    }

    /// Package part of the name (`std_msgs` for `std_msgs/Header`).
    pub fn namespace(&self) -> Option<&str> {
        self.name
            .as_deref()
            .and_then(|name| name.rsplit_once('/'))
            .map(|(ns, _)| ns)
    }

    /// Look up a field or constant by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that occupy bytes on the wire.
    pub fn wire_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_constant)
    }

    /// Constant declarations.
    pub fn constants(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_constant)
    }
}

impl fmt::Display for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            writeln!(f, "MSG: {name}")?;
        }
        for field in &self.fields {
            writeln!(f, "{field}")?;
        }
        Ok(())
    }
}

/// A field or constant declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Wire type: a primitive spelling or a complex type name
    pub type_name: String,
    /// Whether the field is an array
    pub is_array: bool,
    /// Element count of a fixed-length array
    pub array_length: Option<usize>,
    /// Whether `type_name` refers to another definition
    pub is_complex: bool,
    /// Constants carry a value in the schema and nothing on the wire
    pub is_constant: bool,
    /// Parsed constant value
    pub value: Option<CodecValue>,
    /// Constant value as written in the definition
    pub value_text: Option<String>,
}

impl Field {
    /// A scalar field of the given type.
    ///
    /// Whether the type is complex is derived from the spelling.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let is_complex = PrimitiveType::try_from_str(&type_name).is_none();
        Self {
            name: name.into(),
            type_name,
            is_complex,
            ..Self::default()
        }
    }

    /// A dynamic-length array field.
    pub fn dynamic_array(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            is_array: true,
            ..Self::new(name, type_name)
        }
    }

    /// A fixed-length array field.
    pub fn fixed_array(name: impl Into<String>, type_name: impl Into<String>, len: usize) -> Self {
        Self {
            is_array: true,
            array_length: Some(len),
            ..Self::new(name, type_name)
        }
    }

    /// A constant declaration.
    pub fn constant(
        name: impl Into<String>,
        type_name: impl Into<String>,
        value: CodecValue,
        value_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_constant: true,
            value: Some(value),
            value_text: Some(value_text.into()),
            ..Self::default()
        }
    }

    /// Primitive wire type, if this field is not complex.
    pub fn primitive(&self) -> Option<PrimitiveType> {
        if self.is_complex {
            None
        } else {
            PrimitiveType::try_from_str(&self.type_name)
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)?;
        if self.is_array {
            match self.array_length {
                Some(len) => write!(f, "[{len}]")?,
                None => write!(f, "[]")?,
            }
        }
        write!(f, " {}", self.name)?;
        if self.is_constant {
            write!(f, "={}", self.value_text.as_deref().unwrap_or_default())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_constructors() {
        let f = Field::new("x", "float64");
        assert!(!f.is_complex);
        assert!(!f.is_array);
        assert_eq!(f.primitive(), Some(PrimitiveType::Float64));

        let f = Field::dynamic_array("points", "geometry_msgs/Point");
        assert!(f.is_complex);
        assert!(f.is_array);
        assert_eq!(f.array_length, None);
        assert_eq!(f.primitive(), None);

        let f = Field::fixed_array("covariance", "float64", 36);
        assert_eq!(f.array_length, Some(36));
    }

    #[test]
    fn test_namespace() {
        let def = TypeDefinition::named("geometry_msgs/Point", vec![]);
        assert_eq!(def.namespace(), Some("geometry_msgs"));
        assert_eq!(TypeDefinition::root(vec![]).namespace(), None);
        assert_eq!(TypeDefinition::named("Point", vec![]).namespace(), None);
    }

    #[test]
    fn test_wire_fields_skip_constants() {
        let def = TypeDefinition::root(vec![
            Field::constant("ON", "uint8", CodecValue::UInt8(1), "1"),
            Field::new("state", "uint8"),
        ]);
        let names: Vec<_> = def.wire_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["state"]);
        assert_eq!(def.constants().count(), 1);
        assert!(def.field("ON").is_some());
    }

    #[test]
    fn test_display() {
        let def = TypeDefinition::named(
            "pkg/Msg",
            vec![
                Field::fixed_array("data", "uint8", 4),
                Field::constant("MAX", "int32", CodecValue::Int32(3), "3"),
            ],
        );
        assert_eq!(def.to_string(), "MSG: pkg/Msg\nuint8[4] data\nint32 MAX=3\n");
    }
}
