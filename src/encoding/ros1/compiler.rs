// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Compile a set of type definitions into a [`CompiledCodec`].
//!
//! Compilation resolves every complex field to an index into the codec's
//! type table, so recursive and mutually recursive types need no special
//! ordering: references are plain indices, looked up when a value is
//! walked. Sizes that never vary are computed once here.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use crate::core::{CodecOptions, PrimitiveType};
use crate::schema::{Field, TypeDefinition};
use crate::{CodecError, Result as CoreResult};

use super::plan::{ArrayKind, CompiledType, ConstantPlan, ElementKind, FieldPlan, TypeIndex};

/// A compiled schema: one layout plan per type plus the root.
///
/// Immutable once built; share it freely across threads (the registry hands
/// out `Arc<CompiledCodec>`).
#[derive(Debug, Clone)]
pub struct CompiledCodec {
    types: Vec<CompiledType>,
    type_lookup: HashMap<String, TypeIndex>,
    root: TypeIndex,
    options: CodecOptions,
}

impl CompiledCodec {
    /// Index of the root type.
    pub const fn root_index(&self) -> TypeIndex {
        self.root
    }

    /// Layout plan of the root type.
    pub fn root_type(&self) -> &CompiledType {
        &self.types[self.root]
    }

    /// Layout plan by index.
    pub fn get_type(&self, index: TypeIndex) -> Option<&CompiledType> {
        self.types.get(index)
    }

    /// Index of a named type.
    pub fn type_index(&self, name: &str) -> Option<TypeIndex> {
        self.type_lookup.get(name).copied()
    }

    /// Resolve an optional type name; `None` selects the root.
    pub fn resolve(&self, type_name: Option<&str>) -> CoreResult<TypeIndex> {
        match type_name {
            None => Ok(self.root),
            Some(name) => self
                .type_index(name)
                .ok_or_else(|| CodecError::type_not_found(name)),
        }
    }

    /// All layout plans, in definition order.
    pub fn types(&self) -> &[CompiledType] {
        &self.types
    }

    /// Names of every named type.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().filter_map(|t| t.name.as_deref())
    }

    /// Limits applied when sizing, writing and decoding.
    pub const fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Indices are only produced by compilation, so they are always valid.
    pub(crate) fn type_at(&self, index: TypeIndex) -> &CompiledType {
        &self.types[index]
    }
}

impl fmt::Display for CompiledCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Codec for '{}' ({} types):",
            self.root_type().display_name(),
            self.types.len()
        )?;
        for ty in &self.types {
            write!(f, "{ty}")?;
        }
        Ok(())
    }
}

/// Compile definitions with default limits.
///
/// # Example
///
/// ```
/// use robomsg::encoding::ros1::compile;
/// use robomsg::schema::parse_message_definition;
/// use robomsg::ParseOptions;
///
/// let defs = parse_message_definition("uint32 a\nstring b", &ParseOptions::default()).unwrap();
/// let codec = compile(&defs).unwrap();
/// assert_eq!(codec.root_type().fields.len(), 2);
/// ```
pub fn compile(definitions: &[TypeDefinition]) -> CoreResult<CompiledCodec> {
    compile_with_options(definitions, CodecOptions::default())
}

/// Compile definitions into a codec carrying `options`.
///
/// The root is the unnamed definition, or the first one when every
/// definition is named.
pub fn compile_with_options(
    definitions: &[TypeDefinition],
    options: CodecOptions,
) -> CoreResult<CompiledCodec> {
    if definitions.is_empty() {
        return Err(CodecError::invalid_schema("<schema>", "no types given"));
    }

    let unnamed: Vec<usize> = definitions
        .iter()
        .enumerate()
        .filter(|(_, d)| d.name.is_none())
        .map(|(i, _)| i)
        .collect();
    if unnamed.len() > 1 {
        return Err(CodecError::invalid_schema("<root>", "multiple unnamed types"));
    }
    let root = unnamed.first().copied().unwrap_or(0);

    let mut type_lookup = HashMap::with_capacity(definitions.len());
    for (idx, def) in definitions.iter().enumerate() {
        if let Some(name) = &def.name {
            if type_lookup.insert(name.clone(), idx).is_some() {
                return Err(CodecError::invalid_schema(
                    name.as_str(),
                    "type is defined more than once",
                ));
            }
        }
    }

    let mut types = definitions
        .iter()
        .map(|def| compile_type(def, &type_lookup))
        .collect::<CoreResult<Vec<_>>>()?;

    let sizes = resolve_fixed_sizes(&types)?;
    let min_sizes = resolve_min_sizes(&types);
    for (ty, size) in types.iter_mut().zip(&sizes) {
        ty.fixed_size = *size;
        ty.finish_layout(&sizes, &min_sizes);
    }

    debug!(
        root = types[root].display_name(),
        types = types.len(),
        fixed_size = ?types[root].fixed_size,
        "compiled ROS1 codec"
    );

    Ok(CompiledCodec {
        types,
        type_lookup,
        root,
        options,
    })
}

fn compile_type(
    def: &TypeDefinition,
    type_lookup: &HashMap<String, TypeIndex>,
) -> CoreResult<CompiledType> {
    let type_name = def.display_name();
    let mut seen = HashSet::with_capacity(def.fields.len());
    let mut fields = Vec::new();
    let mut constants = Vec::new();

    for field in &def.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(CodecError::invalid_schema(
                type_name,
                format!("field '{}' is declared more than once", field.name),
            ));
        }
        if field.is_constant {
            constants.push(compile_constant(type_name, field)?);
        } else {
            fields.push(compile_field(type_name, field, type_lookup)?);
        }
    }

    Ok(CompiledType::new(def.name.clone(), fields, constants))
}

fn compile_field(
    type_name: &str,
    field: &Field,
    type_lookup: &HashMap<String, TypeIndex>,
) -> CoreResult<FieldPlan> {
    let element = if field.is_complex {
        let idx = type_lookup
            .get(&field.type_name)
            .ok_or_else(|| CodecError::type_not_found(field.type_name.as_str()))?;
        ElementKind::Complex(*idx)
    } else {
        let prim = PrimitiveType::try_from_str(&field.type_name).ok_or_else(|| {
            CodecError::invalid_schema(
                type_name,
                format!(
                    "field '{}' has unknown primitive type '{}'",
                    field.name, field.type_name
                ),
            )
        })?;
        ElementKind::Primitive(prim)
    };

    let array = match (field.is_array, field.array_length) {
        (false, _) => ArrayKind::Single,
        (true, Some(n)) => ArrayKind::Fixed(n),
        (true, None) => ArrayKind::Dynamic,
    };

    Ok(FieldPlan {
        name: field.name.clone(),
        type_name: field.type_name.clone(),
        element,
        array,
        element_size: None,
        min_element_size: 0,
        fixed_size: None,
    })
}

fn compile_constant(type_name: &str, field: &Field) -> CoreResult<ConstantPlan> {
    let primitive = PrimitiveType::try_from_str(&field.type_name).ok_or_else(|| {
        CodecError::invalid_schema(
            type_name,
            format!(
                "constant '{}' has non-primitive type '{}'",
                field.name, field.type_name
            ),
        )
    })?;
    let value = field.value.clone().ok_or_else(|| {
        CodecError::invalid_schema(
            type_name,
            format!("constant '{}' has no value", field.name),
        )
    })?;
    let value_text = field
        .value_text
        .clone()
        .unwrap_or_else(|| value.to_string());
    Ok(ConstantPlan {
        name: field.name.clone(),
        primitive,
        value,
        value_text,
    })
}

#[derive(Debug, Clone, Copy)]
enum Mark {
    Unvisited,
    Visiting,
    Done(Option<usize>),
}

/// Compute the fixed size of every type, rejecting types that contain
/// themselves by value.
///
/// Only `T` and `T[N]` (N > 0) fields embed another type; a `T[]` field
/// can be empty, so recursion through it is finite and makes the type
/// variable-size.
fn resolve_fixed_sizes(types: &[CompiledType]) -> CoreResult<Vec<Option<usize>>> {
    let mut marks = vec![Mark::Unvisited; types.len()];
    for idx in 0..types.len() {
        visit(types, idx, &mut marks)?;
    }
    Ok(marks
        .into_iter()
        .map(|mark| match mark {
            Mark::Done(size) => size,
            _ => None,
        })
        .collect())
}

fn visit(types: &[CompiledType], idx: TypeIndex, marks: &mut [Mark]) -> CoreResult<Option<usize>> {
    match marks[idx] {
        Mark::Done(size) => return Ok(size),
        Mark::Visiting => {
            return Err(CodecError::invalid_schema(
                types[idx].display_name(),
                "type contains itself without an intervening dynamic array",
            ))
        }
        Mark::Unvisited => {}
    }
    marks[idx] = Mark::Visiting;

    // Every embedded field is visited even once the total is known to be
    // variable, so cycles further down are still reported.
    let mut total = Some(0usize);
    for field in &types[idx].fields {
        let size = match field.array {
            ArrayKind::Dynamic => None,
            ArrayKind::Fixed(0) => Some(0),
            ArrayKind::Single | ArrayKind::Fixed(_) => {
                let count = match field.array {
                    ArrayKind::Fixed(n) => n,
                    _ => 1,
                };
                let element = match field.element {
                    ElementKind::Primitive(prim) => prim.fixed_size(),
                    ElementKind::Complex(inner) => visit(types, inner, marks)?,
                };
                element.and_then(|size| size.checked_mul(count))
            }
        };
        total = match (total, size) {
            (Some(t), Some(s)) => t.checked_add(s),
            _ => None,
        };
    }

    marks[idx] = Mark::Done(total);
    Ok(total)
}

/// Fewest bytes an instance of every type can take on the wire.
///
/// A dynamic array counts only its length prefix. Must run after
/// [`resolve_fixed_sizes`], which guarantees the by-value containment
/// graph followed here has no cycles.
fn resolve_min_sizes(types: &[CompiledType]) -> Vec<usize> {
    let mut memo = vec![None; types.len()];
    for idx in 0..types.len() {
        min_size(types, idx, &mut memo);
    }
    memo.into_iter().map(Option::unwrap_or_default).collect()
}

fn min_size(types: &[CompiledType], idx: TypeIndex, memo: &mut [Option<usize>]) -> usize {
    if let Some(size) = memo[idx] {
        return size;
    }
    let mut total = 0usize;
    for field in &types[idx].fields {
        let size = match field.array {
            ArrayKind::Dynamic => 4,
            ArrayKind::Fixed(0) => 0,
            ArrayKind::Single | ArrayKind::Fixed(_) => {
                let count = match field.array {
                    ArrayKind::Fixed(n) => n,
                    _ => 1,
                };
                let element = match field.element {
                    ElementKind::Primitive(prim) => prim.min_size(),
                    ElementKind::Complex(inner) => min_size(types, inner, memo),
                };
                element.saturating_mul(count)
            }
        };
        total = total.saturating_add(size);
    }
    memo[idx] = Some(total);
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_message_definition;
    use crate::ParseOptions;

    fn compile_text(text: &str) -> CoreResult<CompiledCodec> {
        let defs = parse_message_definition(text, &ParseOptions::default())?;
        compile(&defs)
    }

    #[test]
    fn test_no_types_is_error() {
        let err = compile(&[]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid schema '<schema>': no types given");
    }

    #[test]
    fn test_multiple_unnamed_types_is_error() {
        let defs = vec![
            TypeDefinition::root(vec![Field::new("a", "int8")]),
            TypeDefinition::root(vec![Field::new("b", "int8")]),
        ];
        let err = compile(&defs).unwrap_err();
        assert!(err.to_string().contains("multiple unnamed types"));
    }

    #[test]
    fn test_first_named_type_is_root_without_unnamed() {
        let defs = vec![
            TypeDefinition::named("pkg/A", vec![Field::new("a", "int8")]),
            TypeDefinition::named("pkg/B", vec![Field::new("b", "int16")]),
        ];
        let codec = compile(&defs).unwrap();
        assert_eq!(codec.root_index(), 0);
        assert_eq!(codec.root_type().display_name(), "pkg/A");
        assert_eq!(codec.resolve(Some("pkg/B")).unwrap(), 1);
        assert!(matches!(
            codec.resolve(Some("pkg/C")),
            Err(CodecError::TypeNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_type_names_are_error() {
        let defs = vec![
            TypeDefinition::named("pkg/A", vec![Field::new("a", "int8")]),
            TypeDefinition::named("pkg/A", vec![Field::new("a", "int16")]),
        ];
        let err = compile(&defs).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_duplicate_field_names_are_error() {
        let defs = vec![TypeDefinition::root(vec![
            Field::new("a", "int8"),
            Field::new("a", "int16"),
        ])];
        assert!(matches!(
            compile(&defs),
            Err(CodecError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_unknown_complex_type_is_error() {
        let defs = vec![TypeDefinition::root(vec![Field::new("p", "pkg/Missing")])];
        assert_eq!(
            compile(&defs).unwrap_err(),
            CodecError::type_not_found("pkg/Missing")
        );
    }

    #[test]
    fn test_fixed_sizes() {
        let codec = compile_text(
            "pkg/Inner inner\nuint8[3] tail\n====\nMSG: pkg/Inner\nint32 a\ntime t",
        )
        .unwrap();
        assert_eq!(codec.root_type().fixed_size, Some(12 + 3));
        let inner = codec.type_index("pkg/Inner").unwrap();
        assert_eq!(codec.types()[inner].fixed_size, Some(12));
    }

    #[test]
    fn test_dynamic_fields_are_variable() {
        let codec = compile_text("int32 a\nstring b\nint32 c").unwrap();
        let root = codec.root_type();
        assert_eq!(root.fixed_size, None);
        assert_eq!(root.static_offset(1), Some(4));
        assert_eq!(root.static_offset(2), None);
    }

    #[test]
    fn test_minimum_element_sizes() {
        let codec = compile_text(
            "pkg/Item[] items\nstring[] names\njson[] blobs\n====\n\
             MSG: pkg/Item\nstring key\nfloat32[2] pair\nuint8[] data\npkg/Item[0] none",
        )
        .unwrap();
        let fields = &codec.root_type().fields;
        // key 4 + pair 8 + data prefix 4 + empty fixed array 0
        assert_eq!(fields[0].min_element_size, 16);
        assert_eq!(fields[1].min_element_size, 4);
        assert_eq!(fields[2].min_element_size, 4);

        let tree = compile_text("MSG: pkg/Tree\nint32 value\npkg/Tree[] children").unwrap();
        assert_eq!(tree.root_type().fields[1].min_element_size, 8);
    }

    #[test]
    fn test_recursion_through_dynamic_array_compiles() {
        let codec = compile_text(
            "MSG: pkg/Tree\nint32 value\npkg/Tree[] children",
        )
        .unwrap();
        assert_eq!(codec.root_type().display_name(), "pkg/Tree");
        assert_eq!(codec.root_type().fixed_size, None);
        assert_eq!(
            codec.root_type().fields[1].element,
            ElementKind::Complex(0)
        );
    }

    #[test]
    fn test_mutual_recursion_compiles() {
        let codec = compile_text(
            "pkg/A a\n====\nMSG: pkg/A\npkg/B[] bs\n====\nMSG: pkg/B\nint8 x\npkg/A[] as_",
        )
        .unwrap();
        assert_eq!(codec.types().len(), 3);
    }

    #[test]
    fn test_self_containment_is_error() {
        let defs = vec![TypeDefinition::named(
            "pkg/Loop",
            vec![Field::new("next", "pkg/Loop")],
        )];
        let err = compile(&defs).unwrap_err();
        assert!(err.to_string().contains("contains itself"));

        let defs = vec![
            TypeDefinition::named("pkg/A", vec![Field::fixed_array("b", "pkg/B", 2)]),
            TypeDefinition::named("pkg/B", vec![Field::new("a", "pkg/A")]),
        ];
        assert!(compile(&defs).is_err());
    }

    #[test]
    fn test_zero_length_fixed_array_breaks_cycle() {
        let defs = vec![TypeDefinition::named(
            "pkg/Loop",
            vec![Field::new("x", "int8"), Field::fixed_array("none", "pkg/Loop", 0)],
        )];
        let codec = compile(&defs).unwrap();
        assert_eq!(codec.root_type().fixed_size, Some(1));
    }

    #[test]
    fn test_constants_are_compiled_separately() {
        let codec = compile_text("uint8 ON=1\nuint8 state\nstring NAME= hi # there").unwrap();
        let root = codec.root_type();
        assert_eq!(root.fields.len(), 1);
        assert_eq!(root.constants.len(), 2);
        assert_eq!(root.fixed_size, Some(1));
        assert_eq!(
            root.constant("NAME").map(|c| c.value_text.as_str()),
            Some("hi # there")
        );
    }

    #[test]
    fn test_display_lists_types() {
        let codec = compile_text("pkg/Inner inner\n====\nMSG: pkg/Inner\nint32 a").unwrap();
        let text = codec.to_string();
        assert!(text.starts_with("Codec for '<root>' (2 types):"));
        assert!(text.contains("Layout for 'pkg/Inner' (fixed, 4 bytes):"));
    }
}
