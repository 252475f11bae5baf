//! Type annotations for structs and functions.
//!
//! Struct annotations are keyed by struct type, function annotations by function symbol. Every
//! optional property of a field is an `Option` (or `false`), which is exactly the set of tags
//! the persisted field annotation may carry.

use std::collections::BTreeMap;

use crate::{
    ir::{StructTypeId, SymbolId},
    model::constants::{ComponentType, InterpolationMode, MatrixOrientation, ParameterQualifier},
};

/// Shape of a matrix field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct MatrixAnnotation {
    /// Number of rows
    pub rows: u32,
    /// Number of columns
    pub cols: u32,
    /// Storage order
    pub orientation: MatrixOrientation,
}

/// Annotation of one struct field, parameter or return value.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct FieldAnnotation {
    /// Source field name
    pub field_name: Option<String>,
    /// Marked `precise`
    pub precise: bool,
    /// Matrix shape, for matrix fields
    pub matrix: Option<MatrixAnnotation>,
    /// Byte offset inside a constant buffer
    pub cbuffer_offset: Option<u32>,
    /// Semantic string
    pub semantic: Option<String>,
    /// Interpolation mode
    pub interpolation: Option<InterpolationMode>,
    /// Component type
    pub component_type: Option<ComponentType>,
}

impl FieldAnnotation {
    /// Annotation carrying only a field name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        FieldAnnotation {
            field_name: Some(name.to_string()),
            ..Self::default()
        }
    }
}

/// Annotation of a struct type.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct StructAnnotation {
    /// Size of the struct inside a constant buffer, in bytes
    pub cbuffer_size: u32,
    /// One annotation per struct element
    pub fields: Vec<FieldAnnotation>,
    empty: bool,
}

impl StructAnnotation {
    /// Creates an annotation with `field_count` default field annotations.
    #[must_use]
    pub fn new(field_count: usize) -> Self {
        StructAnnotation {
            cbuffer_size: 0,
            fields: vec![FieldAnnotation::default(); field_count],
            empty: false,
        }
    }

    /// Marks the struct as an empty struct. Empty structs carry no field annotations.
    pub fn mark_empty(&mut self) {
        self.empty = true;
        self.fields.clear();
    }

    /// Returns `true` if the struct was marked empty.
    #[must_use]
    pub fn is_empty_struct(&self) -> bool {
        self.empty
    }
}

/// Annotation of a parameter or return value.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ParameterAnnotation {
    /// Input/output qualifier
    pub qualifier: ParameterQualifier,
    /// Field-like properties of the parameter
    pub field: FieldAnnotation,
    /// Semantic indices; order is significant
    pub semantic_indices: Vec<u32>,
}

/// Annotation of a function.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct FunctionAnnotation {
    /// Return value annotation
    pub return_annotation: ParameterAnnotation,
    /// One annotation per parameter
    pub parameters: Vec<ParameterAnnotation>,
}

impl FunctionAnnotation {
    /// Creates an annotation with `param_count` default parameter annotations.
    #[must_use]
    pub fn new(param_count: usize) -> Self {
        FunctionAnnotation {
            return_annotation: ParameterAnnotation::default(),
            parameters: vec![ParameterAnnotation::default(); param_count],
        }
    }
}

/// All type annotations of a module.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct TypeSystem {
    /// Struct annotations by struct type
    pub structs: BTreeMap<StructTypeId, StructAnnotation>,
    /// Function annotations by function symbol
    pub functions: BTreeMap<SymbolId, FunctionAnnotation>,
}

impl TypeSystem {
    /// Returns `true` if there are no annotations at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.structs.is_empty() && self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_empty_clears_fields() {
        let mut annotation = StructAnnotation::new(1);
        assert!(!annotation.is_empty_struct());
        annotation.mark_empty();
        assert!(annotation.is_empty_struct());
        assert!(annotation.fields.is_empty());
    }
}
