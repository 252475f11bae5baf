//! Type annotations: struct, function, parameter and field annotations.
//!
//! The type annotations entry holds at most two tuples, each a tag followed by
//! `(key, annotation)` pairs:
//!
//! ```text
//! [0, undef(struct type), struct annotation, ...]   struct annotations
//! [1, function,           function annotation, ...] function annotations
//! ```
//!
//! A struct annotation is `[cbuffer size, field annotation*]`, a function annotation is
//! `[return annotation, parameter annotation*]`. Field annotations are tag-value lists that are
//! always present, even when empty.

use std::collections::btree_map::Entry;

use tracing::trace;

use crate::{
    ir::{NodeId, StructTypeId, Symbol, SymbolId},
    metadata::{
        codec::MetadataCodec,
        layout::{
            function_annotation, matrix_annotation, parameter_annotation, record_operands,
            struct_annotation, tags, type_annotations, RecordKind,
        },
        names::NamedEntry,
        properties::{unknown_tag, TagValueList, TagValueWriter},
        registry,
        scalar::{
            enum_from_node, enum_to_node, from_node, function_from_node, symbol_from_node,
            to_node, tuple_operands, tuple_to_u32_vec, u32_vec_to_tuple,
        },
    },
    model::{
        ComponentType, FieldAnnotation, FunctionAnnotation, InterpolationMode, MatrixAnnotation,
        MatrixOrientation, ParameterAnnotation, ParameterQualifier, StructAnnotation, TypeSystem,
    },
    Result,
};

impl MetadataCodec<'_> {
    /// Writes the type annotations entry. Each of the two tuples is written only if it has at
    /// least one annotation; nothing is written for an empty type system. The entry is written
    /// at most once, whichever tuples it holds.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if an annotation refers to a missing struct type or a
    /// symbol that is not a function, if its field or parameter count does not match the type,
    /// or if the type annotations entry already exists.
    pub fn emit_type_system(&mut self, type_system: &TypeSystem) -> Result<()> {
        if type_system.is_empty() {
            return Ok(());
        }
        if self
            .container
            .named(NamedEntry::TypeAnnotations.key())
            .is_some()
        {
            return Err(malformed_error!(
                "Named metadata '{}' already exists",
                NamedEntry::TypeAnnotations.key()
            ));
        }

        if !type_system.structs.is_empty() {
            let mut operands = vec![Some(to_node(self.container, type_annotations::STRUCT_TAG))];
            for (ty, annotation) in &type_system.structs {
                let annotation = self.emit_struct_annotation(*ty, annotation)?;
                let undef = self.container.undef(*ty);
                operands.push(Some(self.container.value(undef)));
                operands.push(Some(annotation));
            }
            let node = self.container.tuple(operands);
            registry::emit_once(self.container, NamedEntry::TypeAnnotations, node)?;
        }

        if !type_system.functions.is_empty() {
            let mut operands = vec![Some(to_node(self.container, type_annotations::FUNCTION_TAG))];
            for (function, annotation) in &type_system.functions {
                let annotation = self.emit_function_annotation(*function, annotation)?;
                operands.push(Some(self.container.value(*function)));
                operands.push(Some(annotation));
            }
            let node = self.container.tuple(operands);
            registry::append(self.container, NamedEntry::TypeAnnotations, node)?;
        }

        Ok(())
    }

    /// Reads the type annotations entry; an absent entry loads as an empty type system.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry holds more than two tuples, a tuple has an
    /// unknown tag or a dangling pair, a key is of the wrong kind or repeated, or an annotation
    /// does not match its type.
    pub fn load_type_system(&self) -> Result<TypeSystem> {
        let mut type_system = TypeSystem::default();

        let entries = registry::bounded_operands(
            self.container,
            NamedEntry::TypeAnnotations,
            type_annotations::MAX_OPERANDS,
        )?;
        for entry in entries {
            let operands = tuple_operands(self.container, Some(*entry))?;
            if operands.len() % 2 != 1 {
                return Err(malformed_error!(
                    "Type annotation tuple has {} operands, expected a tag and key/value pairs",
                    operands.len()
                ));
            }

            let tag = from_node::<u32>(self.container, operands[type_annotations::TAG])?;
            let pairs = operands[type_annotations::FIRST_PAIR..].chunks_exact(2);
            match tag {
                type_annotations::STRUCT_TAG => {
                    for pair in pairs {
                        let ty = self.struct_key(pair[0])?;
                        let annotation = self.load_struct_annotation(ty, pair[1])?;
                        match type_system.structs.entry(ty) {
                            Entry::Vacant(slot) => {
                                slot.insert(annotation);
                            }
                            Entry::Occupied(_) => {
                                return Err(malformed_error!(
                                    "Struct type {} annotated twice",
                                    ty.index()
                                ))
                            }
                        }
                    }
                }
                type_annotations::FUNCTION_TAG => {
                    for pair in pairs {
                        let function = function_from_node(self.container, pair[0])?;
                        let annotation = self.load_function_annotation(function, pair[1])?;
                        match type_system.functions.entry(function) {
                            Entry::Vacant(slot) => {
                                slot.insert(annotation);
                            }
                            Entry::Occupied(_) => {
                                return Err(malformed_error!(
                                    "Function {} annotated twice",
                                    function
                                ))
                            }
                        }
                    }
                }
                _ => return Err(unknown_tag(tag, "type annotation")),
            }
        }

        trace!(
            structs = type_system.structs.len(),
            functions = type_system.functions.len(),
            "loaded type annotations"
        );
        Ok(type_system)
    }

    /// Builds a struct annotation for the struct type `ty`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `ty` does not exist, the field count differs from
    /// the element count, or the annotation is marked empty for a non-empty struct.
    pub fn emit_struct_annotation(
        &mut self,
        ty: StructTypeId,
        annotation: &StructAnnotation,
    ) -> Result<NodeId> {
        let Some(struct_type) = self.container.struct_type(ty) else {
            return Err(malformed_error!("Unknown struct type {}", ty.index()));
        };

        if annotation.is_empty_struct() {
            if !struct_type.is_empty_placeholder() {
                return Err(malformed_error!(
                    "Struct '{}' is marked empty but has a non-empty layout",
                    struct_type.name
                ));
            }
        } else if annotation.fields.len() != struct_type.elements.len() {
            return Err(malformed_error!(
                "Struct '{}' has {} elements but {} field annotations",
                struct_type.name,
                struct_type.elements.len(),
                annotation.fields.len()
            ));
        }

        let mut operands = vec![Some(to_node(self.container, annotation.cbuffer_size))];
        for field in &annotation.fields {
            operands.push(Some(self.emit_field_annotation(field)));
        }
        Ok(self.container.tuple(operands))
    }

    /// Reads the struct annotation of the struct type `ty`.
    ///
    /// A lone size on the empty-struct placeholder layout loads as an empty struct.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `ty` does not exist or the field count differs from
    /// the element count.
    pub fn load_struct_annotation(
        &self,
        ty: StructTypeId,
        node: Option<NodeId>,
    ) -> Result<StructAnnotation> {
        let Some(struct_type) = self.container.struct_type(ty) else {
            return Err(malformed_error!("Unknown struct type {}", ty.index()));
        };
        let operands = tuple_operands(self.container, node)?;
        let Some((size, fields)) = operands.split_first() else {
            return Err(malformed_error!(
                "Struct annotation of '{}' has no size",
                struct_type.name
            ));
        };

        let mut annotation = StructAnnotation::new(0);
        annotation.cbuffer_size = from_node(self.container, *size)?;

        if fields.is_empty() && struct_type.is_empty_placeholder() {
            annotation.mark_empty();
            return Ok(annotation);
        }
        if fields.len() != struct_type.elements.len() {
            return Err(malformed_error!(
                "Struct annotation of '{}' has {} fields, expected {}",
                struct_type.name,
                fields.len(),
                struct_type.elements.len()
            ));
        }

        for field in &operands[struct_annotation::FIRST_FIELD..] {
            annotation.fields.push(self.load_field_annotation(*field)?);
        }
        Ok(annotation)
    }

    /// Builds a function annotation for `function`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `function` is not a function or the parameter count
    /// differs from its signature.
    pub fn emit_function_annotation(
        &mut self,
        function: SymbolId,
        annotation: &FunctionAnnotation,
    ) -> Result<NodeId> {
        let Some(target) = self.container.function(function) else {
            return Err(malformed_error!(
                "Function annotation for {}, which is not a function",
                function
            ));
        };
        if target.params.len() != annotation.parameters.len() {
            return Err(malformed_error!(
                "Function '{}' has {} parameters but {} parameter annotations",
                target.name,
                target.params.len(),
                annotation.parameters.len()
            ));
        }

        let mut operands = vec![Some(
            self.emit_parameter_annotation(&annotation.return_annotation),
        )];
        for parameter in &annotation.parameters {
            operands.push(Some(self.emit_parameter_annotation(parameter)));
        }
        Ok(self.container.tuple(operands))
    }

    /// Reads the function annotation of `function`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the annotation does not have one entry for the
    /// return value plus one per parameter.
    pub fn load_function_annotation(
        &self,
        function: SymbolId,
        node: Option<NodeId>,
    ) -> Result<FunctionAnnotation> {
        let Some(target) = self.container.function(function) else {
            return Err(malformed_error!("Expected a function at {}", function));
        };
        let operands = tuple_operands(self.container, node)?;
        if operands.len() != target.params.len() + 1 {
            return Err(malformed_error!(
                "Function annotation of '{}' has {} entries, expected {}",
                target.name,
                operands.len(),
                target.params.len() + 1
            ));
        }

        let mut annotation = FunctionAnnotation {
            return_annotation: self
                .load_parameter_annotation(operands[function_annotation::RETURN])?,
            parameters: Vec::with_capacity(target.params.len()),
        };
        for parameter in &operands[function_annotation::FIRST_PARAMETER..] {
            annotation
                .parameters
                .push(self.load_parameter_annotation(*parameter)?);
        }
        Ok(annotation)
    }

    /// Builds a parameter annotation `[qualifier, field annotation, semantic indices]`.
    pub fn emit_parameter_annotation(&mut self, parameter: &ParameterAnnotation) -> NodeId {
        let mut operands = vec![None; RecordKind::ParameterAnnotation.arity()];
        operands[parameter_annotation::QUALIFIER] =
            Some(enum_to_node::<u32, _>(self.container, parameter.qualifier));
        operands[parameter_annotation::FIELD] = Some(self.emit_field_annotation(&parameter.field));
        operands[parameter_annotation::SEMANTIC_INDICES] =
            Some(u32_vec_to_tuple(self.container, &parameter.semantic_indices));
        self.container.tuple(operands)
    }

    /// Reads a parameter annotation.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on a wrong arity or a malformed field.
    pub fn load_parameter_annotation(&self, node: Option<NodeId>) -> Result<ParameterAnnotation> {
        let operands = record_operands(self.container, node, RecordKind::ParameterAnnotation)?;
        Ok(ParameterAnnotation {
            qualifier: enum_from_node::<u32, ParameterQualifier>(
                self.container,
                operands[parameter_annotation::QUALIFIER],
            )?,
            field: self.load_field_annotation(operands[parameter_annotation::FIELD])?,
            semantic_indices: tuple_to_u32_vec(
                self.container,
                operands[parameter_annotation::SEMANTIC_INDICES],
            )?,
        })
    }

    /// Builds a field annotation. Only the properties that are set are written.
    pub fn emit_field_annotation(&mut self, field: &FieldAnnotation) -> NodeId {
        let matrix = field.matrix.map(|matrix| {
            let mut operands = vec![None; RecordKind::MatrixAnnotation.arity()];
            operands[matrix_annotation::ROWS] = Some(to_node(self.container, matrix.rows));
            operands[matrix_annotation::COLS] = Some(to_node(self.container, matrix.cols));
            operands[matrix_annotation::ORIENTATION] =
                Some(enum_to_node::<u32, _>(self.container, matrix.orientation));
            self.container.tuple(operands)
        });

        let mut out = TagValueWriter::new(&mut *self.container);
        if let Some(name) = &field.field_name {
            out.push_string(tags::FIELD_NAME, name);
        }
        if field.precise {
            out.push(tags::FIELD_PRECISE, true);
        }
        if let Some(matrix) = matrix {
            out.push_node(tags::FIELD_MATRIX, matrix);
        }
        if let Some(offset) = field.cbuffer_offset {
            out.push(tags::FIELD_CBUFFER_OFFSET, offset);
        }
        if let Some(semantic) = &field.semantic {
            out.push_string(tags::FIELD_SEMANTIC, semantic);
        }
        if let Some(interpolation) = field.interpolation {
            out.push_enum::<u32, _>(tags::FIELD_INTERPOLATION, interpolation);
        }
        if let Some(component_type) = field.component_type {
            out.push_enum::<u32, _>(tags::FIELD_COMPONENT_TYPE, component_type);
        }
        out.finish_tuple()
    }

    /// Reads a field annotation.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the slot is null, or on an unknown tag or a value of
    /// the wrong shape.
    pub fn load_field_annotation(&self, node: Option<NodeId>) -> Result<FieldAnnotation> {
        if node.is_none() {
            return Err(malformed_error!("Field annotation slot is null"));
        }

        let list = TagValueList::parse(self.container, node)?;
        let mut field = FieldAnnotation::default();
        for (tag, value) in list.iter() {
            match tag {
                tags::FIELD_NAME => field.field_name = Some(list.string(value)?),
                tags::FIELD_PRECISE => field.precise = list.scalar(value)?,
                tags::FIELD_MATRIX => field.matrix = Some(self.load_matrix_annotation(value)?),
                tags::FIELD_CBUFFER_OFFSET => field.cbuffer_offset = Some(list.scalar(value)?),
                tags::FIELD_SEMANTIC => field.semantic = Some(list.string(value)?),
                tags::FIELD_INTERPOLATION => {
                    field.interpolation = Some(list.enumeration::<u32, InterpolationMode>(value)?);
                }
                tags::FIELD_COMPONENT_TYPE => {
                    field.component_type = Some(list.enumeration::<u32, ComponentType>(value)?);
                }
                _ => return Err(unknown_tag(tag, "field annotation")),
            }
        }
        Ok(field)
    }

    fn load_matrix_annotation(&self, node: NodeId) -> Result<MatrixAnnotation> {
        let operands = record_operands(self.container, Some(node), RecordKind::MatrixAnnotation)?;
        Ok(MatrixAnnotation {
            rows: from_node(self.container, operands[matrix_annotation::ROWS])?,
            cols: from_node(self.container, operands[matrix_annotation::COLS])?,
            orientation: enum_from_node::<u32, MatrixOrientation>(
                self.container,
                operands[matrix_annotation::ORIENTATION],
            )?,
        })
    }

    fn struct_key(&self, node: Option<NodeId>) -> Result<StructTypeId> {
        let symbol = symbol_from_node(self.container, node)?;
        match self.container.symbol(symbol) {
            Some(Symbol::Undef(ty)) => Ok(*ty),
            Some(other) => Err(malformed_error!(
                "Struct annotation keyed by a {}, expected an undef value",
                other.kind()
            )),
            None => Err(malformed_error!("Dangling symbol reference {}", symbol)),
        }
    }
}
