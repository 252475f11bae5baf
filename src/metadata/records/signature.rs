//! Entry signatures and signature elements.

use tracing::trace;

use crate::{
    ir::NodeId,
    metadata::{
        codec::MetadataCodec,
        layout::{record_operands, signature_element as field, signatures, RecordKind},
        properties::{TagValueList, TagValueWriter},
        scalar::{
            enum_from_node, enum_to_node, from_node, string_from_node, string_to_node,
            to_node, tuple_operands, tuple_to_u32_vec, u32_vec_to_tuple,
        },
    },
    model::{
        ComponentType, EntrySignatures, InterpolationMode, SemanticKind, Signature,
        SignatureElement, SignatureKind,
    },
    Result,
};

impl MetadataCodec<'_> {
    /// Builds the signatures tuple `[input, output, patch constant]`.
    ///
    /// Returns `None` when all three signatures are empty; an individual empty signature is a
    /// null slot.
    pub fn emit_signatures(&mut self, entry: &EntrySignatures) -> Option<NodeId> {
        if entry.is_empty() {
            return None;
        }

        let operands = vec![
            self.emit_signature(&entry.input),
            self.emit_signature(&entry.output),
            self.emit_signature(&entry.patch_constant),
        ];
        Some(self.container.tuple(operands))
    }

    /// Reads a signatures tuple; a null slot loads as three empty signatures.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the tuple does not have three slots or an element
    /// is malformed.
    pub fn load_signatures(&self, node: Option<NodeId>) -> Result<EntrySignatures> {
        let Some(node) = node else {
            return Ok(EntrySignatures::default());
        };

        let operands = record_operands(self.container, Some(node), RecordKind::Signatures)?;
        Ok(EntrySignatures {
            input: self.load_signature(operands[signatures::INPUT], SignatureKind::Input)?,
            output: self.load_signature(operands[signatures::OUTPUT], SignatureKind::Output)?,
            patch_constant: self.load_signature(
                operands[signatures::PATCH_CONSTANT],
                SignatureKind::PatchConstant,
            )?,
        })
    }

    /// Builds the element list of one signature; `None` if it has no elements.
    pub fn emit_signature(&mut self, signature: &Signature) -> Option<NodeId> {
        if signature.is_empty() {
            return None;
        }

        let elements = signature
            .elements
            .iter()
            .map(|element| Some(self.emit_signature_element(element)))
            .collect();
        Some(self.container.tuple(elements))
    }

    /// Reads the element list of one signature of the given kind.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the list is not a tuple or an element is malformed.
    pub fn load_signature(&self, node: Option<NodeId>, kind: SignatureKind) -> Result<Signature> {
        let mut signature = Signature::new(kind);
        if node.is_none() {
            return Ok(signature);
        }

        for element in tuple_operands(self.container, node)? {
            signature
                .elements
                .push(self.load_signature_element(*element)?);
        }
        Ok(signature)
    }

    /// Builds one signature element record.
    pub fn emit_signature_element(&mut self, element: &SignatureElement) -> NodeId {
        let mut operands = vec![None; RecordKind::SignatureElement.arity()];
        operands[field::ID] = Some(to_node(self.container, element.id));
        operands[field::NAME] = Some(string_to_node(self.container, &element.name));
        operands[field::COMPONENT_TYPE] =
            Some(enum_to_node::<u8, _>(self.container, element.component_type));
        operands[field::SEMANTIC_KIND] = Some(enum_to_node::<u8, _>(self.container, element.kind));
        operands[field::SEMANTIC_INDICES] =
            Some(u32_vec_to_tuple(self.container, &element.semantic_indices));
        operands[field::INTERPOLATION] =
            Some(enum_to_node::<u8, _>(self.container, element.interpolation));
        operands[field::ROWS] = Some(to_node(self.container, element.rows));
        operands[field::COLS] = Some(to_node(self.container, element.cols));
        operands[field::START_ROW] = Some(to_node(self.container, element.start_row));
        operands[field::START_COL] = Some(to_node(self.container, element.start_col));

        let mut out = TagValueWriter::new(&mut *self.container);
        self.properties
            .emit_signature_element_properties(element, &mut out);
        operands[field::NAME_VALUE_LIST] = out.finish();

        trace!(id = element.id, name = %element.name, "emitted signature element");
        self.container.tuple(operands)
    }

    /// Reads one signature element record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on a wrong arity, a field of the wrong shape or width,
    /// an unknown enumeration code, or an optional field the strategy rejects.
    pub fn load_signature_element(&self, node: Option<NodeId>) -> Result<SignatureElement> {
        let operands = record_operands(self.container, node, RecordKind::SignatureElement)?;
        let c = &*self.container;

        let mut element = SignatureElement {
            id: from_node(c, operands[field::ID])?,
            name: string_from_node(c, operands[field::NAME])?,
            component_type: enum_from_node::<u8, ComponentType>(
                c,
                operands[field::COMPONENT_TYPE],
            )?,
            kind: enum_from_node::<u8, SemanticKind>(c, operands[field::SEMANTIC_KIND])?,
            semantic_indices: tuple_to_u32_vec(c, operands[field::SEMANTIC_INDICES])?,
            interpolation: enum_from_node::<u8, InterpolationMode>(
                c,
                operands[field::INTERPOLATION],
            )?,
            rows: from_node(c, operands[field::ROWS])?,
            cols: from_node(c, operands[field::COLS])?,
            start_row: from_node(c, operands[field::START_ROW])?,
            start_col: from_node(c, operands[field::START_COL])?,
            ..SignatureElement::default()
        };

        let list = TagValueList::parse(c, operands[field::NAME_VALUE_LIST])?;
        self.properties
            .load_signature_element_properties(&list, &mut element)?;
        Ok(element)
    }
}
