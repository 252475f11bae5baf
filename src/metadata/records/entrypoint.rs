//! Entry point tuples, the entry point list and entry properties.

use tracing::trace;

use crate::{
    ir::{NodeId, SymbolId},
    metadata::{
        codec::MetadataCodec,
        layout::{entry_point, record_operands, tags, RecordKind},
        names::NamedEntry,
        properties::{unknown_tag, TagValueList, TagValueWriter},
        registry,
        scalar::{
            optional_function_from_node, optional_value_to_node, string_from_node,
            string_to_node, tuple_to_u32_vec, u32_vec_to_tuple,
        },
    },
    model::{EntryProperties, ShaderFlags, StageState},
    Result,
};

/// The fields of an entry point tuple, with its sub-tuples still unparsed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EntryPointTuple {
    /// Entry function, `None` for a null slot
    pub function: Option<SymbolId>,
    /// Entry point name
    pub name: String,
    /// Signatures tuple, `None` if no signature has elements
    pub signatures: Option<NodeId>,
    /// Resource lists tuple, `None` if the entry binds no resources
    pub resources: Option<NodeId>,
    /// Entry property list, `None` if every property is at its default
    pub properties: Option<NodeId>,
}

impl MetadataCodec<'_> {
    /// Builds an entry point tuple.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `function` is set but is not a function.
    pub fn emit_entry_point_tuple(
        &mut self,
        function: Option<SymbolId>,
        name: &str,
        signatures: Option<NodeId>,
        resources: Option<NodeId>,
        properties: Option<NodeId>,
    ) -> Result<NodeId> {
        if let Some(symbol) = function {
            if self.container.function(symbol).is_none() {
                return Err(malformed_error!(
                    "Entry point '{}' refers to {}, which is not a function",
                    name,
                    symbol
                ));
            }
        }

        let mut operands = vec![None; RecordKind::EntryPoint.arity()];
        operands[entry_point::FUNCTION] = optional_value_to_node(self.container, function);
        operands[entry_point::NAME] = Some(string_to_node(self.container, name));
        operands[entry_point::SIGNATURES] = signatures;
        operands[entry_point::RESOURCES] = resources;
        operands[entry_point::PROPERTIES] = properties;
        Ok(self.container.tuple(operands))
    }

    /// Splits an entry point tuple into its fields.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on a wrong arity, a function slot that is not a
    /// function, or a name that is not a string.
    pub fn load_entry_point_tuple(&self, node: Option<NodeId>) -> Result<EntryPointTuple> {
        let operands = record_operands(self.container, node, RecordKind::EntryPoint)?;
        Ok(EntryPointTuple {
            function: optional_function_from_node(
                self.container,
                operands[entry_point::FUNCTION],
            )?,
            name: string_from_node(self.container, operands[entry_point::NAME])?,
            signatures: operands[entry_point::SIGNATURES],
            resources: operands[entry_point::RESOURCES],
            properties: operands[entry_point::PROPERTIES],
        })
    }

    /// Writes the entry point list.
    ///
    /// The list keeps its multi-entry shape, but exactly one entry point is supported.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `entries` does not hold exactly one tuple or the
    /// list already exists.
    pub fn emit_entry_points(&mut self, entries: &[NodeId]) -> Result<()> {
        if entries.len() != 1 {
            return Err(malformed_error!(
                "Only one entry point is supported, got {}",
                entries.len()
            ));
        }
        registry::emit_list(self.container, NamedEntry::EntryPoints, entries)
    }

    /// The entry point tuples, in order.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry point list is missing.
    pub fn load_entry_points(&self) -> Result<Vec<NodeId>> {
        match self.container.named(NamedEntry::EntryPoints.key()) {
            Some(entries) => Ok(entries.to_vec()),
            None => Err(malformed_error!(
                "Named metadata '{}' is missing",
                NamedEntry::EntryPoints.key()
            )),
        }
    }

    /// Builds the entry property list; `None` when every property is at its default.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the hull shader state names a symbol that is not a
    /// function.
    pub fn emit_entry_properties(&mut self, properties: &EntryProperties) -> Result<Option<NodeId>> {
        let stage = match &properties.stage {
            Some(StageState::Geometry(gs)) => Some((tags::ENTRY_GS_STATE, self.emit_gs_state(gs))),
            Some(StageState::Domain(ds)) => Some((tags::ENTRY_DS_STATE, self.emit_ds_state(ds))),
            Some(StageState::Hull(hs)) => Some((tags::ENTRY_HS_STATE, self.emit_hs_state(hs)?)),
            None => None,
        };
        let num_threads = properties
            .num_threads
            .map(|threads| u32_vec_to_tuple(self.container, &threads));

        let mut out = TagValueWriter::new(self.container);
        if !properties.shader_flags.is_empty() {
            out.push(tags::ENTRY_SHADER_FLAGS, properties.shader_flags.bits());
        }
        if let Some((tag, node)) = stage {
            out.push_node(tag, node);
        }
        if let Some(node) = num_threads {
            out.push_node(tags::ENTRY_NUM_THREADS, node);
        }
        trace!(properties = out.len(), "emitted entry properties");
        Ok(out.finish())
    }

    /// Reads an entry property list; a null slot loads as the defaults.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on an unknown tag, a repeated stage state, or a
    /// malformed value.
    pub fn load_entry_properties(&self, node: Option<NodeId>) -> Result<EntryProperties> {
        let list = TagValueList::parse(self.container, node)?;
        let mut properties = EntryProperties::default();

        for (tag, value) in list.iter() {
            let stage = match tag {
                tags::ENTRY_SHADER_FLAGS => {
                    properties.shader_flags = ShaderFlags::from_bits_retain(list.scalar(value)?);
                    None
                }
                tags::ENTRY_GS_STATE => Some(StageState::Geometry(self.load_gs_state(Some(value))?)),
                tags::ENTRY_DS_STATE => Some(StageState::Domain(self.load_ds_state(Some(value))?)),
                tags::ENTRY_HS_STATE => Some(StageState::Hull(self.load_hs_state(Some(value))?)),
                tags::ENTRY_NUM_THREADS => {
                    let threads = tuple_to_u32_vec(self.container, Some(value))?;
                    let [x, y, z] = threads[..] else {
                        return Err(malformed_error!(
                            "Thread group size has {} dimensions, expected 3",
                            threads.len()
                        ));
                    };
                    properties.num_threads = Some([x, y, z]);
                    None
                }
                _ => return Err(unknown_tag(tag, "entry property")),
            };

            if let Some(stage) = stage {
                if properties.stage.is_some() {
                    return Err(malformed_error!("Entry properties hold more than one stage state"));
                }
                properties.stage = Some(stage);
            }
        }

        Ok(properties)
    }
}
