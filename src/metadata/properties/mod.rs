//! Sparse tag-value lists and the strategy reading and writing them.
//!
//! Resources and signature elements end with an optional list of `(tag, value)` pairs holding
//! the fields that differ from their contextual defaults. Which fields exist, and when they are
//! written, is decided by an [`ExtraProperties`] implementation; the record layouts only reserve
//! the slot. [`DefaultProperties`] is the implementation used unless a codec is given another.
//!
//! # Key Components
//!
//! - [`ExtraProperties`] - Emit/load hooks per extensible record kind
//! - [`TagValueWriter`] - Accumulates pairs during emit
//! - [`TagValueList`] - A parsed, shape-checked list during load
//! - [`DefaultProperties`] - The standard tag set
//!
//! # Examples
//!
//! ```rust
//! use dxilmd::metadata::properties::{TagValueList, TagValueWriter};
//! use dxilmd::Container;
//!
//! let mut container = Container::new();
//! let mut writer = TagValueWriter::new(&mut container);
//! writer.push(1, 16_u32);
//! let list = writer.finish();
//!
//! let parsed = TagValueList::parse(&container, list)?;
//! assert_eq!(parsed.len(), 1);
//! # Ok::<(), dxilmd::Error>(())
//! ```

mod default;

pub use default::DefaultProperties;

use crate::{
    ir::{Container, NodeId},
    metadata::scalar::{
        enum_from_node, enum_to_node, from_node, string_from_node, string_to_node, to_node,
        tuple_operands, MetadataScalar,
    },
    model::{CBuffer, DxilEnum, Resource, Sampler, SignatureElement},
    Error, Result,
};

/// Encoder and decoder of the optional fields of extensible records.
///
/// Emit hooks push a pair only for fields whose value is not the implicit default in the
/// record's context. Load hooks reset every optional field to that default before applying the
/// pairs, and fail on a tag they do not know.
pub trait ExtraProperties {
    /// Writes the optional fields of a shader resource view.
    fn emit_srv_properties(&self, srv: &Resource, out: &mut TagValueWriter<'_>);

    /// Reads the optional fields of a shader resource view.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on an unknown tag or a value of the wrong shape.
    fn load_srv_properties(&self, list: &TagValueList<'_>, srv: &mut Resource) -> Result<()>;

    /// Writes the optional fields of an unordered access view.
    fn emit_uav_properties(&self, uav: &Resource, out: &mut TagValueWriter<'_>);

    /// Reads the optional fields of an unordered access view.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on an unknown tag or a value of the wrong shape.
    fn load_uav_properties(&self, list: &TagValueList<'_>, uav: &mut Resource) -> Result<()>;

    /// Writes the optional fields of a constant buffer.
    fn emit_cbuffer_properties(&self, cbuffer: &CBuffer, out: &mut TagValueWriter<'_>);

    /// Reads the optional fields of a constant buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on an unknown tag or a value of the wrong shape.
    fn load_cbuffer_properties(&self, list: &TagValueList<'_>, cbuffer: &mut CBuffer)
        -> Result<()>;

    /// Writes the optional fields of a sampler.
    fn emit_sampler_properties(&self, sampler: &Sampler, out: &mut TagValueWriter<'_>);

    /// Reads the optional fields of a sampler.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on an unknown tag or a value of the wrong shape.
    fn load_sampler_properties(&self, list: &TagValueList<'_>, sampler: &mut Sampler)
        -> Result<()>;

    /// Writes the optional fields of a signature element.
    fn emit_signature_element_properties(
        &self,
        element: &SignatureElement,
        out: &mut TagValueWriter<'_>,
    );

    /// Reads the optional fields of a signature element.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on an unknown tag or a value of the wrong shape.
    fn load_signature_element_properties(
        &self,
        list: &TagValueList<'_>,
        element: &mut SignatureElement,
    ) -> Result<()>;
}

/// Builder of a tag-value list during emit.
pub struct TagValueWriter<'c> {
    container: &'c mut Container,
    operands: Vec<Option<NodeId>>,
}

impl<'c> TagValueWriter<'c> {
    /// Creates an empty list writing its nodes into `container`.
    pub fn new(container: &'c mut Container) -> Self {
        TagValueWriter {
            container,
            operands: Vec::new(),
        }
    }

    /// Appends a scalar value.
    pub fn push<T: MetadataScalar>(&mut self, tag: u32, value: T) {
        let value = to_node(self.container, value);
        self.push_node(tag, value);
    }

    /// Appends an enumeration stored as a `T`-width integer.
    pub fn push_enum<T: MetadataScalar, E: DxilEnum>(&mut self, tag: u32, value: E) {
        let value = enum_to_node::<T, E>(self.container, value);
        self.push_node(tag, value);
    }

    /// Appends a string value.
    pub fn push_string(&mut self, tag: u32, value: &str) {
        let value = string_to_node(self.container, value);
        self.push_node(tag, value);
    }

    /// Appends an already built node, e.g. a nested tuple.
    pub fn push_node(&mut self, tag: u32, value: NodeId) {
        let tag = to_node(self.container, tag);
        self.operands.push(Some(tag));
        self.operands.push(Some(value));
    }

    /// The container nodes are written to, for building nested values.
    pub fn container(&mut self) -> &mut Container {
        &mut *self.container
    }

    /// Number of pairs written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operands.len() / 2
    }

    /// Returns `true` if no pair was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    /// Finishes the list for a record slot: `None` (a null slot) when no pair was written.
    pub fn finish(self) -> Option<NodeId> {
        if self.operands.is_empty() {
            return None;
        }
        Some(self.container.tuple(self.operands))
    }

    /// Finishes the list as a tuple, empty if no pair was written.
    pub fn finish_tuple(self) -> NodeId {
        self.container.tuple(self.operands)
    }
}

/// A parsed tag-value list.
///
/// Parsing checks the list shape only: an even operand count, `u32` tags and non-null values.
/// Interpreting the values is left to the consumer.
pub struct TagValueList<'c> {
    container: &'c Container,
    entries: Vec<(u32, NodeId)>,
}

impl<'c> TagValueList<'c> {
    /// Parses the list at `node`; a null slot is an empty list.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `node` is not a tuple, has an odd length, or holds a
    /// tag that is not a `u32` or a null value.
    pub fn parse(container: &'c Container, node: Option<NodeId>) -> Result<Self> {
        let mut entries = Vec::new();
        if node.is_none() {
            return Ok(TagValueList { container, entries });
        }

        let operands = tuple_operands(container, node)?;
        if operands.len() % 2 != 0 {
            return Err(malformed_error!(
                "Tag-value list has odd length {}",
                operands.len()
            ));
        }

        for pair in operands.chunks_exact(2) {
            let tag = from_node::<u32>(container, pair[0])?;
            let value = pair[1].ok_or_else(|| malformed_error!("Null value for tag {}", tag))?;
            entries.push((tag, value));
        }

        Ok(TagValueList { container, entries })
    }

    /// The container the list lives in.
    #[must_use]
    pub fn container(&self) -> &'c Container {
        self.container
    }

    /// Pairs in persisted order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, NodeId)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the list holds no pair.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decodes a scalar value.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `value` is not an integer of `T`'s width.
    pub fn scalar<T: MetadataScalar>(&self, value: NodeId) -> Result<T> {
        from_node(self.container, Some(value))
    }

    /// Decodes an enumeration stored as a `T`-width integer.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on a width mismatch or unknown code.
    pub fn enumeration<T: MetadataScalar, E: DxilEnum>(&self, value: NodeId) -> Result<E> {
        enum_from_node::<T, E>(self.container, Some(value))
    }

    /// Decodes a string value.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `value` is not a string.
    pub fn string(&self, value: NodeId) -> Result<String> {
        string_from_node(self.container, Some(value))
    }
}

/// The error for a tag no handler of `record` recognizes.
#[must_use]
pub fn unknown_tag(tag: u32, record: &str) -> Error {
    malformed_error!("Unknown {} tag {}", record, tag)
}
