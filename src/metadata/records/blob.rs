//! Root signature and view-id state entries, each `[data array]`.

use crate::{
    ir::{DataArray, Node, NodeId},
    metadata::{
        codec::MetadataCodec,
        layout::{blob, record_operands, RecordKind},
        names::NamedEntry,
        registry,
    },
    model::{RootSignature, ViewIdState},
    Result,
};

impl MetadataCodec<'_> {
    /// Writes the root signature entry; nothing is written for an empty root signature.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry already exists.
    pub fn emit_root_signature(&mut self, root_signature: &RootSignature) -> Result<()> {
        if root_signature.is_empty() {
            return Ok(());
        }

        let data = DataArray::Bytes(root_signature.serialized().to_vec());
        let node = self.emit_blob(data, RecordKind::RootSignature);
        registry::emit_once(self.container, NamedEntry::RootSignature, node)
    }

    /// Reads the root signature entry into `root_signature`, clearing it first.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry is malformed or does not hold bytes.
    pub fn load_root_signature(&self, root_signature: &mut RootSignature) -> Result<()> {
        root_signature.clear();

        let Some(node) = registry::optional_operand(self.container, NamedEntry::RootSignature)?
        else {
            return Ok(());
        };
        match self.load_blob(node, RecordKind::RootSignature)? {
            DataArray::Bytes(bytes) => {
                root_signature.deserialize(bytes);
                Ok(())
            }
            _ => Err(malformed_error!("Root signature is not a byte array")),
        }
    }

    /// Writes the view-id state entry; nothing is written for the zero state.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry already exists.
    pub fn emit_view_id_state(&mut self, view_id_state: &ViewIdState) -> Result<()> {
        if view_id_state.is_zero() {
            return Ok(());
        }

        let data = DataArray::Words(view_id_state.serialized().to_vec());
        let node = self.emit_blob(data, RecordKind::ViewIdState);
        registry::emit_once(self.container, NamedEntry::ViewIdState, node)
    }

    /// Reads the view-id state entry into `view_id_state`, clearing it first.
    ///
    /// A 32-bit all-zero aggregate loads as the zero state.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry is malformed or does not hold 32-bit words.
    pub fn load_view_id_state(&self, view_id_state: &mut ViewIdState) -> Result<()> {
        view_id_state.clear();

        let Some(node) = registry::optional_operand(self.container, NamedEntry::ViewIdState)?
        else {
            return Ok(());
        };
        match self.load_blob(node, RecordKind::ViewIdState)? {
            DataArray::Words(words) => {
                view_id_state.deserialize(words);
                Ok(())
            }
            DataArray::Zero {
                element_bits: 32, ..
            } => Ok(()),
            _ => Err(malformed_error!("View-id state is not a 32-bit word array")),
        }
    }

    fn emit_blob(&mut self, data: DataArray, kind: RecordKind) -> NodeId {
        let mut operands = vec![None; kind.arity()];
        operands[blob::DATA] = Some(self.container.data(data));
        self.container.tuple(operands)
    }

    fn load_blob(&self, node: NodeId, kind: RecordKind) -> Result<&DataArray> {
        let operands = record_operands(self.container, Some(node), kind)?;
        let Some(data) = operands[blob::DATA] else {
            return Err(malformed_error!("{} record holds no data", kind.name()));
        };
        match self.container.node(data) {
            Some(Node::Data(array)) => Ok(array),
            Some(other) => Err(malformed_error!(
                "{} record holds a {}, expected a data array",
                kind.name(),
                other.shape()
            )),
            None => Err(malformed_error!("Dangling node reference {}", data)),
        }
    }
}
