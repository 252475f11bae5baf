//! Emission and lookup policies of named top-level entries.
//!
//! Every entry is written at most once per container; the validator version is the one
//! entry that may be replaced. On load, an entry either has exactly the operand count its
//! policy allows or the load fails.

use tracing::debug;

use crate::{
    ir::{Container, NodeId},
    metadata::names::NamedEntry,
    Result,
};

/// Creates `entry` holding the single operand `node`.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the entry already exists.
pub fn emit_once(container: &mut Container, entry: NamedEntry, node: NodeId) -> Result<()> {
    container.insert_named(entry.key())?;
    container.add_named_operand(entry.key(), node)?;
    debug!(entry = entry.key(), node = %node, "emitted named metadata");
    Ok(())
}

/// Creates `entry` with the operands `nodes`, in order.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the entry already exists.
pub fn emit_list(container: &mut Container, entry: NamedEntry, nodes: &[NodeId]) -> Result<()> {
    container.insert_named(entry.key())?;
    for node in nodes {
        container.add_named_operand(entry.key(), *node)?;
    }
    debug!(entry = entry.key(), operands = nodes.len(), "emitted named metadata");
    Ok(())
}

/// Appends `node` to `entry`, creating the entry on first use.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the entry cannot be created.
pub fn append(container: &mut Container, entry: NamedEntry, node: NodeId) -> Result<()> {
    if container.named(entry.key()).is_none() {
        container.insert_named(entry.key())?;
    }
    container.add_named_operand(entry.key(), node)
}

/// Replaces `entry` (erase, then insert) with the single operand `node`.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the container rejects the operand.
pub fn replace(container: &mut Container, entry: NamedEntry, node: NodeId) -> Result<()> {
    if container.erase_named(entry.key()) {
        debug!(entry = entry.key(), "replacing named metadata");
    }
    emit_once(container, entry, node)
}

/// The one operand of a mandatory entry.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the entry is absent or holds another operand count.
pub fn single_operand(container: &Container, entry: NamedEntry) -> Result<NodeId> {
    match container.named(entry.key()) {
        Some([node]) => Ok(*node),
        Some(operands) => Err(malformed_error!(
            "Named metadata '{}' has {} operands, expected 1",
            entry.key(),
            operands.len()
        )),
        None => Err(malformed_error!(
            "Named metadata '{}' is missing",
            entry.key()
        )),
    }
}

/// The operand of an optional entry; `None` if the entry is absent.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the entry exists with other than one operand.
pub fn optional_operand(container: &Container, entry: NamedEntry) -> Result<Option<NodeId>> {
    match container.named(entry.key()) {
        Some([node]) => Ok(Some(*node)),
        Some(operands) => Err(malformed_error!(
            "Named metadata '{}' has {} operands, expected 1",
            entry.key(),
            operands.len()
        )),
        None => {
            debug!(entry = entry.key(), "named metadata absent, using default");
            Ok(None)
        }
    }
}

/// The operands of an optional entry holding at most `max` operands; empty if absent.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the entry holds more than `max` operands.
pub fn bounded_operands(container: &Container, entry: NamedEntry, max: usize) -> Result<&[NodeId]> {
    match container.named(entry.key()) {
        Some(operands) if operands.len() <= max => Ok(operands),
        Some(operands) => Err(malformed_error!(
            "Named metadata '{}' has {} operands, expected at most {}",
            entry.key(),
            operands.len(),
            max
        )),
        None => {
            debug!(entry = entry.key(), "named metadata absent, using default");
            Ok(&[])
        }
    }
}
