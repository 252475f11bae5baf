//! Emit/load operations for every record kind.
//!
//! Each submodule extends [`crate::MetadataCodec`] with the operations of one family of
//! records. Emit operations build tuples through the layout tables in
//! [`crate::metadata::layout`]; load operations check the arity against the same tables before
//! reading any field.
//!
//! # Key Components
//!
//! - [`version`] - DXIL version, validator version and shader model
//! - [`entrypoint`] - Entry point tuples, the entry point list and entry properties
//! - [`signature`] - Signatures and their elements
//! - [`resource`] - Resource lists, the four resource records and resource attributes
//! - [`typesystem`] - Struct, function, parameter and field annotations
//! - [`state`] - Geometry, domain and hull shader state
//! - [`blob`] - Root signature and view-id state
//! - [`hints`] - Self-identifying control-flow hint tuples
//! - [`precise`] - The precise marker on floating point instructions

pub mod blob;
pub mod entrypoint;
pub mod hints;
pub mod precise;
pub mod resource;
pub mod signature;
pub mod state;
pub mod typesystem;
pub mod version;

pub use entrypoint::EntryPointTuple;
