//! DXIL metadata emission and loading.
//!
//! This module defines the persisted metadata format: how every typed DXIL object is laid out as
//! a tuple of scalar nodes, which optional fields are stored sparsely, and under which named
//! top-level entries the records hang. Emit and load share the same layout tables, so the two
//! directions stay symmetric by construction.
//!
//! # Key Components
//!
//! - [`codec`] - [`MetadataCodec`](codec::MetadataCodec), bound to one container, with the
//!   `emit_all` / `load_all` passes
//! - [`records`] - Emit/load pairs for every record kind
//! - [`scalar`] - Exact-width scalar, string, enum and symbol nodes
//! - [`layout`] - Field positions and arities of every record
//! - [`properties`] - Sparse tag-value lists and the [`ExtraProperties`](properties::ExtraProperties) strategy
//! - [`registry`] - Emission and lookup policies of the named entries
//! - [`names`] - Persisted keys
//! - [`config`] - [`CodecConfig`](config::CodecConfig)
//!
//! # Examples
//!
//! ```rust
//! use dxilmd::prelude::*;
//! use dxilmd::metadata::names::NamedEntry;
//!
//! let mut container = Container::new();
//! let module = ShaderModule::new(ShaderModel::new(ShaderKind::Vertex, 6, 0));
//! MetadataCodec::new(&mut container).emit_all(&module)?;
//!
//! assert!(container.named(NamedEntry::ShaderModel.key()).is_some());
//! assert!(container.named(NamedEntry::Resources.key()).is_none());
//! # Ok::<(), dxilmd::Error>(())
//! ```

pub mod codec;
pub mod config;
pub mod layout;
pub mod names;
pub mod properties;
pub mod records;
pub mod registry;
pub mod scalar;
