// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]

//! # dxilmd
//!
//! Emit and load the versioned DXIL metadata tree of a shader container.
//!
//! A DXIL shader carries everything the runtime needs to know about it (entry point, resource
//! bindings, input/output signatures, type annotations, tessellation and geometry state, view-id
//! dependencies, precision markers) as a tree of generic metadata nodes hanging off a handful of
//! named top-level entries. `dxilmd` is the single place where that wire format is defined: every
//! field order, arity and optional-field rule lives here, shared by the emit and the load path.
//!
//! ## Features
//!
//! - **📦 Arena container** - Stable node ids, per-container scalar interning, in-place patching
//! - **🔍 Strict decoding** - Every arity, width and tag mismatch fails the whole load
//! - **🧩 Extensible properties** - Optional resource and signature fields go through an injectable strategy
//! - **💾 Persisted image** - Compact binary form of a container, checked on read
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dxilmd::prelude::*;
//!
//! let mut container = Container::new();
//! let entry = container.add_function("main", Vec::new(), ElementType::Void);
//!
//! let mut module = ShaderModule::new(ShaderModel::new(ShaderKind::Pixel, 6, 0));
//! module.entry.function = Some(entry);
//! module.entry.name = "main".to_string();
//!
//! MetadataCodec::new(&mut container).emit_all(&module)?;
//!
//! let image = container.to_bytes()?;
//! let mut loaded = Container::from_bytes(&image)?;
//! let decoded = MetadataCodec::new(&mut loaded).load_all()?;
//! assert_eq!(decoded.entry.name, "main");
//! # Ok::<(), dxilmd::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`ir`] - The container: node arena, named entries, symbols, functions and the persisted image
//! - [`model`] - Typed DXIL objects (resources, signatures, type annotations, stage state)
//! - [`metadata`] - The codec itself: scalar codec, layout tables, property strategy, record codec,
//!   named-entry registry and the `emit_all` / `load_all` orchestration
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! Every decode problem is reported as [`Error::Malformed`], carrying the source location where
//! it was detected. A failed load leaves the target model in an unspecified state; discard it.
//!
//! ```rust,no_run
//! use dxilmd::{Error, prelude::*};
//!
//! let mut container = Container::new();
//! match MetadataCodec::new(&mut container).load_all() {
//!     Ok(module) => println!("entry point {}", module.entry.name),
//!     Err(Error::Malformed { message, .. }) => println!("Malformed metadata: {}", message),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//! cargo +nightly fuzz run image --release
//! ```
#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use dxilmd::prelude::*;
///
/// let mut container = Container::new();
/// let codec = MetadataCodec::new(&mut container);
/// assert!(codec.shader_model().is_none());
/// ```
pub mod prelude;

/// The generic IR container the metadata tree lives in.
///
/// Nodes are stored in an arena and addressed by [`ir::NodeId`]. Scalars, strings, value
/// references and data arrays are interned per container; tuples are always fresh, which is what
/// allows a tuple to be patched in place to reference itself.
pub mod ir;

/// Typed DXIL domain objects read and written by the codec.
pub mod model;

/// The DXIL metadata codec.
///
/// Converts a [`model::ShaderModule`] into the named metadata entries of a [`ir::Container`]
/// and back, enforcing fixed core arities, sparse tag-value lists and the named-entry
/// emission rules.
pub mod metadata;

/// `dxilmd` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dxilmd` Error type
///
/// The main error type for all operations in this crate. See [`Error::Malformed`] for the
/// uniform metadata decode fault.
pub use error::Error;

/// Main entry point for emitting and loading DXIL metadata
pub use metadata::codec::MetadataCodec;

/// Codec behaviour switches
pub use metadata::config::CodecConfig;

/// The container the metadata is stored in
pub use ir::Container;

/// Low-level byte cursor used to read persisted container images
pub use file::parser::Parser;
