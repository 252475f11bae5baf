//! Byte-level access to persisted container images.
//!
//! # Key Components
//!
//! - [`io`] - Little-endian primitive reads/writes and the compressed unsigned integer encoding
//! - [`parser`] - [`parser::Parser`], a bounds-checked forward cursor used by the image reader

pub mod io;
pub mod parser;
