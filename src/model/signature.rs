//! Input, output and patch-constant signatures.

use crate::model::constants::{ComponentType, InterpolationMode, SemanticKind, SignatureKind};

/// One element of a signature.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SignatureElement {
    /// Element id, unique within its signature
    pub id: u32,
    /// Semantic name
    pub name: String,
    /// Component type
    pub component_type: ComponentType,
    /// System-value kind
    pub kind: SemanticKind,
    /// Semantic indices, one per row; order is significant
    pub semantic_indices: Vec<u32>,
    /// Interpolation mode
    pub interpolation: InterpolationMode,
    /// Number of rows
    pub rows: u32,
    /// Number of columns
    pub cols: u8,
    /// First allocated register row, `-1` if unallocated
    pub start_row: i32,
    /// First allocated register column, `-1` if unallocated
    pub start_col: i8,
    /// Geometry shader output stream (optional field, default `0`)
    pub output_stream: u32,
    /// Mask of components indexed dynamically (optional field, default `0`)
    pub dynamic_index_mask: u32,
}

impl SignatureElement {
    /// Creates an unallocated element with the given id and semantic name.
    #[must_use]
    pub fn new(id: u32, name: &str) -> Self {
        SignatureElement {
            id,
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Returns `true` if a register location has been assigned.
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        self.start_row >= 0 && self.start_col >= 0
    }
}

impl Default for SignatureElement {
    fn default() -> Self {
        SignatureElement {
            id: 0,
            name: String::new(),
            component_type: ComponentType::Invalid,
            kind: SemanticKind::Arbitrary,
            semantic_indices: Vec::new(),
            interpolation: InterpolationMode::Undefined,
            rows: 1,
            cols: 1,
            start_row: -1,
            start_col: -1,
            output_stream: 0,
            dynamic_index_mask: 0,
        }
    }
}

/// An ordered list of signature elements.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Signature {
    /// Which signature this is
    pub kind: SignatureKind,
    /// Elements in declaration order
    pub elements: Vec<SignatureElement>,
}

impl Signature {
    /// Creates an empty signature of the given kind.
    #[must_use]
    pub fn new(kind: SignatureKind) -> Self {
        Signature {
            kind,
            elements: Vec::new(),
        }
    }

    /// Returns `true` if the signature has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// The three signatures of an entry point.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EntrySignatures {
    /// Stage inputs
    pub input: Signature,
    /// Stage outputs
    pub output: Signature,
    /// Patch constants (hull and domain stages)
    pub patch_constant: Signature,
}

impl EntrySignatures {
    /// Returns `true` if all three signatures are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty() && self.output.is_empty() && self.patch_constant.is_empty()
    }
}

impl Default for EntrySignatures {
    fn default() -> Self {
        EntrySignatures {
            input: Signature::new(SignatureKind::Input),
            output: Signature::new(SignatureKind::Output),
            patch_constant: Signature::new(SignatureKind::PatchConstant),
        }
    }
}
