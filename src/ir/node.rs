//! Metadata node shapes stored in the container arena.

use std::fmt;

use crate::ir::symbol::SymbolId;

/// Stable handle of a node inside one [`crate::ir::Container`].
///
/// Ids are dense arena indices; they are never reused and stay valid for the lifetime of the
/// container, including across in-place operand patches.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena index of this node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", self.0)
    }
}

/// A scalar constant.
///
/// Integers are stored zero-extended and masked to their bit width, so an `i8` of `-1` is
/// `Int { bits: 8, value: 0xFF }`. Floats are stored as their IEEE-754 bit pattern, which keeps
/// the node hashable and makes `-0.0` and `0.0` distinct constants.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Constant {
    /// An integer of `bits` width (1, 8, 16, 32 or 64).
    Int {
        /// Bit width of the integer type
        bits: u8,
        /// Zero-extended value, masked to `bits`
        value: u64,
    },
    /// A 32-bit float, stored as raw bits.
    Float(u32),
}

impl Constant {
    /// Builds an integer constant, masking `value` to `bits`.
    #[must_use]
    pub fn int(bits: u8, value: u64) -> Self {
        Constant::Int {
            bits,
            value: value & width_mask(bits),
        }
    }

    /// Builds a 32-bit float constant.
    #[must_use]
    pub fn float(value: f32) -> Self {
        Constant::Float(value.to_bits())
    }
}

/// All-ones mask for an integer of the given width.
#[must_use]
pub fn width_mask(bits: u8) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1_u64 << bits) - 1
    }
}

/// A dense constant array, as used by blob-carrying entries.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum DataArray {
    /// An array of 8-bit integers.
    Bytes(Vec<u8>),
    /// An array of 32-bit integers.
    Words(Vec<u32>),
    /// The all-zero aggregate of `len` integers of `element_bits` width.
    Zero {
        /// Width of each element
        element_bits: u8,
        /// Number of elements
        len: usize,
    },
}

/// One node of the metadata graph.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Node {
    /// A scalar constant.
    Constant(Constant),
    /// A metadata string.
    String(String),
    /// An ordered list of optional operands. A `None` slot is a null operand.
    Tuple(Vec<Option<NodeId>>),
    /// A reference to a symbol owned by the container.
    Value(SymbolId),
    /// A dense constant array.
    Data(DataArray),
}

impl Node {
    /// Returns `true` for shapes the container memoizes (everything except tuples).
    #[must_use]
    pub fn is_interned(&self) -> bool {
        !matches!(self, Node::Tuple(_))
    }

    /// Short human readable name of the node shape, used in error messages.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Node::Constant(Constant::Int { .. }) => "integer",
            Node::Constant(Constant::Float(_)) => "float",
            Node::String(_) => "string",
            Node::Tuple(_) => "tuple",
            Node::Value(_) => "value",
            Node::Data(_) => "data array",
        }
    }
}
