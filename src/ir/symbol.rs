//! Symbols and types owned by the container.
//!
//! The metadata tree never owns these; it refers to them through [`crate::ir::Node::Value`]
//! nodes holding a [`SymbolId`].

use std::fmt;

use crate::ir::function::Function;

/// Stable handle of a symbol inside one container.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    /// Index of this symbol in the container's symbol table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Stable handle of a struct type inside one container.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StructTypeId(pub(crate) u32);

impl StructTypeId {
    /// Index of this struct type in the container's type table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The subset of IR types the metadata needs to reason about.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum ElementType {
    /// No value.
    Void,
    /// An integer of the given bit width.
    Int(u8),
    /// 16-bit float.
    Half,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// A named struct.
    Struct(StructTypeId),
    /// A fixed-length array.
    Array(Box<ElementType>, u32),
}

impl ElementType {
    /// Returns `true` for scalar floating point types.
    #[must_use]
    pub fn is_floating_point(&self) -> bool {
        matches!(self, ElementType::Half | ElementType::Float | ElementType::Double)
    }
}

/// A named struct type.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StructType {
    /// Struct name
    pub name: String,
    /// Element types in declaration order
    pub elements: Vec<ElementType>,
}

impl StructType {
    /// Returns `true` for the placeholder layout of an empty struct: exactly one `i8` element.
    #[must_use]
    pub fn is_empty_placeholder(&self) -> bool {
        matches!(self.elements.as_slice(), [ElementType::Int(8)])
    }
}

/// A global resource variable.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Global {
    /// Symbol name
    pub name: String,
    /// Value type
    pub ty: ElementType,
}

/// Anything a metadata value node can refer to.
#[derive(Clone, PartialEq, Debug)]
pub enum Symbol {
    /// A function with a body (possibly empty).
    Function(Function),
    /// A global variable.
    Global(Global),
    /// The undefined value of a struct type, used as a key for struct annotations.
    Undef(StructTypeId),
}

impl Symbol {
    /// Short name of the symbol kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Symbol::Function(_) => "function",
            Symbol::Global(_) => "global",
            Symbol::Undef(_) => "undef",
        }
    }
}
