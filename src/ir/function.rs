//! Functions and the per-instruction state the metadata touches.

use std::collections::BTreeMap;

use bitflags::bitflags;
use strum::{EnumCount, EnumIter, FromRepr};

use crate::ir::{
    node::NodeId,
    symbol::{ElementType, SymbolId},
};

bitflags! {
    /// Fast-math flags of a floating point instruction.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct FastMathFlags : u8 {
        /// Algebraically equivalent transformations are allowed
        const UNSAFE_ALGEBRA = 0x1;
        /// Arguments and results are assumed not to be NaN
        const NO_NANS = 0x2;
        /// Arguments and results are assumed not to be +/-Inf
        const NO_INFS = 0x4;
        /// The sign of a zero argument or result is insignificant
        const NO_SIGNED_ZEROS = 0x8;
        /// A reciprocal may be used instead of a division
        const ALLOW_RECIPROCAL = 0x10;
    }
}

impl FastMathFlags {
    /// The fully relaxed set: unsafe algebra implies every other flag.
    #[must_use]
    pub fn relaxed() -> Self {
        Self::all()
    }

    /// Returns `true` if unsafe algebra is allowed.
    #[must_use]
    pub fn has_unsafe_algebra(self) -> bool {
        self.contains(Self::UNSAFE_ALGEBRA)
    }
}

/// Instruction operation, reduced to what the metadata layer distinguishes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, FromRepr, EnumIter, EnumCount)]
#[repr(u8)]
pub enum Opcode {
    /// Floating point add
    FAdd,
    /// Floating point subtract
    FSub,
    /// Floating point multiply
    FMul,
    /// Floating point divide
    FDiv,
    /// Floating point remainder
    FRem,
    /// Floating point compare
    FCmp,
    /// Call (the callee is recorded on the instruction)
    Call,
    /// Conditional or unconditional branch
    Br,
    /// Switch
    Switch,
    /// Memory load
    Load,
    /// Memory store
    Store,
    /// Return
    Ret,
    /// Any other operation
    Other,
}

/// One instruction of a function body.
#[derive(Clone, PartialEq, Debug)]
pub struct Instruction {
    /// Operation
    pub opcode: Opcode,
    /// Called function for [`Opcode::Call`]
    pub callee: Option<SymbolId>,
    /// Result type
    pub ty: ElementType,
    /// Fast-math flags, meaningful only for floating point math
    pub fast_math: FastMathFlags,
    /// Named metadata attachments
    pub attachments: BTreeMap<String, NodeId>,
}

impl Instruction {
    /// Creates an instruction with no flags and no attachments.
    #[must_use]
    pub fn new(opcode: Opcode, ty: ElementType) -> Self {
        Instruction {
            opcode,
            callee: None,
            ty,
            fast_math: FastMathFlags::empty(),
            attachments: BTreeMap::new(),
        }
    }

    /// Creates a call to `callee` returning `ty`.
    #[must_use]
    pub fn call(callee: SymbolId, ty: ElementType) -> Self {
        Instruction {
            callee: Some(callee),
            ..Instruction::new(Opcode::Call, ty)
        }
    }

    /// Returns `true` for instructions that carry floating point math semantics: the
    /// floating point arithmetic and compare operations, plus calls and other non-memory
    /// operations producing a floating point value. Loads never carry fast-math flags.
    #[must_use]
    pub fn is_fp_math(&self) -> bool {
        matches!(
            self.opcode,
            Opcode::FAdd | Opcode::FSub | Opcode::FMul | Opcode::FDiv | Opcode::FRem | Opcode::FCmp
        ) || (self.ty.is_floating_point() && !matches!(self.opcode, Opcode::Load))
    }

    /// Attachment stored under `key`.
    #[must_use]
    pub fn attachment(&self, key: &str) -> Option<NodeId> {
        self.attachments.get(key).copied()
    }

    /// Sets (or replaces) the attachment under `key`.
    pub fn attach(&mut self, key: &str, node: NodeId) {
        self.attachments.insert(key.to_string(), node);
    }

    /// Removes the attachment under `key`, returning it.
    pub fn detach(&mut self, key: &str) -> Option<NodeId> {
        self.attachments.remove(key)
    }
}

/// A function symbol.
#[derive(Clone, PartialEq, Debug)]
pub struct Function {
    /// Symbol name
    pub name: String,
    /// Parameter types
    pub params: Vec<ElementType>,
    /// Return type
    pub return_type: ElementType,
    /// Body, in order
    pub instructions: Vec<Instruction>,
}

impl Function {
    /// Creates a function without a body.
    #[must_use]
    pub fn new(name: &str, params: Vec<ElementType>, return_type: ElementType) -> Self {
        Function {
            name: name.to_string(),
            params,
            return_type,
            instructions: Vec::new(),
        }
    }
}
