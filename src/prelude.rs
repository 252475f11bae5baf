//! # dxilmd Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dxilmd library. Import this module to get quick access to the container, the codec
//! and the typed DXIL objects it reads and writes.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dxilmd operations
pub use crate::Error;

/// The result type used throughout dxilmd
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The codec and its configuration
pub use crate::metadata::{codec::MetadataCodec, config::CodecConfig};

/// Optional-field strategy
pub use crate::metadata::properties::{
    DefaultProperties, ExtraProperties, TagValueList, TagValueWriter,
};

/// Named entry keys
pub use crate::metadata::names::NamedEntry;

// ================================================================================================
// Container
// ================================================================================================

/// Container, nodes and symbols
pub use crate::ir::{
    Constant, Container, DataArray, ElementType, FastMathFlags, Function, Instruction, Node,
    NodeId, Opcode, StructType, StructTypeId, Symbol, SymbolId,
};

// ================================================================================================
// Domain Model
// ================================================================================================

/// Shader module aggregate and versions
pub use crate::model::{EntryPoint, ShaderModel, ShaderModule, Version};

/// Signatures
pub use crate::model::{EntrySignatures, Signature, SignatureElement};

/// Resources
pub use crate::model::{CBuffer, Resource, ResourceBase, ResourceLists, ResourceRecord, Sampler};

/// Type annotations
pub use crate::model::{
    FieldAnnotation, FunctionAnnotation, MatrixAnnotation, ParameterAnnotation, StructAnnotation,
    TypeSystem,
};

/// Stage state and entry properties
pub use crate::model::{DsState, EntryProperties, GsState, HsState, ShaderFlags, StageState};

/// Serialized blobs
pub use crate::model::{RootSignature, ViewIdState};

/// Enumerations
pub use crate::model::{
    ComponentType, ControlFlowHint, DxilEnum, InputPrimitive, InterpolationMode,
    MatrixOrientation, ParameterQualifier, PrimitiveTopology, ResourceClass, ResourceKind,
    SamplerKind, SemanticKind, ShaderKind, SignatureKind, TessellatorDomain,
    TessellatorOutputPrimitive, TessellatorPartitioning,
};
