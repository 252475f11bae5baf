//! Typed DXIL objects.
//!
//! These are plain data types with public fields. The codec reads every persisted field from
//! them on emit and writes every field back on load; derived values (register packing, root
//! signature layout, view-id dependency computation) are out of their scope.
//!
//! # Key Components
//!
//! - [`constants`] - Enumerations and [`DxilEnum`], their persisted codes
//! - [`shadermodel`] - [`ShaderModel`]
//! - [`signature`] - Signature elements and entry signatures
//! - [`resource`] - SRV/UAV, constant buffer and sampler bindings, [`ResourceRecord`]
//! - [`typesystem`] - Struct, function, parameter and field annotations
//! - [`state`] - Geometry/domain/hull state, shader flags and entry properties
//! - [`blobs`] - Root signature and view-id state buffers
//! - [`module`] - [`ShaderModule`], the aggregate

pub mod blobs;
pub mod constants;
pub mod module;
pub mod resource;
pub mod shadermodel;
pub mod signature;
pub mod state;
pub mod typesystem;

pub use blobs::{RootSignature, ViewIdState};
pub use constants::{
    ComponentType, ControlFlowHint, DxilEnum, InputPrimitive, InterpolationMode,
    MatrixOrientation, ParameterQualifier, PrimitiveTopology, ResourceClass, ResourceKind,
    SamplerKind, SemanticKind, ShaderKind, SignatureKind, TessellatorDomain,
    TessellatorOutputPrimitive, TessellatorPartitioning,
};
pub use module::{EntryPoint, ShaderModule, Version};
pub use resource::{CBuffer, Resource, ResourceBase, ResourceLists, ResourceRecord, Sampler};
pub use shadermodel::ShaderModel;
pub use signature::{EntrySignatures, Signature, SignatureElement};
pub use state::{DsState, EntryProperties, GsState, HsState, ShaderFlags, StageState};
pub use typesystem::{
    FieldAnnotation, FunctionAnnotation, MatrixAnnotation, ParameterAnnotation, StructAnnotation,
    TypeSystem,
};
