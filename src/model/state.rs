//! Per-stage pipeline state and entry-point properties.

use bitflags::bitflags;

use crate::{
    ir::SymbolId,
    model::constants::{
        InputPrimitive, PrimitiveTopology, ShaderKind, TessellatorDomain,
        TessellatorOutputPrimitive, TessellatorPartitioning,
    },
};

bitflags! {
    /// Module-wide shader feature flags.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct ShaderFlags : u64 {
        /// Optimizations were disabled
        const DISABLE_OPTIMIZATIONS = 0x1;
        /// Math refactoring was disabled
        const DISABLE_MATH_REFACTORING = 0x2;
        /// Uses double precision
        const ENABLE_DOUBLE_PRECISION = 0x4;
        /// Forces early depth/stencil
        const FORCE_EARLY_DEPTH_STENCIL = 0x8;
        /// Uses raw and structured buffers
        const ENABLE_RAW_AND_STRUCTURED_BUFFERS = 0x10;
        /// Uses minimum precision types
        const ENABLE_MIN_PRECISION = 0x20;
        /// Uses double precision extensions
        const ENABLE_DOUBLE_EXTENSIONS = 0x40;
        /// Uses masked sum of absolute differences
        const ENABLE_MSAD = 0x80;
        /// All resources are bound for the duration of execution
        const ALL_RESOURCES_BOUND = 0x100;
    }
}

/// Geometry shader state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct GsState {
    /// Input primitive
    pub input_primitive: InputPrimitive,
    /// Maximum number of emitted vertices
    pub max_vertex_count: u32,
    /// Mask of active output streams
    pub active_stream_mask: u32,
    /// Output stream topology
    pub output_topology: PrimitiveTopology,
    /// Number of instances
    pub instance_count: u32,
}

/// Domain shader state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct DsState {
    /// Tessellator domain
    pub domain: TessellatorDomain,
    /// Number of input control points
    pub input_control_points: u32,
}

/// Hull shader state.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct HsState {
    /// Patch-constant function
    pub patch_constant_function: Option<SymbolId>,
    /// Number of input control points
    pub input_control_points: u32,
    /// Number of output control points
    pub output_control_points: u32,
    /// Tessellator domain
    pub domain: TessellatorDomain,
    /// Tessellator partitioning
    pub partitioning: TessellatorPartitioning,
    /// Tessellator output primitive
    pub output_primitive: TessellatorOutputPrimitive,
    /// Maximum tessellation factor
    pub max_tess_factor: f32,
}

/// Stage-specific state of an entry point.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum StageState {
    /// Geometry shader state
    Geometry(GsState),
    /// Domain shader state
    Domain(DsState),
    /// Hull shader state
    Hull(HsState),
}

impl StageState {
    /// Stage this state belongs to.
    #[must_use]
    pub fn shader_kind(&self) -> ShaderKind {
        match self {
            StageState::Geometry(_) => ShaderKind::Geometry,
            StageState::Domain(_) => ShaderKind::Domain,
            StageState::Hull(_) => ShaderKind::Hull,
        }
    }
}

/// Optional properties of an entry point.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct EntryProperties {
    /// Shader feature flags
    pub shader_flags: ShaderFlags,
    /// Geometry, domain or hull state
    pub stage: Option<StageState>,
    /// Compute thread-group size
    pub num_threads: Option<[u32; 3]>,
}

impl EntryProperties {
    /// Returns `true` if no property differs from its default.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shader_flags.is_empty() && self.stage.is_none() && self.num_threads.is_none()
    }
}
