//! Field positions and arities of every record tuple.
//!
//! Emit and load both index tuples through the constants below, and every load validates
//! operand counts through [`record_operands`], so the two directions cannot drift apart.
//!
//! Records with a sparse tag-value list always reserve a trailing slot for it (null when no
//! optional field differs from its default): their tuple length is `core arity + 1`.

use strum::{EnumCount, EnumIter, IntoStaticStr};

use crate::{
    ir::{Container, NodeId},
    metadata::scalar::tuple_operands,
    Result,
};

/// Every fixed-shape record kind of the format.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount, IntoStaticStr)]
pub enum RecordKind {
    /// `[major, minor]` of the DXIL or validator version
    Version,
    /// `[kind name, major, minor]`
    ShaderModel,
    /// `[function, name, signatures, resources, properties]`
    EntryPoint,
    /// `[input, output, patch constant]`
    Signatures,
    /// A signature element
    SignatureElement,
    /// `[srvs, uavs, cbuffers, samplers]`
    ResourceLists,
    /// Shader resource view
    Srv,
    /// Unordered access view
    Uav,
    /// Constant buffer
    CBuffer,
    /// Sampler
    Sampler,
    /// `[class, resource]`
    ResourceAttribute,
    /// Geometry shader state
    GsState,
    /// Domain shader state
    DsState,
    /// Hull shader state
    HsState,
    /// `[x, y, z]` thread-group size
    NumThreads,
    /// `[rows, cols, orientation]`
    MatrixAnnotation,
    /// `[qualifier, field annotation, semantic indices]`
    ParameterAnnotation,
    /// `[root signature bytes]`
    RootSignature,
    /// `[view-id state words]`
    ViewIdState,
    /// `[i32 1]`
    PreciseMarker,
}

impl RecordKind {
    /// Number of mandatory core fields.
    #[must_use]
    pub const fn core_arity(self) -> usize {
        match self {
            RecordKind::Version => 2,
            RecordKind::ShaderModel => 3,
            RecordKind::EntryPoint => 5,
            RecordKind::Signatures => 3,
            RecordKind::SignatureElement => 10,
            RecordKind::ResourceLists => 4,
            RecordKind::Srv => resource_base::ARITY + 2,
            RecordKind::Uav => resource_base::ARITY + 4,
            RecordKind::CBuffer => resource_base::ARITY + 1,
            RecordKind::Sampler => resource_base::ARITY + 1,
            RecordKind::ResourceAttribute => 2,
            RecordKind::GsState => 5,
            RecordKind::DsState => 2,
            RecordKind::HsState => 7,
            RecordKind::NumThreads => 3,
            RecordKind::MatrixAnnotation => 3,
            RecordKind::ParameterAnnotation => 3,
            RecordKind::RootSignature => 1,
            RecordKind::ViewIdState => 1,
            RecordKind::PreciseMarker => 1,
        }
    }

    /// Returns `true` if the record ends with a sparse tag-value list slot.
    #[must_use]
    pub const fn has_sparse_list(self) -> bool {
        matches!(
            self,
            RecordKind::SignatureElement
                | RecordKind::Srv
                | RecordKind::Uav
                | RecordKind::CBuffer
                | RecordKind::Sampler
        )
    }

    /// Total tuple length: core fields plus the sparse list slot, if any.
    #[must_use]
    pub const fn arity(self) -> usize {
        self.core_arity() + if self.has_sparse_list() { 1 } else { 0 }
    }

    /// Human readable record name, used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Operands of the `kind` tuple at `node`, after checking its exact arity.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `node` is null, not a tuple, or has another length.
pub fn record_operands(
    container: &Container,
    node: Option<NodeId>,
    kind: RecordKind,
) -> Result<&[Option<NodeId>]> {
    let operands = tuple_operands(container, node)?;
    if operands.len() != kind.arity() {
        return Err(malformed_error!(
            "{} record has {} operands, expected {}",
            kind.name(),
            operands.len(),
            kind.arity()
        ));
    }
    Ok(operands)
}

/// Version pair fields.
pub mod version {
    /// Major version, u32
    pub const MAJOR: usize = 0;
    /// Minor version, u32
    pub const MINOR: usize = 1;
}

/// Shader model fields.
pub mod shader_model {
    /// Stage prefix, string
    pub const KIND: usize = 0;
    /// Major version, u32
    pub const MAJOR: usize = 1;
    /// Minor version, u32
    pub const MINOR: usize = 2;
}

/// Entry point fields.
pub mod entry_point {
    /// Entry function, value or null
    pub const FUNCTION: usize = 0;
    /// Entry name, string
    pub const NAME: usize = 1;
    /// Signatures tuple or null
    pub const SIGNATURES: usize = 2;
    /// Resource lists tuple or null
    pub const RESOURCES: usize = 3;
    /// Entry property tag-value list or null
    pub const PROPERTIES: usize = 4;
}

/// Signatures tuple fields; each is a list of elements or null when empty.
pub mod signatures {
    /// Input signature
    pub const INPUT: usize = 0;
    /// Output signature
    pub const OUTPUT: usize = 1;
    /// Patch-constant signature
    pub const PATCH_CONSTANT: usize = 2;
}

/// Signature element fields.
pub mod signature_element {
    /// Element id, u32
    pub const ID: usize = 0;
    /// Semantic name, string
    pub const NAME: usize = 1;
    /// Component type, u8
    pub const COMPONENT_TYPE: usize = 2;
    /// Semantic kind, u8
    pub const SEMANTIC_KIND: usize = 3;
    /// Semantic indices, tuple of u32
    pub const SEMANTIC_INDICES: usize = 4;
    /// Interpolation mode, u8
    pub const INTERPOLATION: usize = 5;
    /// Rows, u32
    pub const ROWS: usize = 6;
    /// Columns, u8
    pub const COLS: usize = 7;
    /// Start row, i32
    pub const START_ROW: usize = 8;
    /// Start column, i8
    pub const START_COL: usize = 9;
    /// Tag-value list or null
    pub const NAME_VALUE_LIST: usize = 10;
}

/// Resource lists fields; each is a list of records or null when empty.
pub mod resources {
    /// Shader resource views
    pub const SRVS: usize = 0;
    /// Unordered access views
    pub const UAVS: usize = 1;
    /// Constant buffers
    pub const CBUFFERS: usize = 2;
    /// Samplers
    pub const SAMPLERS: usize = 3;
}

/// Fields shared by every resource record.
pub mod resource_base {
    /// Resource id, u32
    pub const ID: usize = 0;
    /// Global variable, value or null
    pub const GLOBAL_SYMBOL: usize = 1;
    /// Global name, string
    pub const NAME: usize = 2;
    /// Register space, u32
    pub const SPACE: usize = 3;
    /// Lower bound, u32
    pub const LOWER_BOUND: usize = 4;
    /// Range size, u32
    pub const RANGE_SIZE: usize = 5;
    /// Number of shared fields
    pub const ARITY: usize = 6;
}

/// SRV fields after the base.
pub mod srv {
    /// Resource shape, u32
    pub const SHAPE: usize = 6;
    /// Sample count, u32
    pub const SAMPLE_COUNT: usize = 7;
    /// Tag-value list or null
    pub const NAME_VALUE_LIST: usize = 8;
}

/// UAV fields after the base.
pub mod uav {
    /// Resource shape, u32
    pub const SHAPE: usize = 6;
    /// Globally coherent, bool
    pub const GLOBALLY_COHERENT: usize = 7;
    /// Has counter, bool
    pub const HAS_COUNTER: usize = 8;
    /// Rasterizer ordered, bool
    pub const ROV: usize = 9;
    /// Tag-value list or null
    pub const NAME_VALUE_LIST: usize = 10;
}

/// Constant buffer fields after the base.
pub mod cbuffer {
    /// Size in bytes, u32
    pub const SIZE: usize = 6;
    /// Tag-value list or null
    pub const NAME_VALUE_LIST: usize = 7;
}

/// Sampler fields after the base.
pub mod sampler {
    /// Sampler kind, u32
    pub const SAMPLER_KIND: usize = 6;
    /// Tag-value list or null
    pub const NAME_VALUE_LIST: usize = 7;
}

/// Resource attribute fields.
pub mod resource_attribute {
    /// Resource class discriminant, u32
    pub const CLASS: usize = 0;
    /// Class-specific resource record
    pub const RESOURCE: usize = 1;
}

/// Geometry shader state fields, all u32.
pub mod gs_state {
    /// Input primitive
    pub const INPUT_PRIMITIVE: usize = 0;
    /// Maximum vertex count
    pub const MAX_VERTEX_COUNT: usize = 1;
    /// Active stream mask
    pub const ACTIVE_STREAM_MASK: usize = 2;
    /// Output stream topology
    pub const OUTPUT_TOPOLOGY: usize = 3;
    /// Instance count
    pub const INSTANCE_COUNT: usize = 4;
}

/// Domain shader state fields, all u32.
pub mod ds_state {
    /// Tessellator domain
    pub const DOMAIN: usize = 0;
    /// Input control point count
    pub const INPUT_CONTROL_POINTS: usize = 1;
}

/// Hull shader state fields.
pub mod hs_state {
    /// Patch-constant function, value or null
    pub const PATCH_CONSTANT_FUNCTION: usize = 0;
    /// Input control point count, u32
    pub const INPUT_CONTROL_POINTS: usize = 1;
    /// Output control point count, u32
    pub const OUTPUT_CONTROL_POINTS: usize = 2;
    /// Tessellator domain, u32
    pub const DOMAIN: usize = 3;
    /// Tessellator partitioning, u32
    pub const PARTITIONING: usize = 4;
    /// Tessellator output primitive, u32
    pub const OUTPUT_PRIMITIVE: usize = 5;
    /// Maximum tessellation factor, f32
    pub const MAX_TESS_FACTOR: usize = 6;
}

/// Type annotation entry layout: `[tag, (key, annotation)*]`.
pub mod type_annotations {
    /// Discriminator slot
    pub const TAG: usize = 0;
    /// First key slot; annotations follow their key
    pub const FIRST_PAIR: usize = 1;
    /// Discriminator of the struct annotation tuple
    pub const STRUCT_TAG: u32 = 0;
    /// Discriminator of the function annotation tuple
    pub const FUNCTION_TAG: u32 = 1;
    /// Maximum number of operands of the named entry
    pub const MAX_OPERANDS: usize = 2;
}

/// Struct annotation layout: `[cbuffer size, field annotation*]`.
pub mod struct_annotation {
    /// CBuffer size in bytes, u32
    pub const CBUFFER_SIZE: usize = 0;
    /// First field annotation
    pub const FIRST_FIELD: usize = 1;
}

/// Function annotation layout: `[return annotation, parameter annotation*]`.
pub mod function_annotation {
    /// Return value annotation
    pub const RETURN: usize = 0;
    /// First parameter annotation
    pub const FIRST_PARAMETER: usize = 1;
}

/// Parameter annotation fields.
pub mod parameter_annotation {
    /// Input/output qualifier, u32
    pub const QUALIFIER: usize = 0;
    /// Field annotation tag-value list
    pub const FIELD: usize = 1;
    /// Semantic indices, tuple of u32
    pub const SEMANTIC_INDICES: usize = 2;
}

/// Matrix annotation fields, all u32.
pub mod matrix_annotation {
    /// Rows
    pub const ROWS: usize = 0;
    /// Columns
    pub const COLS: usize = 1;
    /// Orientation
    pub const ORIENTATION: usize = 2;
}

/// Control-flow hint tuple layout: `[self, marker, hint*]`.
pub mod control_flow_hints {
    /// Self reference
    pub const SELF: usize = 0;
    /// Marker string
    pub const MARKER: usize = 1;
    /// First hint code, u32
    pub const FIRST_HINT: usize = 2;
}

/// Blob tuple layout.
pub mod blob {
    /// Dense data array
    pub const DATA: usize = 0;
}

/// Tags of every sparse tag-value list.
pub mod tags {
    /// Resource element type of typed SRV/UAVs, u32 component type
    pub const TYPED_BUFFER_ELEMENT_TYPE: u32 = 0;
    /// Element stride of structured SRV/UAVs, u32
    pub const STRUCTURED_BUFFER_ELEMENT_STRIDE: u32 = 1;
    /// Texture buffer marker of constant buffers, bool
    pub const CBUFFER_IS_TBUFFER: u32 = 100;

    /// Geometry shader output stream of a signature element, u32
    pub const SIGNATURE_OUTPUT_STREAM: u32 = 0;
    /// High-level global symbol of a signature element; read and discarded
    pub const SIGNATURE_GLOBAL_SYMBOL: u32 = 1;
    /// Dynamically indexed component mask of a signature element, u32
    pub const SIGNATURE_DYNAMIC_INDEX_MASK: u32 = 2;

    /// Matrix shape of a field, tuple of 3 u32
    pub const FIELD_MATRIX: u32 = 2;
    /// CBuffer byte offset of a field, u32
    pub const FIELD_CBUFFER_OFFSET: u32 = 3;
    /// Semantic of a field, string
    pub const FIELD_SEMANTIC: u32 = 4;
    /// Interpolation mode of a field, u32
    pub const FIELD_INTERPOLATION: u32 = 5;
    /// Source name of a field, string
    pub const FIELD_NAME: u32 = 6;
    /// Component type of a field, u32
    pub const FIELD_COMPONENT_TYPE: u32 = 7;
    /// Precise flag of a field, bool
    pub const FIELD_PRECISE: u32 = 8;

    /// Shader flags of an entry point, u64
    pub const ENTRY_SHADER_FLAGS: u32 = 0;
    /// Geometry shader state of an entry point
    pub const ENTRY_GS_STATE: u32 = 1;
    /// Domain shader state of an entry point
    pub const ENTRY_DS_STATE: u32 = 2;
    /// Hull shader state of an entry point
    pub const ENTRY_HS_STATE: u32 = 3;
    /// Thread-group size of a compute entry point
    pub const ENTRY_NUM_THREADS: u32 = 4;
}
