//! DXIL enumerations and their persisted codes.
//!
//! Every enum here is stored in the metadata as an integer code. [`DxilEnum`] is the single
//! conversion point: [`DxilEnum::code`] on emit, [`DxilEnum::from_code`] on load, where an
//! out-of-range code is a decode failure rather than a silent `Invalid`.

use strum::{EnumCount, EnumIter, FromRepr, IntoStaticStr};

/// An enumeration persisted as an integer code.
pub trait DxilEnum: Sized + Copy {
    /// Type name used in error messages.
    const NAME: &'static str;

    /// Persisted code of this value.
    fn code(self) -> u32;

    /// Value stored under `code`, if any.
    fn from_code(code: u32) -> Option<Self>;
}

macro_rules! impl_dxil_enum {
    ($ty:ident, $repr:ty) => {
        impl DxilEnum for $ty {
            const NAME: &'static str = stringify!($ty);

            fn code(self) -> u32 {
                u32::from(self as $repr)
            }

            fn from_code(code: u32) -> Option<Self> {
                <$repr>::try_from(code).ok().and_then(Self::from_repr)
            }
        }
    };
}

/// Element component type.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, FromRepr, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u8)]
pub enum ComponentType {
    #[default]
    Invalid = 0,
    I1,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F16,
    F32,
    F64,
    SNormF16,
    UNormF16,
    SNormF32,
    UNormF32,
    SNormF64,
    UNormF64,
}
impl_dxil_enum!(ComponentType, u8);

/// Interpolation mode of a signature element.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, FromRepr, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u8)]
pub enum InterpolationMode {
    #[default]
    Undefined = 0,
    Constant,
    Linear,
    LinearCentroid,
    LinearNoperspective,
    LinearNoperspectiveCentroid,
    LinearSample,
    LinearNoperspectiveSample,
    Invalid,
}
impl_dxil_enum!(InterpolationMode, u8);

/// System-value semantic of a signature element.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, FromRepr, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u8)]
pub enum SemanticKind {
    #[default]
    Arbitrary = 0,
    VertexID,
    InstanceID,
    Position,
    RenderTargetArrayIndex,
    ViewPortArrayIndex,
    ClipDistance,
    CullDistance,
    OutputControlPointID,
    DomainLocation,
    PrimitiveID,
    GSInstanceID,
    SampleIndex,
    IsFrontFace,
    Coverage,
    InnerCoverage,
    Target,
    Depth,
    DepthLessEqual,
    DepthGreaterEqual,
    StencilRef,
    DispatchThreadID,
    GroupID,
    GroupIndex,
    GroupThreadID,
    TessFactor,
    InsideTessFactor,
    ViewID,
    Barycentrics,
    Invalid,
}
impl_dxil_enum!(SemanticKind, u8);

/// Which signature of an entry point.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, FromRepr, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u8)]
pub enum SignatureKind {
    #[default]
    Invalid = 0,
    Input,
    Output,
    PatchConstant,
}
impl_dxil_enum!(SignatureKind, u8);

/// Pipeline stage.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, FromRepr, EnumIter, EnumCount, IntoStaticStr)]
#[repr(u8)]
pub enum ShaderKind {
    Pixel = 0,
    Vertex,
    Geometry,
    Hull,
    Domain,
    Compute,
    Invalid,
}
impl_dxil_enum!(ShaderKind, u8);

impl ShaderKind {
    /// Two-letter prefix used in shader model names (`ps`, `vs`, ...). Empty for `Invalid`.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            ShaderKind::Pixel => "ps",
            ShaderKind::Vertex => "vs",
            ShaderKind::Geometry => "gs",
            ShaderKind::Hull => "hs",
            ShaderKind::Domain => "ds",
            ShaderKind::Compute => "cs",
            ShaderKind::Invalid => "",
        }
    }

    /// Stage named by a shader model prefix.
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "ps" => Some(ShaderKind::Pixel),
            "vs" => Some(ShaderKind::Vertex),
            "gs" => Some(ShaderKind::Geometry),
            "hs" => Some(ShaderKind::Hull),
            "ds" => Some(ShaderKind::Domain),
            "cs" => Some(ShaderKind::Compute),
            _ => None,
        }
    }
}

/// Resource class, the discriminant of a resource record.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, FromRepr, EnumIter, EnumCount, IntoStaticStr)]
#[repr(u32)]
pub enum ResourceClass {
    SRV = 0,
    UAV,
    CBuffer,
    Sampler,
    Invalid,
}
impl_dxil_enum!(ResourceClass, u32);

/// Resource shape.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, FromRepr, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u32)]
pub enum ResourceKind {
    #[default]
    Invalid = 0,
    Texture1D,
    Texture2D,
    Texture2DMS,
    Texture3D,
    TextureCube,
    Texture1DArray,
    Texture2DArray,
    Texture2DMSArray,
    TextureCubeArray,
    TypedBuffer,
    RawBuffer,
    StructuredBuffer,
    CBuffer,
    Sampler,
    TBuffer,
}
impl_dxil_enum!(ResourceKind, u32);

/// Sampler flavour.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, FromRepr, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u32)]
pub enum SamplerKind {
    #[default]
    Default = 0,
    Comparison,
    Mono,
    Invalid,
}
impl_dxil_enum!(SamplerKind, u32);

/// Geometry shader input primitive.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, FromRepr, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u32)]
pub enum InputPrimitive {
    #[default]
    Undefined = 0,
    Point = 1,
    Line = 2,
    Triangle = 3,
    Reserved4 = 4,
    Reserved5 = 5,
    LineWithAdjacency = 6,
    TriangleWithAdjacency = 7,
    ControlPointPatch1 = 8,
    ControlPointPatch2,
    ControlPointPatch3,
    ControlPointPatch4,
    ControlPointPatch5,
    ControlPointPatch6,
    ControlPointPatch7,
    ControlPointPatch8,
    ControlPointPatch9,
    ControlPointPatch10,
    ControlPointPatch11,
    ControlPointPatch12,
    ControlPointPatch13,
    ControlPointPatch14,
    ControlPointPatch15,
    ControlPointPatch16,
    ControlPointPatch17,
    ControlPointPatch18,
    ControlPointPatch19,
    ControlPointPatch20,
    ControlPointPatch21,
    ControlPointPatch22,
    ControlPointPatch23,
    ControlPointPatch24,
    ControlPointPatch25,
    ControlPointPatch26,
    ControlPointPatch27,
    ControlPointPatch28,
    ControlPointPatch29,
    ControlPointPatch30,
    ControlPointPatch31,
    ControlPointPatch32,
}
impl_dxil_enum!(InputPrimitive, u32);

/// Geometry shader output stream topology.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, FromRepr, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u32)]
pub enum PrimitiveTopology {
    #[default]
    Undefined = 0,
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
}
impl_dxil_enum!(PrimitiveTopology, u32);

/// Tessellator domain.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, FromRepr, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u32)]
pub enum TessellatorDomain {
    #[default]
    Undefined = 0,
    IsoLine,
    Tri,
    Quad,
}
impl_dxil_enum!(TessellatorDomain, u32);

/// Tessellator partitioning.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, FromRepr, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u32)]
pub enum TessellatorPartitioning {
    #[default]
    Undefined = 0,
    Integer,
    Pow2,
    FractionalOdd,
    FractionalEven,
}
impl_dxil_enum!(TessellatorPartitioning, u32);

/// Tessellator output primitive.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, FromRepr, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u32)]
pub enum TessellatorOutputPrimitive {
    #[default]
    Undefined = 0,
    Point,
    Line,
    TriangleCW,
    TriangleCCW,
}
impl_dxil_enum!(TessellatorOutputPrimitive, u32);

/// Branch and loop hint codes.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, FromRepr, EnumIter, EnumCount, IntoStaticStr)]
#[repr(u32)]
pub enum ControlFlowHint {
    Undefined = 0,
    Branch,
    Flatten,
    FastOpt,
    AllowUavCondition,
    ForceCase,
    Call,
}
impl_dxil_enum!(ControlFlowHint, u32);

/// Input/output qualifier of a function parameter.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, FromRepr, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u32)]
pub enum ParameterQualifier {
    #[default]
    In = 0,
    Out,
    Inout,
    InputPatch,
    OutputPatch,
    OutStream0,
    OutStream1,
    OutStream2,
    OutStream3,
    InputPrimitive,
}
impl_dxil_enum!(ParameterQualifier, u32);

/// Storage order of a matrix field.
#[allow(missing_docs)]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, FromRepr, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u32)]
pub enum MatrixOrientation {
    #[default]
    Undefined = 0,
    RowMajor,
    ColumnMajor,
}
impl_dxil_enum!(MatrixOrientation, u32);
