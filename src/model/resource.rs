//! Resource bindings: SRVs, UAVs, constant buffers and samplers.

use crate::{
    ir::SymbolId,
    model::constants::{ComponentType, ResourceClass, ResourceKind, SamplerKind},
};

/// Fields shared by every resource class.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ResourceBase {
    /// Resource class; fixed by the record kind the base belongs to
    pub class: ResourceClass,
    /// Resource shape
    pub kind: ResourceKind,
    /// Resource id, unique within its class
    pub id: u32,
    /// The global variable backing the binding, if any
    pub global_symbol: Option<SymbolId>,
    /// Name of the global variable
    pub global_name: String,
    /// Register space
    pub space: u32,
    /// First register of the range
    pub lower_bound: u32,
    /// Number of registers, `u32::MAX` for unbounded
    pub range_size: u32,
}

impl ResourceBase {
    /// Creates a base for `class` with the given shape, bound to register 0 of space 0.
    #[must_use]
    pub fn new(class: ResourceClass, kind: ResourceKind) -> Self {
        ResourceBase {
            class,
            kind,
            id: 0,
            global_symbol: None,
            global_name: String::new(),
            space: 0,
            lower_bound: 0,
            range_size: 1,
        }
    }

    /// Returns `true` if the range has no upper bound.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.range_size == u32::MAX
    }
}

/// A shader resource view or unordered access view.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Resource {
    /// Shared binding fields; `class` is SRV or UAV
    pub base: ResourceBase,
    /// Sample count of multisampled textures (SRV only)
    pub sample_count: u32,
    /// Globally coherent (UAV only)
    pub globally_coherent: bool,
    /// Has a hidden counter (UAV only)
    pub has_counter: bool,
    /// Rasterizer ordered view (UAV only)
    pub rov: bool,
    /// Element stride of structured buffers (optional field)
    pub element_stride: u32,
    /// Element type of typed resources (optional field)
    pub component_type: ComponentType,
}

impl Resource {
    /// Creates an SRV of the given shape with default optional fields.
    #[must_use]
    pub fn srv(kind: ResourceKind) -> Self {
        Self::with_class(ResourceClass::SRV, kind)
    }

    /// Creates a UAV of the given shape with default optional fields.
    #[must_use]
    pub fn uav(kind: ResourceKind) -> Self {
        Self::with_class(ResourceClass::UAV, kind)
    }

    fn with_class(class: ResourceClass, kind: ResourceKind) -> Self {
        let mut resource = Resource {
            base: ResourceBase::new(class, kind),
            sample_count: 0,
            globally_coherent: false,
            has_counter: false,
            rov: false,
            element_stride: 0,
            component_type: ComponentType::Invalid,
        };
        resource.reset_optional_fields();
        resource
    }

    /// Returns `true` for structured buffers.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        self.base.kind == ResourceKind::StructuredBuffer
    }

    /// Returns `true` for raw (byte address) buffers.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.base.kind == ResourceKind::RawBuffer
    }

    /// Returns `true` for textures and typed buffers, which carry an element type.
    #[must_use]
    pub fn is_typed(&self) -> bool {
        !self.is_structured() && !self.is_raw()
    }

    /// Restores the optional fields to the defaults for this resource's shape: a stride of 1
    /// for raw buffers and 4 otherwise, and no element type.
    pub fn reset_optional_fields(&mut self) {
        self.element_stride = if self.is_raw() { 1 } else { 4 };
        self.component_type = ComponentType::Invalid;
    }
}

/// A constant buffer or texture buffer.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CBuffer {
    /// Shared binding fields; `kind` is CBuffer or TBuffer
    pub base: ResourceBase,
    /// Size in bytes
    pub size: u32,
}

impl CBuffer {
    /// Creates an empty constant buffer.
    #[must_use]
    pub fn new() -> Self {
        CBuffer {
            base: ResourceBase::new(ResourceClass::CBuffer, ResourceKind::CBuffer),
            size: 0,
        }
    }

    /// Returns `true` if this buffer is a texture buffer.
    #[must_use]
    pub fn is_tbuffer(&self) -> bool {
        self.base.kind == ResourceKind::TBuffer
    }
}

impl Default for CBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// A sampler.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Sampler {
    /// Shared binding fields
    pub base: ResourceBase,
    /// Sampler flavour
    pub sampler_kind: SamplerKind,
}

impl Sampler {
    /// Creates a default sampler.
    #[must_use]
    pub fn new() -> Self {
        Sampler {
            base: ResourceBase::new(ResourceClass::Sampler, ResourceKind::Sampler),
            sampler_kind: SamplerKind::Default,
        }
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

/// All resources bound by a module, per class.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ResourceLists {
    /// Shader resource views
    pub srvs: Vec<Resource>,
    /// Unordered access views
    pub uavs: Vec<Resource>,
    /// Constant buffers
    pub cbuffers: Vec<CBuffer>,
    /// Samplers
    pub samplers: Vec<Sampler>,
}

impl ResourceLists {
    /// Returns `true` if no resource of any class is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.srvs.is_empty()
            && self.uavs.is_empty()
            && self.cbuffers.is_empty()
            && self.samplers.is_empty()
    }
}

/// A resource of any class, selected by its [`ResourceClass`] discriminant.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ResourceRecord {
    /// Shader resource view
    Srv(Resource),
    /// Unordered access view
    Uav(Resource),
    /// Constant or texture buffer
    CBuffer(CBuffer),
    /// Sampler
    Sampler(Sampler),
}

impl ResourceRecord {
    /// Discriminant of this record.
    #[must_use]
    pub fn class(&self) -> ResourceClass {
        match self {
            ResourceRecord::Srv(_) => ResourceClass::SRV,
            ResourceRecord::Uav(_) => ResourceClass::UAV,
            ResourceRecord::CBuffer(_) => ResourceClass::CBuffer,
            ResourceRecord::Sampler(_) => ResourceClass::Sampler,
        }
    }

    /// Shared binding fields of this record.
    #[must_use]
    pub fn base(&self) -> &ResourceBase {
        match self {
            ResourceRecord::Srv(resource) | ResourceRecord::Uav(resource) => &resource.base,
            ResourceRecord::CBuffer(cbuffer) => &cbuffer.base,
            ResourceRecord::Sampler(sampler) => &sampler.base,
        }
    }
}
