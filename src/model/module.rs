//! The aggregate shader module the codec emits and loads.

use std::fmt;

use crate::{
    ir::SymbolId,
    model::{
        blobs::{RootSignature, ViewIdState},
        resource::ResourceLists,
        shadermodel::ShaderModel,
        signature::EntrySignatures,
        state::EntryProperties,
        typesystem::TypeSystem,
    },
};

/// A `major.minor` version pair.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
}

impl Version {
    /// The DXIL version written by this crate.
    pub const DXIL_CURRENT: Version = Version::new(1, 1);

    /// Validator version assumed when a container does not record one.
    pub const VALIDATOR_DEFAULT: Version = Version::new(1, 0);

    /// Creates a version pair.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Version { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The entry point of a module.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct EntryPoint {
    /// Entry function; `None` for library-style entries without a body
    pub function: Option<SymbolId>,
    /// Entry point name
    pub name: String,
    /// Input, output and patch-constant signatures
    pub signatures: EntrySignatures,
    /// Shader flags, stage state and thread-group size
    pub properties: EntryProperties,
}

/// Everything the metadata tree describes about one shader.
#[derive(Clone, PartialEq, Debug)]
pub struct ShaderModule {
    /// DXIL version
    pub dxil_version: Version,
    /// Validator version
    pub validator_version: Version,
    /// Shader model
    pub shader_model: ShaderModel,
    /// The single entry point
    pub entry: EntryPoint,
    /// Resource bindings
    pub resources: ResourceLists,
    /// Struct and function annotations
    pub type_system: TypeSystem,
    /// Root signature, empty if none
    pub root_signature: RootSignature,
    /// View-id dependency state, zero if none
    pub view_id_state: ViewIdState,
}

impl ShaderModule {
    /// Creates a module for `shader_model` with current versions and nothing else.
    #[must_use]
    pub fn new(shader_model: ShaderModel) -> Self {
        ShaderModule {
            dxil_version: Version::DXIL_CURRENT,
            validator_version: Version::VALIDATOR_DEFAULT,
            shader_model,
            entry: EntryPoint::default(),
            resources: ResourceLists::default(),
            type_system: TypeSystem::default(),
            root_signature: RootSignature::default(),
            view_id_state: ViewIdState::default(),
        }
    }
}
