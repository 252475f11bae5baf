//! Persisted keys of named top-level entries and instruction attachments.

use strum::{EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// A named top-level metadata entry.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount, EnumString, IntoStaticStr,
)]
pub enum NamedEntry {
    /// DXIL version, exactly one operand
    #[strum(serialize = "dx.version")]
    Version,
    /// Validator version, zero or one operand (replaceable)
    #[strum(serialize = "dx.valver")]
    ValidatorVersion,
    /// Shader model, exactly one operand
    #[strum(serialize = "dx.shaderModel")]
    ShaderModel,
    /// Entry points, exactly one operand
    #[strum(serialize = "dx.entryPoints")]
    EntryPoints,
    /// Resource lists, zero or one operand
    #[strum(serialize = "dx.resources")]
    Resources,
    /// Type annotations, zero to two operands
    #[strum(serialize = "dx.typeAnnotations")]
    TypeAnnotations,
    /// Root signature blob, zero or one operand
    #[strum(serialize = "dx.rootSignature")]
    RootSignature,
    /// View-id state blob, zero or one operand
    #[strum(serialize = "dx.viewIdState")]
    ViewIdState,
}

impl NamedEntry {
    /// Persisted key of this entry.
    #[must_use]
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Entry stored under `key`, if it is one of ours.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        key.parse().ok()
    }
}

/// Attachment key and marker string of control-flow hint tuples.
pub const CONTROL_FLOW_HINTS: &str = "dx.controlflow.hints";

/// Attachment key of the precise marker on floating point instructions.
pub const PRECISE: &str = "dx.precise";

/// Attachment key of resource attribute tuples.
pub const RESOURCE_ATTRIBUTE: &str = "dx.hl.resource.attribute";

/// Returns `true` if `name` is a named entry the module metadata owns.
///
/// The root signature is not part of this set.
#[must_use]
pub fn is_known_named_metadata(name: &str) -> bool {
    NamedEntry::iter()
        .filter(|entry| *entry != NamedEntry::RootSignature)
        .any(|entry| entry.key() == name)
}
