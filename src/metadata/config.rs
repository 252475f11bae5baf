//! Codec configuration
//!
//! The structural checks of the record codec (arities, node shapes, scalar widths, tag lists) are
//! always on. The switches here only cover the passes that go beyond the tree shape.

/// Configuration of a [`crate::MetadataCodec`]
///
/// # Examples
///
/// ```rust
/// use dxilmd::CodecConfig;
///
/// let config = CodecConfig::structural();
/// assert!(!config.precise_bridge);
/// assert_eq!(CodecConfig::default(), CodecConfig::strict());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CodecConfig {
    /// Run the precise-marker pass in `emit_all` and `load_all`
    pub precise_bridge: bool,

    /// Reject shader models that are unknown or cannot be expressed in DXIL on load
    pub require_valid_shader_model: bool,

    /// Write the validator version entry in `emit_all`
    pub emit_validator_version: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            precise_bridge: true,
            require_valid_shader_model: true,
            emit_validator_version: true,
        }
    }
}

impl CodecConfig {
    /// Creates the full configuration with every pass enabled
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Creates a configuration that only transforms the tree shape
    ///
    /// Instructions are left untouched and any well-formed shader model name is accepted, which
    /// is what tooling that inspects foreign containers wants.
    #[must_use]
    pub fn structural() -> Self {
        Self {
            precise_bridge: false,
            require_valid_shader_model: false,
            emit_validator_version: true,
        }
    }
}
