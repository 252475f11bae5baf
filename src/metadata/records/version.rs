//! DXIL version, validator version and shader model entries.

use crate::{
    ir::NodeId,
    metadata::{
        codec::MetadataCodec,
        layout::{record_operands, shader_model, version, RecordKind},
        names::NamedEntry,
        registry,
        scalar::{from_node, string_from_node, string_to_node, to_node},
    },
    model::{ShaderKind, ShaderModel, Version},
    Result,
};

impl MetadataCodec<'_> {
    /// Writes the DXIL version entry.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry already exists.
    pub fn emit_dxil_version(&mut self, dxil_version: Version) -> Result<()> {
        let node = self.emit_version_tuple(dxil_version);
        registry::emit_once(self.container, NamedEntry::Version, node)
    }

    /// Reads the DXIL version entry.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry is missing or malformed.
    pub fn load_dxil_version(&self) -> Result<Version> {
        let node = registry::single_operand(self.container, NamedEntry::Version)?;
        self.load_version_tuple(node)
    }

    /// Writes the validator version entry, replacing an existing one.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the container rejects the entry.
    pub fn emit_validator_version(&mut self, validator_version: Version) -> Result<()> {
        let node = self.emit_version_tuple(validator_version);
        registry::replace(self.container, NamedEntry::ValidatorVersion, node)
    }

    /// Reads the validator version entry; 1.0 if the container has none.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry exists but is malformed.
    pub fn load_validator_version(&self) -> Result<Version> {
        match registry::optional_operand(self.container, NamedEntry::ValidatorVersion)? {
            Some(node) => self.load_version_tuple(node),
            None => Ok(Version::VALIDATOR_DEFAULT),
        }
    }

    /// Writes the shader model entry and binds the codec to `model`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry already exists or the model has no stage.
    pub fn emit_shader_model(&mut self, model: &ShaderModel) -> Result<()> {
        if model.kind == ShaderKind::Invalid {
            return Err(malformed_error!("Cannot emit shader model without a stage"));
        }

        let mut operands = vec![None; RecordKind::ShaderModel.arity()];
        operands[shader_model::KIND] = Some(string_to_node(self.container, model.kind.prefix()));
        operands[shader_model::MAJOR] = Some(to_node(self.container, model.major));
        operands[shader_model::MINOR] = Some(to_node(self.container, model.minor));
        let node = self.container.tuple(operands);
        registry::emit_once(self.container, NamedEntry::ShaderModel, node)?;

        self.shader_model = Some(*model);
        Ok(())
    }

    /// Reads the shader model entry and binds the codec to it.
    ///
    /// The model is looked up by its composed name (`<stage>_<major>_<minor>`). With
    /// `require_valid_shader_model` set, only models valid for DXIL are accepted; otherwise any
    /// known stage prefix is.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry is missing or malformed, or names an
    /// unknown shader model.
    pub fn load_shader_model(&mut self) -> Result<ShaderModel> {
        let model = {
            let node = registry::single_operand(self.container, NamedEntry::ShaderModel)?;
            let operands = record_operands(self.container, Some(node), RecordKind::ShaderModel)?;
            let prefix = string_from_node(self.container, operands[shader_model::KIND])?;
            let major = from_node::<u32>(self.container, operands[shader_model::MAJOR])?;
            let minor = from_node::<u32>(self.container, operands[shader_model::MINOR])?;
            let name = format!("{}_{}_{}", prefix, major, minor);

            let model = if self.config.require_valid_shader_model {
                ShaderModel::by_name(&name).filter(ShaderModel::is_valid_for_dxil)
            } else {
                ShaderKind::from_prefix(&prefix).map(|kind| ShaderModel::new(kind, major, minor))
            };
            model.ok_or_else(|| malformed_error!("Unknown shader model '{}'", name))?
        };

        self.shader_model = Some(model);
        Ok(model)
    }

    fn emit_version_tuple(&mut self, value: Version) -> NodeId {
        let mut operands = vec![None; RecordKind::Version.arity()];
        operands[version::MAJOR] = Some(to_node(self.container, value.major));
        operands[version::MINOR] = Some(to_node(self.container, value.minor));
        self.container.tuple(operands)
    }

    fn load_version_tuple(&self, node: NodeId) -> Result<Version> {
        let operands = record_operands(self.container, Some(node), RecordKind::Version)?;
        Ok(Version::new(
            from_node(self.container, operands[version::MAJOR])?,
            from_node(self.container, operands[version::MINOR])?,
        ))
    }
}
