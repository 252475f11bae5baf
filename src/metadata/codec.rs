//! The metadata codec bound to one container.
//!
//! [`MetadataCodec`] owns nothing but a mutable borrow of the [`Container`], the shader model of
//! the module being processed, an [`ExtraProperties`] strategy and a [`CodecConfig`]. Per-record
//! emit/load operations live in [`crate::metadata::records`]; this module holds the binding and
//! the two whole-module passes, [`MetadataCodec::emit_all`] and [`MetadataCodec::load_all`].
//!
//! A codec is used either for emitting or for loading a container, never both at once.
//!
//! # Examples
//!
//! ```rust
//! use dxilmd::prelude::*;
//!
//! let mut container = Container::new();
//! let main = container.add_function("main", Vec::new(), ElementType::Void);
//!
//! let mut module = ShaderModule::new(ShaderModel::new(ShaderKind::Compute, 6, 0));
//! module.entry.function = Some(main);
//! module.entry.name = "main".to_string();
//! module.entry.properties.num_threads = Some([8, 8, 1]);
//!
//! MetadataCodec::new(&mut container).emit_all(&module)?;
//! let loaded = MetadataCodec::new(&mut container).load_all()?;
//! assert_eq!(loaded, module);
//! # Ok::<(), dxilmd::Error>(())
//! ```

use tracing::debug;

use crate::{
    ir::Container,
    metadata::{
        config::CodecConfig,
        names::NamedEntry,
        properties::{DefaultProperties, ExtraProperties},
        registry,
    },
    model::{EntryPoint, ShaderModel, ShaderModule},
    Result,
};

/// Emits a [`ShaderModule`] into a container's metadata tree, or loads one back.
pub struct MetadataCodec<'a> {
    pub(crate) container: &'a mut Container,
    pub(crate) shader_model: Option<ShaderModel>,
    pub(crate) properties: Box<dyn ExtraProperties>,
    pub(crate) config: CodecConfig,
}

impl<'a> MetadataCodec<'a> {
    /// Binds a codec using [`DefaultProperties`] and the default configuration to `container`.
    pub fn new(container: &'a mut Container) -> Self {
        MetadataCodec {
            container,
            shader_model: None,
            properties: Box::new(DefaultProperties),
            config: CodecConfig::default(),
        }
    }

    /// Replaces the optional-field strategy.
    #[must_use]
    pub fn with_properties(mut self, properties: Box<dyn ExtraProperties>) -> Self {
        self.properties = properties;
        self
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> CodecConfig {
        self.config
    }

    /// Shader model of the module, once emitted, loaded or set.
    #[must_use]
    pub fn shader_model(&self) -> Option<ShaderModel> {
        self.shader_model
    }

    /// Sets the shader model used to validate stage-specific records.
    pub fn set_shader_model(&mut self, shader_model: ShaderModel) {
        self.shader_model = Some(shader_model);
    }

    /// The bound container.
    #[must_use]
    pub fn container(&self) -> &Container {
        self.container
    }

    /// Mutable access to the bound container.
    pub fn container_mut(&mut self) -> &mut Container {
        &mut *self.container
    }

    /// Writes every named entry describing `module`.
    ///
    /// Entries are written in this order: DXIL version, validator version, shader model,
    /// resources, type annotations, view-id state, entry points, root signature. The precise
    /// markers are written into the function bodies last.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if any entry already exists, or if the module
    /// references symbols that are missing or of the wrong kind.
    pub fn emit_all(&mut self, module: &ShaderModule) -> Result<()> {
        self.emit_dxil_version(module.dxil_version)?;
        if self.config.emit_validator_version {
            self.emit_validator_version(module.validator_version)?;
        }
        self.emit_shader_model(&module.shader_model)?;

        let signatures = self.emit_signatures(&module.entry.signatures);
        let resources = self.emit_resources(&module.resources)?;
        let properties = self.emit_entry_properties(&module.entry.properties)?;

        self.emit_type_system(&module.type_system)?;
        self.emit_view_id_state(&module.view_id_state)?;

        let entry = self.emit_entry_point_tuple(
            module.entry.function,
            &module.entry.name,
            signatures,
            resources,
            properties,
        )?;
        self.emit_entry_points(&[entry])?;
        self.emit_root_signature(&module.root_signature)?;

        let precise = if self.config.precise_bridge {
            self.emit_precise_markers()
        } else {
            0
        };

        debug!(
            shader_model = %module.shader_model,
            srvs = module.resources.srvs.len(),
            uavs = module.resources.uavs.len(),
            cbuffers = module.resources.cbuffers.len(),
            samplers = module.resources.samplers.len(),
            struct_annotations = module.type_system.structs.len(),
            function_annotations = module.type_system.functions.len(),
            precise,
            "emitted module metadata"
        );
        Ok(())
    }

    /// Reads the whole metadata tree back into a [`ShaderModule`].
    ///
    /// Optional entries that are absent load as their defaults. The precise-marker pass runs
    /// only for containers read from a persisted image.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on the first record that does not have the expected
    /// shape. Nothing is returned for a partially loaded module.
    pub fn load_all(&mut self) -> Result<ShaderModule> {
        let dxil_version = self.load_dxil_version()?;
        let validator_version = self.load_validator_version()?;
        let shader_model = self.load_shader_model()?;

        let entries = self.load_entry_points()?;
        let [entry_node] = entries.as_slice() else {
            return Err(malformed_error!(
                "Expected exactly one entry point, found {}",
                entries.len()
            ));
        };
        let entry = self.load_entry_point_tuple(Some(*entry_node))?;
        if registry::optional_operand(self.container(), NamedEntry::Resources)? != entry.resources {
            return Err(malformed_error!(
                "Named metadata '{}' does not match the resources of entry point '{}'",
                NamedEntry::Resources.key(),
                entry.name
            ));
        }

        let signatures = self.load_signatures(entry.signatures)?;
        let resources = self.load_resource_lists(entry.resources)?;
        let properties = self.load_entry_properties(entry.properties)?;
        if let Some(stage) = &properties.stage {
            if stage.shader_kind() != shader_model.kind {
                return Err(malformed_error!(
                    "{:?} state in the properties of a {} entry point",
                    stage.shader_kind(),
                    shader_model
                ));
            }
        }

        let type_system = self.load_type_system()?;

        let mut view_id_state = Default::default();
        self.load_view_id_state(&mut view_id_state)?;
        let mut root_signature = Default::default();
        self.load_root_signature(&mut root_signature)?;

        let precise = if self.config.precise_bridge {
            self.load_precise_markers()
        } else {
            0
        };

        debug!(
            shader_model = %shader_model,
            entry = %entry.name,
            srvs = resources.srvs.len(),
            uavs = resources.uavs.len(),
            cbuffers = resources.cbuffers.len(),
            samplers = resources.samplers.len(),
            struct_annotations = type_system.structs.len(),
            function_annotations = type_system.functions.len(),
            precise,
            "loaded module metadata"
        );

        Ok(ShaderModule {
            dxil_version,
            validator_version,
            shader_model,
            entry: EntryPoint {
                function: entry.function,
                name: entry.name,
                signatures,
                properties,
            },
            resources,
            type_system,
            root_signature,
            view_id_state,
        })
    }
}
