//! Resource records: SRVs, UAVs, constant buffers, samplers and the resource lists.
//!
//! Every resource record starts with the same six base fields
//! (`[id, global, name, space, lower bound, range size]`), followed by the class-specific core
//! fields and the sparse tag-value slot handled by the codec's [`ExtraProperties`] strategy.
//!
//! [`ExtraProperties`]: crate::metadata::properties::ExtraProperties

use tracing::trace;

use crate::{
    ir::{NodeId, Opcode, Symbol, SymbolId},
    metadata::{
        codec::MetadataCodec,
        layout::{
            cbuffer, record_operands, resource_attribute, resource_base, resources, sampler, srv,
            uav, RecordKind,
        },
        names::{NamedEntry, RESOURCE_ATTRIBUTE},
        properties::{TagValueList, TagValueWriter},
        registry,
        scalar::{
            enum_from_node, enum_to_node, from_node, optional_global_from_node,
            optional_value_to_node, string_from_node, string_to_node, to_node, tuple_operands,
        },
    },
    model::{
        CBuffer, Resource, ResourceBase, ResourceClass, ResourceKind, ResourceLists,
        ResourceRecord, Sampler, SamplerKind,
    },
    Result,
};

impl MetadataCodec<'_> {
    /// Builds the resource lists tuple and registers it as the resources entry.
    ///
    /// Nothing is written when no resource is bound.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a resource names a symbol that is not a global, or
    /// the resources entry already exists.
    pub fn emit_resources(&mut self, lists: &ResourceLists) -> Result<Option<NodeId>> {
        let node = self.emit_resource_lists(lists)?;
        if let Some(node) = node {
            registry::emit_once(self.container, NamedEntry::Resources, node)?;
        }
        Ok(node)
    }

    /// Builds the resource lists tuple `[srvs, uavs, cbuffers, samplers]`; `None` if every list
    /// is empty. An individual empty list is a null slot.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a resource names a symbol that is not a global.
    pub fn emit_resource_lists(&mut self, lists: &ResourceLists) -> Result<Option<NodeId>> {
        if lists.is_empty() {
            return Ok(None);
        }

        let mut operands = vec![None; RecordKind::ResourceLists.arity()];

        let mut records = Vec::with_capacity(lists.srvs.len());
        for resource in &lists.srvs {
            records.push(Some(self.emit_srv(resource)?));
        }
        operands[resources::SRVS] = self.optional_list(records);

        let mut records = Vec::with_capacity(lists.uavs.len());
        for resource in &lists.uavs {
            records.push(Some(self.emit_uav(resource)?));
        }
        operands[resources::UAVS] = self.optional_list(records);

        let mut records = Vec::with_capacity(lists.cbuffers.len());
        for resource in &lists.cbuffers {
            records.push(Some(self.emit_cbuffer(resource)?));
        }
        operands[resources::CBUFFERS] = self.optional_list(records);

        let mut records = Vec::with_capacity(lists.samplers.len());
        for resource in &lists.samplers {
            records.push(Some(self.emit_sampler(resource)?));
        }
        operands[resources::SAMPLERS] = self.optional_list(records);

        Ok(Some(self.container.tuple(operands)))
    }

    /// Reads a resource lists tuple; a null slot loads as no resources.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the tuple or any record in it is malformed.
    pub fn load_resource_lists(&self, node: Option<NodeId>) -> Result<ResourceLists> {
        let mut lists = ResourceLists::default();
        if node.is_none() {
            return Ok(lists);
        }

        let operands = record_operands(self.container, node, RecordKind::ResourceLists)?;
        for record in self.list_operands(operands[resources::SRVS])? {
            lists.srvs.push(self.load_srv(*record)?);
        }
        for record in self.list_operands(operands[resources::UAVS])? {
            lists.uavs.push(self.load_uav(*record)?);
        }
        for record in self.list_operands(operands[resources::CBUFFERS])? {
            lists.cbuffers.push(self.load_cbuffer(*record)?);
        }
        for record in self.list_operands(operands[resources::SAMPLERS])? {
            lists.samplers.push(self.load_sampler(*record)?);
        }
        Ok(lists)
    }

    /// Builds a shader resource view record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the bound symbol is not a global.
    pub fn emit_srv(&mut self, resource: &Resource) -> Result<NodeId> {
        let mut operands = vec![None; RecordKind::Srv.arity()];
        self.emit_resource_base(&resource.base, &mut operands)?;
        operands[srv::SHAPE] = Some(enum_to_node::<u32, _>(self.container, resource.base.kind));
        operands[srv::SAMPLE_COUNT] = Some(to_node(self.container, resource.sample_count));

        let mut out = TagValueWriter::new(&mut *self.container);
        self.properties.emit_srv_properties(resource, &mut out);
        operands[srv::NAME_VALUE_LIST] = out.finish();

        trace!(id = resource.base.id, name = %resource.base.global_name, "emitted SRV");
        Ok(self.container.tuple(operands))
    }

    /// Reads a shader resource view record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on a wrong arity, a field of the wrong shape, or an
    /// optional field the strategy rejects.
    pub fn load_srv(&self, node: Option<NodeId>) -> Result<Resource> {
        let operands = record_operands(self.container, node, RecordKind::Srv)?;
        let kind = enum_from_node::<u32, ResourceKind>(self.container, operands[srv::SHAPE])?;

        let mut resource = Resource::srv(kind);
        resource.base = self.load_resource_base(operands, ResourceClass::SRV, kind)?;
        resource.sample_count = from_node(self.container, operands[srv::SAMPLE_COUNT])?;

        let list = TagValueList::parse(self.container, operands[srv::NAME_VALUE_LIST])?;
        self.properties.load_srv_properties(&list, &mut resource)?;
        Ok(resource)
    }

    /// Builds an unordered access view record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the bound symbol is not a global.
    pub fn emit_uav(&mut self, resource: &Resource) -> Result<NodeId> {
        let mut operands = vec![None; RecordKind::Uav.arity()];
        self.emit_resource_base(&resource.base, &mut operands)?;
        operands[uav::SHAPE] = Some(enum_to_node::<u32, _>(self.container, resource.base.kind));
        operands[uav::GLOBALLY_COHERENT] =
            Some(to_node(self.container, resource.globally_coherent));
        operands[uav::HAS_COUNTER] = Some(to_node(self.container, resource.has_counter));
        operands[uav::ROV] = Some(to_node(self.container, resource.rov));

        let mut out = TagValueWriter::new(&mut *self.container);
        self.properties.emit_uav_properties(resource, &mut out);
        operands[uav::NAME_VALUE_LIST] = out.finish();

        trace!(id = resource.base.id, name = %resource.base.global_name, "emitted UAV");
        Ok(self.container.tuple(operands))
    }

    /// Reads an unordered access view record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on a wrong arity, a field of the wrong shape, or an
    /// optional field the strategy rejects.
    pub fn load_uav(&self, node: Option<NodeId>) -> Result<Resource> {
        let operands = record_operands(self.container, node, RecordKind::Uav)?;
        let kind = enum_from_node::<u32, ResourceKind>(self.container, operands[uav::SHAPE])?;

        let mut resource = Resource::uav(kind);
        resource.base = self.load_resource_base(operands, ResourceClass::UAV, kind)?;
        resource.globally_coherent = from_node(self.container, operands[uav::GLOBALLY_COHERENT])?;
        resource.has_counter = from_node(self.container, operands[uav::HAS_COUNTER])?;
        resource.rov = from_node(self.container, operands[uav::ROV])?;

        let list = TagValueList::parse(self.container, operands[uav::NAME_VALUE_LIST])?;
        self.properties.load_uav_properties(&list, &mut resource)?;
        Ok(resource)
    }

    /// Builds a constant buffer record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the bound symbol is not a global.
    pub fn emit_cbuffer(&mut self, resource: &CBuffer) -> Result<NodeId> {
        let mut operands = vec![None; RecordKind::CBuffer.arity()];
        self.emit_resource_base(&resource.base, &mut operands)?;
        operands[cbuffer::SIZE] = Some(to_node(self.container, resource.size));

        let mut out = TagValueWriter::new(&mut *self.container);
        self.properties.emit_cbuffer_properties(resource, &mut out);
        operands[cbuffer::NAME_VALUE_LIST] = out.finish();

        trace!(id = resource.base.id, size = resource.size, "emitted CBuffer");
        Ok(self.container.tuple(operands))
    }

    /// Reads a constant buffer record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on a wrong arity, a field of the wrong shape, or an
    /// optional field the strategy rejects.
    pub fn load_cbuffer(&self, node: Option<NodeId>) -> Result<CBuffer> {
        let operands = record_operands(self.container, node, RecordKind::CBuffer)?;

        let mut resource = CBuffer::new();
        resource.base =
            self.load_resource_base(operands, ResourceClass::CBuffer, ResourceKind::CBuffer)?;
        resource.size = from_node(self.container, operands[cbuffer::SIZE])?;

        let list = TagValueList::parse(self.container, operands[cbuffer::NAME_VALUE_LIST])?;
        self.properties
            .load_cbuffer_properties(&list, &mut resource)?;
        Ok(resource)
    }

    /// Builds a sampler record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the bound symbol is not a global.
    pub fn emit_sampler(&mut self, resource: &Sampler) -> Result<NodeId> {
        let mut operands = vec![None; RecordKind::Sampler.arity()];
        self.emit_resource_base(&resource.base, &mut operands)?;
        operands[sampler::SAMPLER_KIND] =
            Some(enum_to_node::<u32, _>(self.container, resource.sampler_kind));

        let mut out = TagValueWriter::new(&mut *self.container);
        self.properties.emit_sampler_properties(resource, &mut out);
        operands[sampler::NAME_VALUE_LIST] = out.finish();

        Ok(self.container.tuple(operands))
    }

    /// Reads a sampler record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on a wrong arity, a field of the wrong shape, or an
    /// optional field the strategy rejects.
    pub fn load_sampler(&self, node: Option<NodeId>) -> Result<Sampler> {
        let operands = record_operands(self.container, node, RecordKind::Sampler)?;

        let mut resource = Sampler::new();
        resource.base =
            self.load_resource_base(operands, ResourceClass::Sampler, ResourceKind::Sampler)?;
        resource.sampler_kind =
            enum_from_node::<u32, SamplerKind>(self.container, operands[sampler::SAMPLER_KIND])?;

        let list = TagValueList::parse(self.container, operands[sampler::NAME_VALUE_LIST])?;
        self.properties
            .load_sampler_properties(&list, &mut resource)?;
        Ok(resource)
    }

    /// Builds the record of a resource of any class.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the bound symbol is not a global.
    pub fn emit_resource_record(&mut self, record: &ResourceRecord) -> Result<NodeId> {
        match record {
            ResourceRecord::Srv(resource) => self.emit_srv(resource),
            ResourceRecord::Uav(resource) => self.emit_uav(resource),
            ResourceRecord::CBuffer(resource) => self.emit_cbuffer(resource),
            ResourceRecord::Sampler(resource) => self.emit_sampler(resource),
        }
    }

    /// Builds a resource attribute `[class, record]`, the form used to attach a resource
    /// description to an individual instruction.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the bound symbol is not a global.
    pub fn emit_resource_attribute(&mut self, record: &ResourceRecord) -> Result<NodeId> {
        let mut operands = vec![None; RecordKind::ResourceAttribute.arity()];
        operands[resource_attribute::CLASS] =
            Some(enum_to_node::<u32, _>(self.container, record.class()));
        operands[resource_attribute::RESOURCE] = Some(self.emit_resource_record(record)?);
        Ok(self.container.tuple(operands))
    }

    /// Reads a resource attribute, dispatching on its class discriminant.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on an invalid class or a malformed record.
    pub fn load_resource_attribute(&self, node: Option<NodeId>) -> Result<ResourceRecord> {
        let operands = record_operands(self.container, node, RecordKind::ResourceAttribute)?;
        let class = enum_from_node::<u32, ResourceClass>(
            self.container,
            operands[resource_attribute::CLASS],
        )?;

        let record = operands[resource_attribute::RESOURCE];
        match class {
            ResourceClass::SRV => Ok(ResourceRecord::Srv(self.load_srv(record)?)),
            ResourceClass::UAV => Ok(ResourceRecord::Uav(self.load_uav(record)?)),
            ResourceClass::CBuffer => Ok(ResourceRecord::CBuffer(self.load_cbuffer(record)?)),
            ResourceClass::Sampler => Ok(ResourceRecord::Sampler(self.load_sampler(record)?)),
            ResourceClass::Invalid => Err(malformed_error!(
                "Resource attribute has an invalid resource class"
            )),
        }
    }

    /// Attaches a resource attribute describing `record` to the call at `index` in the body of
    /// `function`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `function` is not a function, `index` is out of
    /// range, the instruction is not a call, or the bound symbol is not a global.
    pub fn attach_resource_attribute(
        &mut self,
        function: SymbolId,
        index: usize,
        record: &ResourceRecord,
    ) -> Result<()> {
        let opcode = self
            .container
            .function(function)
            .ok_or_else(|| malformed_error!("{} is not a function", function))?
            .instructions
            .get(index)
            .map(|instruction| instruction.opcode)
            .ok_or_else(|| malformed_error!("No instruction {} in {}", index, function))?;
        if opcode != Opcode::Call {
            return Err(malformed_error!(
                "Resource attribute on a {:?} instruction",
                opcode
            ));
        }

        let node = self.emit_resource_attribute(record)?;
        if let Some(instruction) = self
            .container
            .function_mut(function)
            .and_then(|body| body.instructions.get_mut(index))
        {
            instruction.attach(RESOURCE_ATTRIBUTE, node);
        }
        trace!(%function, index, class = ?record.class(), "attached resource attribute");
        Ok(())
    }

    /// Resource attribute attached to the instruction at `index` in the body of `function`;
    /// `None` if there is none.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the instruction does not exist or the attached
    /// tuple is malformed.
    pub fn resource_attribute(
        &self,
        function: SymbolId,
        index: usize,
    ) -> Result<Option<ResourceRecord>> {
        let attachment = self
            .container
            .function(function)
            .and_then(|body| body.instructions.get(index))
            .ok_or_else(|| malformed_error!("No instruction {} in {}", index, function))?
            .attachment(RESOURCE_ATTRIBUTE);

        attachment
            .map(|node| self.load_resource_attribute(Some(node)))
            .transpose()
    }

    fn emit_resource_base(
        &mut self,
        base: &ResourceBase,
        operands: &mut [Option<NodeId>],
    ) -> Result<()> {
        if let Some(symbol) = base.global_symbol {
            match self.container.symbol(symbol) {
                Some(Symbol::Global(_)) => {}
                Some(other) => {
                    return Err(malformed_error!(
                        "Resource '{}' is bound to a {}, expected a global",
                        base.global_name,
                        other.kind()
                    ))
                }
                None => {
                    return Err(malformed_error!(
                        "Resource '{}' is bound to unknown symbol {}",
                        base.global_name,
                        symbol
                    ))
                }
            }
        }

        operands[resource_base::ID] = Some(to_node(self.container, base.id));
        operands[resource_base::GLOBAL_SYMBOL] =
            optional_value_to_node(self.container, base.global_symbol);
        operands[resource_base::NAME] = Some(string_to_node(self.container, &base.global_name));
        operands[resource_base::SPACE] = Some(to_node(self.container, base.space));
        operands[resource_base::LOWER_BOUND] = Some(to_node(self.container, base.lower_bound));
        operands[resource_base::RANGE_SIZE] = Some(to_node(self.container, base.range_size));
        Ok(())
    }

    fn load_resource_base(
        &self,
        operands: &[Option<NodeId>],
        class: ResourceClass,
        kind: ResourceKind,
    ) -> Result<ResourceBase> {
        let c = &*self.container;
        Ok(ResourceBase {
            class,
            kind,
            id: from_node(c, operands[resource_base::ID])?,
            global_symbol: optional_global_from_node(c, operands[resource_base::GLOBAL_SYMBOL])?,
            global_name: string_from_node(c, operands[resource_base::NAME])?,
            space: from_node(c, operands[resource_base::SPACE])?,
            lower_bound: from_node(c, operands[resource_base::LOWER_BOUND])?,
            range_size: from_node(c, operands[resource_base::RANGE_SIZE])?,
        })
    }

    fn optional_list(&mut self, records: Vec<Option<NodeId>>) -> Option<NodeId> {
        if records.is_empty() {
            None
        } else {
            Some(self.container.tuple(records))
        }
    }

    fn list_operands(&self, node: Option<NodeId>) -> Result<&[Option<NodeId>]> {
        if node.is_none() {
            return Ok(&[]);
        }
        tuple_operands(self.container, node)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ir::{Container, ElementType, Instruction, Opcode},
        metadata::{
            layout::{resources, srv},
            names::{NamedEntry, RESOURCE_ATTRIBUTE},
        },
        model::{
            CBuffer, ComponentType, Resource, ResourceKind, ResourceLists, ResourceRecord,
            Sampler, SamplerKind,
        },
        Error, MetadataCodec,
    };

    fn texture(container: &mut Container) -> Resource {
        let global = container.add_global("g_texture", ElementType::Float);
        let mut resource = Resource::srv(ResourceKind::Texture2D);
        resource.base.id = 0;
        resource.base.global_symbol = Some(global);
        resource.base.global_name = "g_texture".to_string();
        resource.base.lower_bound = 3;
        resource.component_type = ComponentType::F32;
        resource
    }

    #[test]
    fn empty_lists_write_nothing() {
        let mut container = Container::new();
        let mut codec = MetadataCodec::new(&mut container);
        assert_eq!(codec.emit_resources(&ResourceLists::default()).unwrap(), None);
        assert!(codec
            .container()
            .named(NamedEntry::Resources.key())
            .is_none());
        assert!(codec.load_resource_lists(None).unwrap().is_empty());
    }

    #[test]
    fn lists_roundtrip_with_null_slots() {
        let mut container = Container::new();
        let srv = texture(&mut container);
        let mut codec = MetadataCodec::new(&mut container);

        let mut sampler = Sampler::new();
        sampler.sampler_kind = SamplerKind::Comparison;
        sampler.base.range_size = u32::MAX;

        let lists = ResourceLists {
            srvs: vec![srv],
            samplers: vec![sampler],
            ..ResourceLists::default()
        };
        let node = codec.emit_resources(&lists).unwrap().unwrap();

        let operands = codec.container().tuple_operands(node).unwrap();
        assert!(operands[resources::SRVS].is_some());
        assert_eq!(operands[resources::UAVS], None);
        assert_eq!(operands[resources::CBUFFERS], None);

        let loaded = codec.load_resource_lists(Some(node)).unwrap();
        assert_eq!(loaded, lists);
        assert!(loaded.samplers[0].base.is_unbounded());
    }

    #[test]
    fn uav_flags_and_stride() {
        let mut container = Container::new();
        let mut codec = MetadataCodec::new(&mut container);

        let mut resource = Resource::uav(ResourceKind::StructuredBuffer);
        resource.globally_coherent = true;
        resource.has_counter = true;
        resource.element_stride = 20;
        resource.base.global_name = "g_buffer".to_string();

        let node = codec.emit_uav(&resource).unwrap();
        let loaded = codec.load_uav(Some(node)).unwrap();
        assert_eq!(loaded, resource);
        assert!(!loaded.rov);
    }

    #[test]
    fn raw_srv_has_null_property_slot() {
        let mut container = Container::new();
        let mut codec = MetadataCodec::new(&mut container);
        let node = codec.emit_srv(&Resource::srv(ResourceKind::RawBuffer)).unwrap();
        let operands = codec.container().tuple_operands(node).unwrap();
        assert_eq!(operands[srv::NAME_VALUE_LIST], None);
        assert_eq!(codec.load_srv(Some(node)).unwrap().element_stride, 1);
    }

    #[test]
    fn resource_must_bind_a_global() {
        let mut container = Container::new();
        let function = container.add_function("f", Vec::new(), ElementType::Void);
        let mut codec = MetadataCodec::new(&mut container);

        let mut cbuffer = CBuffer::new();
        cbuffer.base.global_symbol = Some(function);
        assert!(matches!(
            codec.emit_cbuffer(&cbuffer),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn attribute_dispatches_on_class() {
        let mut container = Container::new();
        let srv = texture(&mut container);
        let mut codec = MetadataCodec::new(&mut container);

        let mut tbuffer = CBuffer::new();
        tbuffer.base.kind = ResourceKind::TBuffer;
        tbuffer.size = 256;

        for record in [ResourceRecord::Srv(srv), ResourceRecord::CBuffer(tbuffer)] {
            let node = codec.emit_resource_attribute(&record).unwrap();
            assert_eq!(codec.load_resource_attribute(Some(node)).unwrap(), record);
        }

        let invalid = crate::metadata::scalar::to_node(codec.container_mut(), 4_u32);
        let node = codec.container_mut().tuple(vec![Some(invalid), None]);
        assert!(codec.load_resource_attribute(Some(node)).is_err());
    }

    #[test]
    fn attribute_attached_to_calls() {
        let mut container = Container::new();
        let srv = texture(&mut container);
        let main = container.add_function("main", Vec::new(), ElementType::Void);
        if let Some(body) = container.function_mut(main) {
            body.instructions
                .push(Instruction::call(main, ElementType::Void));
            body.instructions
                .push(Instruction::new(Opcode::Ret, ElementType::Void));
        }
        let mut codec = MetadataCodec::new(&mut container);

        let record = ResourceRecord::Srv(srv);
        codec.attach_resource_attribute(main, 0, &record).unwrap();
        assert!(codec.attach_resource_attribute(main, 1, &record).is_err());
        assert!(codec.attach_resource_attribute(main, 2, &record).is_err());

        assert_eq!(codec.resource_attribute(main, 0).unwrap(), Some(record));
        assert_eq!(codec.resource_attribute(main, 1).unwrap(), None);
        assert!(codec.container().function(main).unwrap().instructions[0]
            .attachment(RESOURCE_ATTRIBUTE)
            .is_some());
    }

    #[test]
    fn unknown_shape_fails() {
        let mut container = Container::new();
        let mut codec = MetadataCodec::new(&mut container);
        let node = codec.emit_srv(&Resource::srv(ResourceKind::Texture1D)).unwrap();
        let bad = crate::metadata::scalar::to_node(codec.container_mut(), 99_u32);
        codec
            .container_mut()
            .replace_operand(node, srv::SHAPE, Some(bad))
            .unwrap();
        assert!(codec.load_srv(Some(node)).is_err());
    }
}
