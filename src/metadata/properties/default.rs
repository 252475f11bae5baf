use crate::{
    metadata::{
        layout::tags,
        properties::{unknown_tag, ExtraProperties, TagValueList, TagValueWriter},
    },
    model::{CBuffer, ComponentType, Resource, ResourceKind, Sampler, SignatureElement},
    Result,
};

/// The standard optional fields.
///
/// | Record | Tag | Field | Written when |
/// |---|---|---|---|
/// | SRV, UAV | 0 | element component type (u32) | the resource is typed |
/// | SRV, UAV | 1 | element stride (u32) | the resource is structured |
/// | CBuffer | 100 | tbuffer marker (bool) | the buffer is a tbuffer |
/// | Signature element | 0 | output stream (u32) | nonzero |
/// | Signature element | 1 | high-level global symbol | never; ignored on load |
/// | Signature element | 2 | dynamically indexed mask (u32) | nonzero |
///
/// Samplers have no optional fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProperties;

impl DefaultProperties {
    fn emit_resource(resource: &Resource, out: &mut TagValueWriter<'_>) {
        if resource.is_typed() {
            out.push_enum::<u32, _>(tags::TYPED_BUFFER_ELEMENT_TYPE, resource.component_type);
        }
        if resource.is_structured() {
            out.push(tags::STRUCTURED_BUFFER_ELEMENT_STRIDE, resource.element_stride);
        }
    }

    fn load_resource(list: &TagValueList<'_>, resource: &mut Resource, record: &str) -> Result<()> {
        resource.reset_optional_fields();

        for (tag, value) in list.iter() {
            match tag {
                tags::TYPED_BUFFER_ELEMENT_TYPE => {
                    resource.component_type = list.enumeration::<u32, ComponentType>(value)?;
                }
                tags::STRUCTURED_BUFFER_ELEMENT_STRIDE => {
                    resource.element_stride = list.scalar::<u32>(value)?;
                }
                _ => return Err(unknown_tag(tag, record)),
            }
        }
        Ok(())
    }
}

impl ExtraProperties for DefaultProperties {
    fn emit_srv_properties(&self, srv: &Resource, out: &mut TagValueWriter<'_>) {
        Self::emit_resource(srv, out);
    }

    fn load_srv_properties(&self, list: &TagValueList<'_>, srv: &mut Resource) -> Result<()> {
        Self::load_resource(list, srv, "SRV")
    }

    fn emit_uav_properties(&self, uav: &Resource, out: &mut TagValueWriter<'_>) {
        Self::emit_resource(uav, out);
    }

    fn load_uav_properties(&self, list: &TagValueList<'_>, uav: &mut Resource) -> Result<()> {
        Self::load_resource(list, uav, "UAV")
    }

    fn emit_cbuffer_properties(&self, cbuffer: &CBuffer, out: &mut TagValueWriter<'_>) {
        if cbuffer.is_tbuffer() {
            out.push(tags::CBUFFER_IS_TBUFFER, true);
        }
    }

    fn load_cbuffer_properties(
        &self,
        list: &TagValueList<'_>,
        cbuffer: &mut CBuffer,
    ) -> Result<()> {
        cbuffer.base.kind = ResourceKind::CBuffer;

        for (tag, value) in list.iter() {
            match tag {
                tags::CBUFFER_IS_TBUFFER => {
                    if list.scalar::<bool>(value)? {
                        cbuffer.base.kind = ResourceKind::TBuffer;
                    }
                }
                _ => return Err(unknown_tag(tag, "CBuffer")),
            }
        }
        Ok(())
    }

    fn emit_sampler_properties(&self, _sampler: &Sampler, _out: &mut TagValueWriter<'_>) {}

    fn load_sampler_properties(
        &self,
        list: &TagValueList<'_>,
        _sampler: &mut Sampler,
    ) -> Result<()> {
        match list.iter().next() {
            Some((tag, _)) => Err(unknown_tag(tag, "sampler")),
            None => Ok(()),
        }
    }

    fn emit_signature_element_properties(
        &self,
        element: &SignatureElement,
        out: &mut TagValueWriter<'_>,
    ) {
        if element.output_stream != 0 {
            out.push(tags::SIGNATURE_OUTPUT_STREAM, element.output_stream);
        }
        if element.dynamic_index_mask != 0 {
            out.push(tags::SIGNATURE_DYNAMIC_INDEX_MASK, element.dynamic_index_mask);
        }
    }

    fn load_signature_element_properties(
        &self,
        list: &TagValueList<'_>,
        element: &mut SignatureElement,
    ) -> Result<()> {
        element.output_stream = 0;
        element.dynamic_index_mask = 0;

        for (tag, value) in list.iter() {
            match tag {
                tags::SIGNATURE_OUTPUT_STREAM => element.output_stream = list.scalar(value)?,
                tags::SIGNATURE_GLOBAL_SYMBOL => {}
                tags::SIGNATURE_DYNAMIC_INDEX_MASK => {
                    element.dynamic_index_mask = list.scalar(value)?;
                }
                _ => return Err(unknown_tag(tag, "signature element")),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ir::Container, metadata::scalar::to_node};

    fn roundtrip_srv(srv: &Resource) -> (Option<crate::ir::NodeId>, Resource, Container) {
        let mut container = Container::new();
        let mut writer = TagValueWriter::new(&mut container);
        DefaultProperties.emit_srv_properties(srv, &mut writer);
        let node = writer.finish();

        let mut loaded = Resource::srv(srv.base.kind);
        loaded.element_stride = 77;
        let list = TagValueList::parse(&container, node).unwrap();
        DefaultProperties.load_srv_properties(&list, &mut loaded).unwrap();
        (node, loaded, container)
    }

    #[test]
    fn raw_buffer_has_no_tags() {
        let srv = Resource::srv(ResourceKind::RawBuffer);
        let (node, loaded, _) = roundtrip_srv(&srv);
        assert_eq!(node, None);
        assert_eq!(loaded, srv);
        assert_eq!(loaded.element_stride, 1);
    }

    #[test]
    fn structured_buffer_keeps_stride() {
        let mut srv = Resource::srv(ResourceKind::StructuredBuffer);
        srv.element_stride = 48;
        let (node, loaded, container) = roundtrip_srv(&srv);
        let list = TagValueList::parse(&container, node).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(loaded.element_stride, 48);
        assert_eq!(loaded.component_type, ComponentType::Invalid);
    }

    #[test]
    fn typed_buffer_keeps_component_type() {
        let mut srv = Resource::srv(ResourceKind::Texture2D);
        srv.component_type = ComponentType::F32;
        let (_, loaded, _) = roundtrip_srv(&srv);
        assert_eq!(loaded.component_type, ComponentType::F32);
        assert_eq!(loaded.element_stride, 4);
    }

    #[test]
    fn tbuffer_marker() {
        let mut container = Container::new();
        let mut cbuffer = CBuffer::new();

        let mut writer = TagValueWriter::new(&mut container);
        DefaultProperties.emit_cbuffer_properties(&cbuffer, &mut writer);
        assert!(writer.is_empty());

        cbuffer.base.kind = ResourceKind::TBuffer;
        let mut writer = TagValueWriter::new(&mut container);
        DefaultProperties.emit_cbuffer_properties(&cbuffer, &mut writer);
        let node = writer.finish();

        let mut loaded = CBuffer::new();
        let list = TagValueList::parse(&container, node).unwrap();
        DefaultProperties
            .load_cbuffer_properties(&list, &mut loaded)
            .unwrap();
        assert!(loaded.is_tbuffer());
    }

    #[test]
    fn unknown_tags_fail() {
        let mut container = Container::new();
        let tag = to_node(&mut container, 42_u32);
        let value = to_node(&mut container, 1_u32);
        let node = container.tuple(vec![Some(tag), Some(value)]);
        let list = TagValueList::parse(&container, Some(node)).unwrap();

        let mut srv = Resource::srv(ResourceKind::Texture2D);
        assert!(DefaultProperties.load_srv_properties(&list, &mut srv).is_err());
        let mut sampler = Sampler::new();
        assert!(DefaultProperties
            .load_sampler_properties(&list, &mut sampler)
            .is_err());
        let mut element = SignatureElement::new(0, "POSITION");
        assert!(DefaultProperties
            .load_signature_element_properties(&list, &mut element)
            .is_err());
    }

    #[test]
    fn signature_element_nonzero_only() {
        let mut container = Container::new();
        let mut element = SignatureElement::new(0, "SV_Position");

        let mut writer = TagValueWriter::new(&mut container);
        DefaultProperties.emit_signature_element_properties(&element, &mut writer);
        assert!(writer.is_empty());

        element.output_stream = 2;
        element.dynamic_index_mask = 0b1010;
        let mut writer = TagValueWriter::new(&mut container);
        DefaultProperties.emit_signature_element_properties(&element, &mut writer);
        assert_eq!(writer.len(), 2);
        let node = writer.finish();

        let mut loaded = SignatureElement::new(0, "SV_Position");
        let list = TagValueList::parse(&container, node).unwrap();
        DefaultProperties
            .load_signature_element_properties(&list, &mut loaded)
            .unwrap();
        assert_eq!(loaded, element);
    }

    #[test]
    fn signature_element_global_symbol_ignored() {
        let mut container = Container::new();
        let symbol_tag = to_node(&mut container, tags::SIGNATURE_GLOBAL_SYMBOL);
        let symbol = to_node(&mut container, 9_u32);
        let stream_tag = to_node(&mut container, tags::SIGNATURE_OUTPUT_STREAM);
        let stream = to_node(&mut container, 1_u32);
        let node = container.tuple(vec![
            Some(symbol_tag),
            Some(symbol),
            Some(stream_tag),
            Some(stream),
        ]);
        let list = TagValueList::parse(&container, Some(node)).unwrap();

        let mut element = SignatureElement::new(0, "TEXCOORD");
        DefaultProperties
            .load_signature_element_properties(&list, &mut element)
            .unwrap();
        assert_eq!(element.output_stream, 1);
        assert_eq!(element.dynamic_index_mask, 0);

        let mut writer = TagValueWriter::new(&mut container);
        DefaultProperties.emit_signature_element_properties(&element, &mut writer);
        assert_eq!(writer.len(), 1);
    }
}
