//! Geometry, domain and hull shader state records.

use crate::{
    ir::NodeId,
    metadata::{
        codec::MetadataCodec,
        layout::{ds_state, gs_state, hs_state, record_operands, RecordKind},
        scalar::{
            enum_from_node, enum_to_node, float_from_node, float_to_node, from_node,
            optional_function_from_node, optional_value_to_node, to_node,
        },
    },
    model::{
        DsState, GsState, HsState, InputPrimitive, PrimitiveTopology, TessellatorDomain,
        TessellatorOutputPrimitive, TessellatorPartitioning,
    },
    Result,
};

impl MetadataCodec<'_> {
    /// Builds a geometry shader state record.
    pub fn emit_gs_state(&mut self, state: &GsState) -> NodeId {
        let mut operands = vec![None; RecordKind::GsState.arity()];
        operands[gs_state::INPUT_PRIMITIVE] =
            Some(enum_to_node::<u32, _>(self.container, state.input_primitive));
        operands[gs_state::MAX_VERTEX_COUNT] = Some(to_node(self.container, state.max_vertex_count));
        operands[gs_state::ACTIVE_STREAM_MASK] =
            Some(to_node(self.container, state.active_stream_mask));
        operands[gs_state::OUTPUT_TOPOLOGY] =
            Some(enum_to_node::<u32, _>(self.container, state.output_topology));
        operands[gs_state::INSTANCE_COUNT] = Some(to_node(self.container, state.instance_count));
        self.container.tuple(operands)
    }

    /// Reads a geometry shader state record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on a wrong arity or field.
    pub fn load_gs_state(&self, node: Option<NodeId>) -> Result<GsState> {
        let operands = record_operands(self.container, node, RecordKind::GsState)?;
        let c = &*self.container;
        Ok(GsState {
            input_primitive: enum_from_node::<u32, InputPrimitive>(
                c,
                operands[gs_state::INPUT_PRIMITIVE],
            )?,
            max_vertex_count: from_node(c, operands[gs_state::MAX_VERTEX_COUNT])?,
            active_stream_mask: from_node(c, operands[gs_state::ACTIVE_STREAM_MASK])?,
            output_topology: enum_from_node::<u32, PrimitiveTopology>(
                c,
                operands[gs_state::OUTPUT_TOPOLOGY],
            )?,
            instance_count: from_node(c, operands[gs_state::INSTANCE_COUNT])?,
        })
    }

    /// Builds a domain shader state record.
    pub fn emit_ds_state(&mut self, state: &DsState) -> NodeId {
        let mut operands = vec![None; RecordKind::DsState.arity()];
        operands[ds_state::DOMAIN] = Some(enum_to_node::<u32, _>(self.container, state.domain));
        operands[ds_state::INPUT_CONTROL_POINTS] =
            Some(to_node(self.container, state.input_control_points));
        self.container.tuple(operands)
    }

    /// Reads a domain shader state record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on a wrong arity or field.
    pub fn load_ds_state(&self, node: Option<NodeId>) -> Result<DsState> {
        let operands = record_operands(self.container, node, RecordKind::DsState)?;
        Ok(DsState {
            domain: enum_from_node::<u32, TessellatorDomain>(
                self.container,
                operands[ds_state::DOMAIN],
            )?,
            input_control_points: from_node(self.container, operands[ds_state::INPUT_CONTROL_POINTS])?,
        })
    }

    /// Builds a hull shader state record. A missing patch-constant function is a null slot.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the patch-constant function is not a function.
    pub fn emit_hs_state(&mut self, state: &HsState) -> Result<NodeId> {
        if let Some(function) = state.patch_constant_function {
            if self.container.function(function).is_none() {
                return Err(malformed_error!(
                    "Patch-constant function {} is not a function",
                    function
                ));
            }
        }

        let mut operands = vec![None; RecordKind::HsState.arity()];
        operands[hs_state::PATCH_CONSTANT_FUNCTION] =
            optional_value_to_node(self.container, state.patch_constant_function);
        operands[hs_state::INPUT_CONTROL_POINTS] =
            Some(to_node(self.container, state.input_control_points));
        operands[hs_state::OUTPUT_CONTROL_POINTS] =
            Some(to_node(self.container, state.output_control_points));
        operands[hs_state::DOMAIN] = Some(enum_to_node::<u32, _>(self.container, state.domain));
        operands[hs_state::PARTITIONING] =
            Some(enum_to_node::<u32, _>(self.container, state.partitioning));
        operands[hs_state::OUTPUT_PRIMITIVE] =
            Some(enum_to_node::<u32, _>(self.container, state.output_primitive));
        operands[hs_state::MAX_TESS_FACTOR] =
            Some(float_to_node(self.container, state.max_tess_factor));
        Ok(self.container.tuple(operands))
    }

    /// Reads a hull shader state record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on a wrong arity or field, or a patch-constant slot
    /// that is set but not a function.
    pub fn load_hs_state(&self, node: Option<NodeId>) -> Result<HsState> {
        let operands = record_operands(self.container, node, RecordKind::HsState)?;
        let c = &*self.container;
        Ok(HsState {
            patch_constant_function: optional_function_from_node(
                c,
                operands[hs_state::PATCH_CONSTANT_FUNCTION],
            )?,
            input_control_points: from_node(c, operands[hs_state::INPUT_CONTROL_POINTS])?,
            output_control_points: from_node(c, operands[hs_state::OUTPUT_CONTROL_POINTS])?,
            domain: enum_from_node::<u32, TessellatorDomain>(c, operands[hs_state::DOMAIN])?,
            partitioning: enum_from_node::<u32, TessellatorPartitioning>(
                c,
                operands[hs_state::PARTITIONING],
            )?,
            output_primitive: enum_from_node::<u32, TessellatorOutputPrimitive>(
                c,
                operands[hs_state::OUTPUT_PRIMITIVE],
            )?,
            max_tess_factor: float_from_node(c, operands[hs_state::MAX_TESS_FACTOR])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ir::{Container, ElementType},
        metadata::layout::hs_state,
        model::{
            DsState, GsState, HsState, InputPrimitive, PrimitiveTopology, TessellatorDomain,
            TessellatorOutputPrimitive, TessellatorPartitioning,
        },
        MetadataCodec,
    };

    #[test]
    fn gs_and_ds_roundtrip() {
        let mut container = Container::new();
        let mut codec = MetadataCodec::new(&mut container);

        let gs = GsState {
            input_primitive: InputPrimitive::ControlPointPatch32,
            max_vertex_count: 1024,
            active_stream_mask: 0b1111,
            output_topology: PrimitiveTopology::PointList,
            instance_count: 32,
        };
        let node = codec.emit_gs_state(&gs);
        assert_eq!(codec.load_gs_state(Some(node)).unwrap(), gs);

        let ds = DsState {
            domain: TessellatorDomain::IsoLine,
            input_control_points: 2,
        };
        let node = codec.emit_ds_state(&ds);
        assert_eq!(codec.load_ds_state(Some(node)).unwrap(), ds);
        assert!(codec.load_gs_state(Some(node)).is_err());
    }

    #[test]
    fn hs_roundtrip_keeps_float_bits() {
        let mut container = Container::new();
        let patch = container.add_function("patch", Vec::new(), ElementType::Void);
        let mut codec = MetadataCodec::new(&mut container);

        let hs = HsState {
            patch_constant_function: Some(patch),
            input_control_points: 3,
            output_control_points: 3,
            domain: TessellatorDomain::Tri,
            partitioning: TessellatorPartitioning::FractionalOdd,
            output_primitive: TessellatorOutputPrimitive::TriangleCW,
            max_tess_factor: 63.75,
        };
        let node = codec.emit_hs_state(&hs).unwrap();
        let loaded = codec.load_hs_state(Some(node)).unwrap();
        assert_eq!(loaded, hs);
        assert_eq!(loaded.max_tess_factor.to_bits(), 63.75_f32.to_bits());
    }

    #[test]
    fn hs_patch_function_is_nullable() {
        let mut container = Container::new();
        let global = container.add_global("g", ElementType::Float);
        let global_node = container.value(global);
        let mut codec = MetadataCodec::new(&mut container);

        let node = codec.emit_hs_state(&HsState::default()).unwrap();
        assert_eq!(
            codec.load_hs_state(Some(node)).unwrap().patch_constant_function,
            None
        );

        codec
            .container_mut()
            .replace_operand(node, hs_state::PATCH_CONSTANT_FUNCTION, Some(global_node))
            .unwrap();
        assert!(codec.load_hs_state(Some(node)).is_err());

        let bad = HsState {
            patch_constant_function: Some(global),
            ..HsState::default()
        };
        assert!(codec.emit_hs_state(&bad).is_err());
    }
}
