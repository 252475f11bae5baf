//! Sample containers and modules shared by unit tests.

use crate::{
    ir::{Container, ElementType, FastMathFlags, Instruction, Opcode, StructType, StructTypeId, SymbolId},
    model::{
        CBuffer, ComponentType, EntryProperties, FieldAnnotation, FunctionAnnotation, HsState,
        InterpolationMode, MatrixAnnotation, MatrixOrientation, ParameterQualifier, Resource,
        ResourceKind, ResourceLists, RootSignature, Sampler, SamplerKind, SemanticKind,
        ShaderFlags, ShaderKind, ShaderModel, ShaderModule, SignatureElement, StageState,
        StructAnnotation, TessellatorDomain, TessellatorOutputPrimitive, TessellatorPartitioning,
        TypeSystem, ViewIdState,
    },
};

/// Symbols of the sample container.
pub struct SampleSymbols {
    pub main: SymbolId,
    pub patch_constant: SymbolId,
    pub texture: SymbolId,
    pub buffer: SymbolId,
    pub constants: SymbolId,
    pub sampler: SymbolId,
    pub light: StructTypeId,
}

/// A hull shader container with a body, resource globals and one struct type.
pub fn sample_container() -> (Container, SampleSymbols) {
    let mut container = Container::new();

    let main = container.add_function("main", vec![ElementType::Int(32)], ElementType::Void);
    let patch_constant = container.add_function("patch", Vec::new(), ElementType::Void);
    let texture = container.add_global("g_texture", ElementType::Float);
    let buffer = container.add_global("g_output", ElementType::Float);
    let constants = container.add_global("Lights", ElementType::Float);
    let sampler = container.add_global("g_sampler", ElementType::Int(32));
    let light = container.add_struct_type(StructType {
        name: "Light".to_string(),
        elements: vec![
            ElementType::Array(Box::new(ElementType::Float), 4),
            ElementType::Float,
        ],
    });

    if let Some(function) = container.function_mut(main) {
        function
            .instructions
            .push(Instruction::new(Opcode::Load, ElementType::Float));
        function
            .instructions
            .push(Instruction::new(Opcode::FMul, ElementType::Float));
        let mut relaxed = Instruction::new(Opcode::FAdd, ElementType::Float);
        relaxed.fast_math = FastMathFlags::relaxed();
        function.instructions.push(relaxed);
        function
            .instructions
            .push(Instruction::new(Opcode::Ret, ElementType::Void));
    }

    (
        container,
        SampleSymbols {
            main,
            patch_constant,
            texture,
            buffer,
            constants,
            sampler,
            light,
        },
    )
}

/// A module exercising every named entry, bound to the symbols of [`sample_container`].
pub fn sample_module(symbols: &SampleSymbols) -> ShaderModule {
    let mut module = ShaderModule::new(ShaderModel::new(ShaderKind::Hull, 6, 0));
    module.entry.function = Some(symbols.main);
    module.entry.name = "main".to_string();

    let mut position = SignatureElement::new(0, "SV_Position");
    position.kind = SemanticKind::Position;
    position.component_type = ComponentType::F32;
    position.interpolation = InterpolationMode::LinearNoperspective;
    position.semantic_indices = vec![0];
    position.cols = 4;
    position.start_row = 0;
    position.start_col = 0;
    module.entry.signatures.input.elements.push(position.clone());
    module.entry.signatures.output.elements.push(position);

    let mut edges = SignatureElement::new(0, "SV_TessFactor");
    edges.kind = SemanticKind::TessFactor;
    edges.component_type = ComponentType::F32;
    edges.semantic_indices = vec![0, 1, 2];
    edges.rows = 3;
    edges.start_row = 0;
    edges.start_col = 3;
    edges.dynamic_index_mask = 0b1;
    module.entry.signatures.patch_constant.elements.push(edges);

    module.entry.properties = EntryProperties {
        shader_flags: ShaderFlags::ENABLE_RAW_AND_STRUCTURED_BUFFERS,
        stage: Some(StageState::Hull(HsState {
            patch_constant_function: Some(symbols.patch_constant),
            input_control_points: 3,
            output_control_points: 3,
            domain: TessellatorDomain::Tri,
            partitioning: TessellatorPartitioning::Integer,
            output_primitive: TessellatorOutputPrimitive::TriangleCW,
            max_tess_factor: 64.0,
        })),
        num_threads: None,
    };

    module.resources = sample_resources(symbols);
    module.type_system = sample_type_system(symbols);
    module.root_signature = RootSignature::from_serialized(vec![2, 0, 0, 0, 1, 0, 0, 0, 0x18]);
    module.view_id_state = ViewIdState::from_serialized(&[0, 1, 7]);
    module
}

fn sample_resources(symbols: &SampleSymbols) -> ResourceLists {
    let mut texture = Resource::srv(ResourceKind::Texture2D);
    texture.base.global_symbol = Some(symbols.texture);
    texture.base.global_name = "g_texture".to_string();
    texture.component_type = ComponentType::F32;

    let mut buffer = Resource::uav(ResourceKind::StructuredBuffer);
    buffer.base.global_symbol = Some(symbols.buffer);
    buffer.base.global_name = "g_output".to_string();
    buffer.base.space = 1;
    buffer.element_stride = 32;
    buffer.has_counter = true;

    let mut constants = CBuffer::new();
    constants.base.global_symbol = Some(symbols.constants);
    constants.base.global_name = "Lights".to_string();
    constants.size = 80;

    let mut sampler = Sampler::new();
    sampler.base.global_symbol = Some(symbols.sampler);
    sampler.base.global_name = "g_sampler".to_string();
    sampler.sampler_kind = SamplerKind::Comparison;

    ResourceLists {
        srvs: vec![texture],
        uavs: vec![buffer],
        cbuffers: vec![constants],
        samplers: vec![sampler],
    }
}

fn sample_type_system(symbols: &SampleSymbols) -> TypeSystem {
    let mut light = StructAnnotation::new(2);
    light.cbuffer_size = 80;
    light.fields[0] = FieldAnnotation {
        matrix: Some(MatrixAnnotation {
            rows: 4,
            cols: 4,
            orientation: MatrixOrientation::RowMajor,
        }),
        cbuffer_offset: Some(0),
        component_type: Some(ComponentType::F32),
        ..FieldAnnotation::named("transform")
    };
    light.fields[1] = FieldAnnotation {
        cbuffer_offset: Some(64),
        precise: true,
        ..FieldAnnotation::named("intensity")
    };

    let mut main = FunctionAnnotation::new(1);
    main.parameters[0].qualifier = ParameterQualifier::In;
    main.parameters[0].field.semantic = Some("SV_OutputControlPointID".to_string());
    main.parameters[0].field.component_type = Some(ComponentType::U32);

    let mut type_system = TypeSystem::default();
    type_system.structs.insert(symbols.light, light);
    type_system.functions.insert(symbols.main, main);
    type_system
}
