//! Module builders shared by the integration tests.

#![allow(dead_code)]

use dxilmd::prelude::*;

/// Symbols created by [`hull_container`].
pub struct HullSymbols {
    pub main: SymbolId,
    pub patch: SymbolId,
    pub texture: SymbolId,
    pub output: SymbolId,
    pub constants: SymbolId,
    pub sampler: SymbolId,
    pub material: StructTypeId,
}

/// A container with a hull entry, a patch constant function, one global per resource class
/// and a two-element struct type.
///
/// The body of `main` holds, in order: a load, a precise multiply, a relaxed add, a branch and
/// a return.
pub fn hull_container() -> (Container, HullSymbols) {
    let mut container = Container::new();
    let main = container.add_function(
        "main",
        vec![ElementType::Int(32), ElementType::Float],
        ElementType::Float,
    );
    let patch = container.add_function("patch_constants", Vec::new(), ElementType::Void);
    let texture = container.add_global("g_albedo", ElementType::Float);
    let output = container.add_global("g_points", ElementType::Float);
    let constants = container.add_global("Material", ElementType::Float);
    let sampler = container.add_global("g_linear", ElementType::Int(32));
    let material = container.add_struct_type(StructType {
        name: "Material".to_string(),
        elements: vec![ElementType::Float, ElementType::Int(32)],
    });

    if let Some(function) = container.function_mut(main) {
        function
            .instructions
            .push(Instruction::new(Opcode::Load, ElementType::Float));
        function
            .instructions
            .push(Instruction::new(Opcode::FMul, ElementType::Float));
        let mut add = Instruction::new(Opcode::FAdd, ElementType::Float);
        add.fast_math = FastMathFlags::relaxed();
        function.instructions.push(add);
        function
            .instructions
            .push(Instruction::new(Opcode::Br, ElementType::Void));
        function
            .instructions
            .push(Instruction::new(Opcode::Ret, ElementType::Float));
    }

    (
        container,
        HullSymbols {
            main,
            patch,
            texture,
            output,
            constants,
            sampler,
            material,
        },
    )
}

/// A hull 6.0 module bound to the symbols of [`hull_container`] that fills every named entry.
pub fn hull_module(symbols: &HullSymbols) -> ShaderModule {
    let mut module = ShaderModule::new(ShaderModel::new(ShaderKind::Hull, 6, 0));
    module.validator_version = Version::new(1, 1);
    module.entry.function = Some(symbols.main);
    module.entry.name = "main".to_string();

    let mut point = SignatureElement::new(0, "POSITION");
    point.component_type = ComponentType::F32;
    point.interpolation = InterpolationMode::Linear;
    point.semantic_indices = vec![0];
    point.cols = 3;
    point.start_row = 0;
    point.start_col = 0;
    let mut control_point = SignatureElement::new(1, "SV_OutputControlPointID");
    control_point.kind = SemanticKind::OutputControlPointID;
    control_point.component_type = ComponentType::U32;
    control_point.semantic_indices = vec![0];
    module.entry.signatures.input.elements = vec![point.clone(), control_point];
    module.entry.signatures.output.elements = vec![point];

    let mut edges = SignatureElement::new(0, "SV_TessFactor");
    edges.kind = SemanticKind::TessFactor;
    edges.component_type = ComponentType::F32;
    edges.semantic_indices = vec![0, 1, 2, 3];
    edges.rows = 4;
    edges.start_row = 0;
    edges.start_col = 3;
    let mut inside = SignatureElement::new(1, "SV_InsideTessFactor");
    inside.kind = SemanticKind::InsideTessFactor;
    inside.component_type = ComponentType::F32;
    inside.semantic_indices = vec![0, 1];
    inside.rows = 2;
    inside.start_row = 4;
    inside.start_col = 3;
    inside.dynamic_index_mask = 0b1;
    module.entry.signatures.patch_constant.elements = vec![edges, inside];

    module.entry.properties.shader_flags =
        ShaderFlags::ENABLE_RAW_AND_STRUCTURED_BUFFERS | ShaderFlags::ALL_RESOURCES_BOUND;
    module.entry.properties.stage = Some(StageState::Hull(HsState {
        patch_constant_function: Some(symbols.patch),
        input_control_points: 4,
        output_control_points: 4,
        domain: TessellatorDomain::Quad,
        partitioning: TessellatorPartitioning::FractionalOdd,
        output_primitive: TessellatorOutputPrimitive::TriangleCCW,
        max_tess_factor: 15.5,
    }));

    let mut albedo = Resource::srv(ResourceKind::Texture2DArray);
    albedo.base.id = 0;
    albedo.base.global_symbol = Some(symbols.texture);
    albedo.base.global_name = "g_albedo".to_string();
    albedo.base.lower_bound = 2;
    albedo.base.range_size = 4;
    albedo.component_type = ComponentType::UNormF32;

    let mut points = Resource::uav(ResourceKind::StructuredBuffer);
    points.base.global_symbol = Some(symbols.output);
    points.base.global_name = "g_points".to_string();
    points.base.space = 3;
    points.element_stride = 16;
    points.globally_coherent = true;
    points.rov = true;

    let mut material = CBuffer::new();
    material.base.global_symbol = Some(symbols.constants);
    material.base.global_name = "Material".to_string();
    material.size = 8;

    let mut linear = Sampler::new();
    linear.base.global_symbol = Some(symbols.sampler);
    linear.base.global_name = "g_linear".to_string();

    module.resources = ResourceLists {
        srvs: vec![albedo],
        uavs: vec![points],
        cbuffers: vec![material],
        samplers: vec![linear],
    };

    let mut annotation = StructAnnotation::new(2);
    annotation.cbuffer_size = 8;
    annotation.fields[0] = FieldAnnotation {
        cbuffer_offset: Some(0),
        component_type: Some(ComponentType::F32),
        ..FieldAnnotation::named("roughness")
    };
    annotation.fields[1] = FieldAnnotation {
        cbuffer_offset: Some(4),
        component_type: Some(ComponentType::I32),
        interpolation: Some(InterpolationMode::Constant),
        ..FieldAnnotation::named("layer")
    };
    module
        .type_system
        .structs
        .insert(symbols.material, annotation);

    let mut function = FunctionAnnotation::new(2);
    function.return_annotation.qualifier = ParameterQualifier::Out;
    function.return_annotation.field.semantic = Some("POSITION".to_string());
    function.parameters[0].field.semantic = Some("SV_OutputControlPointID".to_string());
    function.parameters[0].semantic_indices = vec![0];
    function.parameters[1].qualifier = ParameterQualifier::Inout;
    function.parameters[1].field.precise = true;
    module
        .type_system
        .functions
        .insert(symbols.main, function);

    module.root_signature = RootSignature::from_serialized(vec![1, 0, 0, 0, 0, 0, 0, 0]);
    module.view_id_state = ViewIdState::from_serialized(&[2, 0x3, 0x0, 0xF]);
    module
}

/// A compute module without resources or signatures.
pub fn compute_module(container: &mut Container) -> ShaderModule {
    let main = container.add_function("cs_main", Vec::new(), ElementType::Void);
    let mut module = ShaderModule::new(ShaderModel::new(ShaderKind::Compute, 6, 1));
    module.entry.function = Some(main);
    module.entry.name = "cs_main".to_string();
    module.entry.properties.num_threads = Some([64, 1, 1]);
    module
}

/// Passes `container` through its persisted image.
pub fn persist(container: &Container) -> dxilmd::Result<Container> {
    Container::from_bytes(&container.to_bytes()?)
}
