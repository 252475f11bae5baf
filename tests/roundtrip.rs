//! Whole-module emit/load through in-memory and persisted containers.

mod common;

use common::{compute_module, hull_container, hull_module, persist};
use dxilmd::{metadata::names::NamedEntry, prelude::*};

#[test]
fn hull_module_in_memory() -> Result<()> {
    let (mut container, symbols) = hull_container();
    let module = hull_module(&symbols);

    MetadataCodec::new(&mut container).emit_all(&module)?;
    let loaded = MetadataCodec::new(&mut container).load_all()?;

    assert_eq!(loaded, module);
    Ok(())
}

#[test]
fn hull_module_persisted() -> Result<()> {
    let (mut container, symbols) = hull_container();
    let module = hull_module(&symbols);
    MetadataCodec::new(&mut container).emit_all(&module)?;

    let mut image = persist(&container)?;
    assert!(image.is_from_persisted());
    let loaded = MetadataCodec::new(&mut image).load_all()?;
    assert_eq!(loaded, module);

    let body = image.function(symbols.main).ok_or(Error::Empty)?;
    assert_eq!(body.instructions[1].fast_math, FastMathFlags::empty());
    assert_eq!(body.instructions[2].fast_math, FastMathFlags::relaxed());
    assert!(body
        .instructions
        .iter()
        .all(|instruction| instruction.attachment(dxilmd::metadata::names::PRECISE).is_none()));
    Ok(())
}

#[test]
fn image_is_stable() -> Result<()> {
    let (mut container, symbols) = hull_container();
    MetadataCodec::new(&mut container).emit_all(&hull_module(&symbols))?;

    let first = container.to_bytes()?;
    let second = Container::from_bytes(&first)?.to_bytes()?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn compute_module_roundtrip() -> Result<()> {
    let mut container = Container::new();
    let module = compute_module(&mut container);
    MetadataCodec::new(&mut container).emit_all(&module)?;

    assert!(container.named(NamedEntry::Resources.key()).is_none());
    assert!(container.named(NamedEntry::TypeAnnotations.key()).is_none());

    let mut image = persist(&container)?;
    let loaded = MetadataCodec::new(&mut image).load_all()?;
    assert_eq!(loaded.entry.properties.num_threads, Some([64, 1, 1]));
    assert_eq!(loaded, module);
    Ok(())
}

#[test]
fn geometry_module_roundtrip() -> Result<()> {
    let mut container = Container::new();
    let main = container.add_function("gs_main", Vec::new(), ElementType::Void);

    let mut module = ShaderModule::new(ShaderModel::new(ShaderKind::Geometry, 6, 0));
    module.entry.function = Some(main);
    module.entry.name = "gs_main".to_string();
    module.entry.properties.stage = Some(StageState::Geometry(GsState {
        input_primitive: InputPrimitive::Triangle,
        max_vertex_count: 12,
        active_stream_mask: 0b11,
        output_topology: PrimitiveTopology::TriangleStrip,
        instance_count: 2,
    }));

    let mut stream = SignatureElement::new(0, "COLOR");
    stream.component_type = ComponentType::F16;
    stream.semantic_indices = vec![0];
    stream.cols = 4;
    stream.start_row = 0;
    stream.start_col = 0;
    stream.output_stream = 1;
    module.entry.signatures.output.elements.push(stream);

    MetadataCodec::new(&mut container).emit_all(&module)?;
    let loaded = MetadataCodec::new(&mut container).load_all()?;
    assert_eq!(loaded, module);
    Ok(())
}

#[test]
fn domain_module_roundtrip() -> Result<()> {
    let mut container = Container::new();
    let main = container.add_function("ds_main", Vec::new(), ElementType::Void);

    let mut module = ShaderModule::new(ShaderModel::new(ShaderKind::Domain, 6, 1));
    module.entry.function = Some(main);
    module.entry.name = "ds_main".to_string();
    module.entry.properties.stage = Some(StageState::Domain(DsState {
        domain: TessellatorDomain::IsoLine,
        input_control_points: 2,
    }));

    MetadataCodec::new(&mut container).emit_all(&module)?;
    let mut image = persist(&container)?;
    assert_eq!(MetadataCodec::new(&mut image).load_all()?, module);
    Ok(())
}

#[test]
fn branch_hints_survive_image() -> Result<()> {
    let (mut container, symbols) = hull_container();
    let mut codec = MetadataCodec::new(&mut container);
    codec.emit_all(&hull_module(&symbols))?;
    codec.annotate_branch(
        symbols.main,
        3,
        &[ControlFlowHint::Branch, ControlFlowHint::AllowUavCondition],
    )?;

    let mut image = persist(&container)?;
    let codec = MetadataCodec::new(&mut image);
    assert_eq!(
        codec.branch_hints(symbols.main, 3)?,
        vec![ControlFlowHint::Branch, ControlFlowHint::AllowUavCondition]
    );
    assert!(codec.branch_hints(symbols.main, 0)?.is_empty());
    Ok(())
}

#[test]
fn structural_config_accepts_legacy_models() -> Result<()> {
    let mut container = Container::new();
    let module = ShaderModule::new(ShaderModel::new(ShaderKind::Pixel, 5, 1));
    MetadataCodec::new(&mut container).emit_all(&module)?;

    assert!(MetadataCodec::new(&mut container).load_all().is_err());

    let loaded = MetadataCodec::new(&mut container)
        .with_config(CodecConfig::structural())
        .load_all()?;
    assert_eq!(loaded.shader_model, module.shader_model);
    Ok(())
}

#[test]
fn structural_config_leaves_instructions() -> Result<()> {
    let (mut container, symbols) = hull_container();
    MetadataCodec::new(&mut container)
        .with_config(CodecConfig::structural())
        .emit_all(&hull_module(&symbols))?;

    let body = container.function(symbols.main).ok_or(Error::Empty)?;
    assert_eq!(body.instructions[2].fast_math, FastMathFlags::relaxed());
    assert!(body.instructions[1]
        .attachment(dxilmd::metadata::names::PRECISE)
        .is_none());
    Ok(())
}
