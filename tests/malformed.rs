//! Loading hand-built trees and images that do not have the expected shape.

mod common;

use common::{hull_container, hull_module, persist};
use dxilmd::{
    metadata::{
        layout::{resource_base, tags},
        names::{NamedEntry, CONTROL_FLOW_HINTS},
        scalar::{string_to_node, to_node},
    },
    prelude::*,
};

fn is_malformed<T: std::fmt::Debug>(result: Result<T>) -> bool {
    matches!(result, Err(Error::Malformed { .. }))
}

fn add_entry(container: &mut Container, entry: NamedEntry, node: NodeId) -> Result<()> {
    container.insert_named(entry.key())?;
    container.add_named_operand(entry.key(), node)
}

#[test]
fn empty_container_has_no_module() {
    let mut container = Container::new();
    assert!(is_malformed(MetadataCodec::new(&mut container).load_all()));
}

#[test]
fn version_arity() -> Result<()> {
    let mut container = Container::new();
    let one = to_node(&mut container, 1_u32);
    let tuple = container.tuple(vec![Some(one)]);
    add_entry(&mut container, NamedEntry::Version, tuple)?;

    assert!(is_malformed(
        MetadataCodec::new(&mut container).load_dxil_version()
    ));
    Ok(())
}

#[test]
fn version_scalar_width() -> Result<()> {
    let mut container = Container::new();
    let major = to_node(&mut container, 1_u64);
    let minor = to_node(&mut container, 1_u32);
    let tuple = container.tuple(vec![Some(major), Some(minor)]);
    add_entry(&mut container, NamedEntry::Version, tuple)?;

    assert!(is_malformed(
        MetadataCodec::new(&mut container).load_dxil_version()
    ));
    Ok(())
}

#[test]
fn version_entry_with_two_operands() -> Result<()> {
    let mut container = Container::new();
    let one = to_node(&mut container, 1_u32);
    let first = container.tuple(vec![Some(one), Some(one)]);
    let second = container.tuple(vec![Some(one), Some(one)]);
    add_entry(&mut container, NamedEntry::Version, first)?;
    container.add_named_operand(NamedEntry::Version.key(), second)?;

    assert!(is_malformed(
        MetadataCodec::new(&mut container).load_dxil_version()
    ));
    Ok(())
}

#[test]
fn unknown_shader_model() -> Result<()> {
    let mut container = Container::new();
    let prefix = string_to_node(&mut container, "xs");
    let six = to_node(&mut container, 6_u32);
    let zero = to_node(&mut container, 0_u32);
    let tuple = container.tuple(vec![Some(prefix), Some(six), Some(zero)]);
    add_entry(&mut container, NamedEntry::ShaderModel, tuple)?;

    let mut codec = MetadataCodec::new(&mut container).with_config(CodecConfig::structural());
    assert!(is_malformed(codec.load_shader_model()));
    Ok(())
}

#[test]
fn odd_tag_value_list() {
    let mut container = Container::new();
    let tag = to_node(&mut container, tags::ENTRY_SHADER_FLAGS);
    let list = container.tuple(vec![Some(tag)]);

    let codec = MetadataCodec::new(&mut container);
    assert!(is_malformed(codec.load_entry_properties(Some(list))));
}

#[test]
fn unknown_entry_property() {
    let mut container = Container::new();
    let tag = to_node(&mut container, 999_u32);
    let value = to_node(&mut container, 1_u32);
    let list = container.tuple(vec![Some(tag), Some(value)]);

    let codec = MetadataCodec::new(&mut container);
    assert!(is_malformed(codec.load_entry_properties(Some(list))));
}

#[test]
fn shader_flags_width() {
    let mut container = Container::new();
    let tag = to_node(&mut container, tags::ENTRY_SHADER_FLAGS);
    let value = to_node(&mut container, 0x10_u32);
    let list = container.tuple(vec![Some(tag), Some(value)]);

    let codec = MetadataCodec::new(&mut container);
    assert!(is_malformed(codec.load_entry_properties(Some(list))));
}

#[test]
fn resource_global_must_be_a_global() -> Result<()> {
    let (mut container, symbols) = hull_container();
    let module = hull_module(&symbols);
    let mut codec = MetadataCodec::new(&mut container);
    let srv = codec.emit_srv(&module.resources.srvs[0])?;

    let function = codec.container_mut().value(symbols.main);
    codec
        .container_mut()
        .replace_operand(srv, resource_base::GLOBAL_SYMBOL, Some(function))?;
    assert!(is_malformed(codec.load_srv(Some(srv))));
    Ok(())
}

#[test]
fn resource_record_arity() -> Result<()> {
    let (mut container, symbols) = hull_container();
    let module = hull_module(&symbols);
    let mut codec = MetadataCodec::new(&mut container);
    let sampler = codec.emit_sampler(&module.resources.samplers[0])?;

    let operands = codec
        .container()
        .tuple_operands(sampler)
        .ok_or(Error::Empty)?
        .to_vec();
    let truncated = codec
        .container_mut()
        .tuple(operands[..operands.len() - 1].to_vec());
    assert!(is_malformed(codec.load_sampler(Some(truncated))));
    Ok(())
}

#[test]
fn hint_tuple_must_refer_to_itself() {
    let mut container = Container::new();
    let marker = string_to_node(&mut container, CONTROL_FLOW_HINTS);
    let hint = to_node(&mut container, ControlFlowHint::Flatten.code());
    let tuple = container.tuple(vec![None, Some(marker), Some(hint)]);

    let codec = MetadataCodec::new(&mut container);
    assert!(is_malformed(codec.load_control_flow_hints(Some(tuple))));
}

#[test]
fn hints_only_on_branches() -> Result<()> {
    let (mut container, symbols) = hull_container();
    let mut codec = MetadataCodec::new(&mut container);
    assert!(is_malformed(codec.annotate_branch(
        symbols.main,
        1,
        &[ControlFlowHint::Flatten]
    )));
    assert!(is_malformed(codec.annotate_branch(
        symbols.main,
        64,
        &[ControlFlowHint::Flatten]
    )));
    codec.annotate_branch(symbols.main, 3, &[ControlFlowHint::Flatten])?;
    Ok(())
}

#[test]
fn two_entry_points() -> Result<()> {
    let (mut container, symbols) = hull_container();
    let module = hull_module(&symbols);
    let mut codec = MetadataCodec::new(&mut container);
    codec.emit_all(&module)?;

    let entry = codec.load_entry_points()?[0];
    codec
        .container_mut()
        .add_named_operand(NamedEntry::EntryPoints.key(), entry)?;
    assert!(is_malformed(codec.load_all()));
    Ok(())
}

#[test]
fn entry_function_must_be_a_function() -> Result<()> {
    let (mut container, symbols) = hull_container();
    let mut module = hull_module(&symbols);
    module.entry.function = Some(symbols.texture);
    assert!(is_malformed(MetadataCodec::new(&mut container).emit_all(&module)));
    Ok(())
}

#[test]
fn annotation_field_count_must_match_struct() -> Result<()> {
    let (mut container, symbols) = hull_container();
    let mut module = hull_module(&symbols);
    if let Some(annotation) = module.type_system.structs.get_mut(&symbols.material) {
        annotation.fields.pop();
    }
    assert!(is_malformed(MetadataCodec::new(&mut container).emit_all(&module)));
    Ok(())
}

#[test]
fn broken_images() -> Result<()> {
    let (mut container, symbols) = hull_container();
    MetadataCodec::new(&mut container).emit_all(&hull_module(&symbols))?;
    let image = container.to_bytes()?;

    assert!(matches!(Container::from_bytes(&[]), Err(Error::Empty)));
    assert!(matches!(
        Container::from_bytes(&image[..image.len() / 2]),
        Err(Error::OutOfBounds)
    ));

    let mut magic = image.clone();
    magic[0] = b'X';
    assert!(is_malformed(Container::from_bytes(&magic)));

    let mut trailing = image;
    trailing.push(0);
    assert!(is_malformed(Container::from_bytes(&trailing)));
    Ok(())
}

#[test]
fn persisted_tree_is_checked_on_load() -> Result<()> {
    let (mut container, symbols) = hull_container();
    MetadataCodec::new(&mut container).emit_all(&hull_module(&symbols))?;
    container.erase_named(NamedEntry::ShaderModel.key());

    let mut image = persist(&container)?;
    assert!(is_malformed(MetadataCodec::new(&mut image).load_all()));
    Ok(())
}
