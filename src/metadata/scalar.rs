//! Conversion between native values and metadata nodes.
//!
//! Every integer field of the format has one fixed width. Decoding checks that width exactly:
//! an `i8` field stored as an `i32` constant is malformed, never silently narrowed, and a
//! negative `i8` comes back as the same negative `i8`.

use crate::{
    ir::{Constant, Container, Node, NodeId, Symbol, SymbolId},
    model::DxilEnum,
    Result,
};

/// A native scalar with a fixed metadata integer width.
pub trait MetadataScalar: Copy {
    /// Width of the metadata integer holding this type.
    const BITS: u8;

    /// Two's complement bit pattern, zero-extended to 64 bits.
    fn to_bits(self) -> u64;

    /// Inverse of [`MetadataScalar::to_bits`]; `bits` is already masked to [`Self::BITS`].
    fn from_bits(bits: u64) -> Self;
}

impl MetadataScalar for bool {
    const BITS: u8 = 1;

    fn to_bits(self) -> u64 {
        u64::from(self)
    }

    fn from_bits(bits: u64) -> Self {
        bits != 0
    }
}

macro_rules! impl_metadata_scalar {
    ($($ty:ty => $unsigned:ty, $bits:expr);* $(;)?) => {
        $(
            impl MetadataScalar for $ty {
                const BITS: u8 = $bits;

                #[allow(clippy::cast_sign_loss)]
                fn to_bits(self) -> u64 {
                    u64::from(self as $unsigned)
                }

                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                fn from_bits(bits: u64) -> Self {
                    bits as $unsigned as $ty
                }
            }
        )*
    };
}

impl_metadata_scalar! {
    i8 => u8, 8;
    u8 => u8, 8;
    i32 => u32, 32;
    u32 => u32, 32;
    u64 => u64, 64;
}

/// Canonical node holding `value`.
pub fn to_node<T: MetadataScalar>(container: &mut Container, value: T) -> NodeId {
    container.constant(Constant::int(T::BITS, value.to_bits()))
}

/// Decodes a scalar of exactly `T`'s width.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `node` is null, not an integer, or of another width.
pub fn from_node<T: MetadataScalar>(container: &Container, node: Option<NodeId>) -> Result<T> {
    Ok(T::from_bits(int_from_node(container, node, T::BITS)?))
}

/// Raw bits of an integer constant of exactly `bits` width.
fn int_from_node(container: &Container, node: Option<NodeId>, bits: u8) -> Result<u64> {
    let Some(id) = node else {
        return Err(malformed_error!("Expected an i{} constant, found null", bits));
    };

    match container.node(id) {
        Some(Node::Constant(Constant::Int { bits: width, value })) if *width == bits => Ok(*value),
        Some(Node::Constant(Constant::Int { bits: width, .. })) => Err(malformed_error!(
            "Expected an i{} constant at {}, found i{}",
            bits,
            id,
            width
        )),
        Some(other) => Err(malformed_error!(
            "Expected an i{} constant at {}, found {}",
            bits,
            id,
            other.shape()
        )),
        None => Err(malformed_error!("Dangling node reference {}", id)),
    }
}

/// Canonical node holding a 32-bit float.
pub fn float_to_node(container: &mut Container, value: f32) -> NodeId {
    container.constant(Constant::float(value))
}

/// Decodes a 32-bit float.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `node` is null or not a float constant.
pub fn float_from_node(container: &Container, node: Option<NodeId>) -> Result<f32> {
    let id = non_null(node, "float")?;
    match container.node(id) {
        Some(Node::Constant(Constant::Float(bits))) => Ok(f32::from_bits(*bits)),
        other => Err(unexpected(id, "float", other)),
    }
}

/// Canonical string node.
pub fn string_to_node(container: &mut Container, value: &str) -> NodeId {
    container.string(value)
}

/// Decodes a string.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `node` is null or not a string.
pub fn string_from_node(container: &Container, node: Option<NodeId>) -> Result<String> {
    let id = non_null(node, "string")?;
    match container.node(id) {
        Some(Node::String(value)) => Ok(value.clone()),
        other => Err(unexpected(id, "string", other)),
    }
}

/// Node holding the code of `value` as a `T`-width integer.
pub fn enum_to_node<T: MetadataScalar, E: DxilEnum>(container: &mut Container, value: E) -> NodeId {
    container.constant(Constant::int(T::BITS, u64::from(value.code())))
}

/// Decodes an enumeration stored as a `T`-width integer.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] on a width mismatch or an unknown code.
pub fn enum_from_node<T: MetadataScalar, E: DxilEnum>(
    container: &Container,
    node: Option<NodeId>,
) -> Result<E> {
    let code = int_from_node(container, node, T::BITS)?;
    u32::try_from(code)
        .ok()
        .and_then(E::from_code)
        .ok_or_else(|| malformed_error!("Invalid {} code {}", E::NAME, code))
}

/// Tuple of `u32` constants, in order.
pub fn u32_vec_to_tuple(container: &mut Container, values: &[u32]) -> NodeId {
    let operands = values
        .iter()
        .map(|value| Some(to_node(container, *value)))
        .collect();
    container.tuple(operands)
}

/// Decodes a tuple of `u32` constants, preserving order.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `node` is not a tuple or any element is not a `u32`.
pub fn tuple_to_u32_vec(container: &Container, node: Option<NodeId>) -> Result<Vec<u32>> {
    tuple_operands(container, node)?
        .iter()
        .map(|operand| from_node::<u32>(container, *operand))
        .collect()
}

/// Operands of a non-null tuple.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `node` is null or not a tuple.
pub fn tuple_operands(container: &Container, node: Option<NodeId>) -> Result<&[Option<NodeId>]> {
    let id = non_null(node, "tuple")?;
    match container.node(id) {
        Some(Node::Tuple(operands)) => Ok(operands),
        other => Err(unexpected(id, "tuple", other)),
    }
}

/// Decodes a value reference.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `node` is null, not a value, or dangling.
pub fn symbol_from_node(container: &Container, node: Option<NodeId>) -> Result<SymbolId> {
    let id = non_null(node, "value")?;
    match container.node(id) {
        Some(Node::Value(symbol)) if container.symbol(*symbol).is_some() => Ok(*symbol),
        Some(Node::Value(symbol)) => Err(malformed_error!("Dangling symbol reference {}", symbol)),
        other => Err(unexpected(id, "value", other)),
    }
}

/// Decodes a value reference that must name a function.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the reference is not a function.
pub fn function_from_node(container: &Container, node: Option<NodeId>) -> Result<SymbolId> {
    let symbol = symbol_from_node(container, node)?;
    match container.symbol(symbol) {
        Some(Symbol::Function(_)) => Ok(symbol),
        Some(other) => Err(malformed_error!(
            "Expected a function at {}, found {}",
            symbol,
            other.kind()
        )),
        None => Err(malformed_error!("Dangling symbol reference {}", symbol)),
    }
}

/// Decodes a nullable reference to a function.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the slot is set but not a function.
pub fn optional_function_from_node(
    container: &Container,
    node: Option<NodeId>,
) -> Result<Option<SymbolId>> {
    match node {
        Some(_) => function_from_node(container, node).map(Some),
        None => Ok(None),
    }
}

/// Decodes a nullable reference to a global variable.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the slot is set but not a global.
pub fn optional_global_from_node(
    container: &Container,
    node: Option<NodeId>,
) -> Result<Option<SymbolId>> {
    if node.is_none() {
        return Ok(None);
    }

    let symbol = symbol_from_node(container, node)?;
    match container.symbol(symbol) {
        Some(Symbol::Global(_)) => Ok(Some(symbol)),
        Some(other) => Err(malformed_error!(
            "Expected a global at {}, found {}",
            symbol,
            other.kind()
        )),
        None => Err(malformed_error!("Dangling symbol reference {}", symbol)),
    }
}

/// Node for an optional symbol reference; `None` becomes a null slot.
pub fn optional_value_to_node(container: &mut Container, symbol: Option<SymbolId>) -> Option<NodeId> {
    symbol.map(|symbol| container.value(symbol))
}

fn non_null(node: Option<NodeId>, expected: &str) -> Result<NodeId> {
    node.ok_or_else(|| malformed_error!("Expected a {}, found null", expected))
}

fn unexpected(id: NodeId, expected: &str, found: Option<&Node>) -> crate::Error {
    match found {
        Some(node) => malformed_error!("Expected a {} at {}, found {}", expected, id, node.shape()),
        None => malformed_error!("Dangling node reference {}", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ir::ElementType,
        model::{ComponentType, SemanticKind},
        Error,
    };

    #[test]
    fn widths_are_exact() {
        let mut container = Container::new();
        let col = to_node(&mut container, -1_i8);
        assert_eq!(from_node::<i8>(&container, Some(col)).unwrap(), -1);
        assert!(matches!(
            from_node::<i32>(&container, Some(col)),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            from_node::<u8>(&container, Some(col)),
            Ok(0xFF)
        ));

        let row = to_node(&mut container, -1_i32);
        assert_eq!(from_node::<i32>(&container, Some(row)).unwrap(), -1);
        assert!(from_node::<i8>(&container, Some(row)).is_err());
        assert!(from_node::<u64>(&container, Some(row)).is_err());

        let flag = to_node(&mut container, true);
        assert!(from_node::<bool>(&container, Some(flag)).unwrap());
        assert!(from_node::<u8>(&container, Some(flag)).is_err());

        let wide = to_node(&mut container, u64::MAX);
        assert_eq!(from_node::<u64>(&container, Some(wide)).unwrap(), u64::MAX);
    }

    #[test]
    fn null_and_wrong_shape() {
        let mut container = Container::new();
        let text = string_to_node(&mut container, "TEXCOORD");
        assert!(from_node::<u32>(&container, None).is_err());
        assert!(from_node::<u32>(&container, Some(text)).is_err());
        assert!(string_from_node(&container, None).is_err());
        assert_eq!(string_from_node(&container, Some(text)).unwrap(), "TEXCOORD");
        assert!(float_from_node(&container, Some(text)).is_err());
        assert!(tuple_operands(&container, Some(text)).is_err());
    }

    #[test]
    fn floats() {
        let mut container = Container::new();
        let node = float_to_node(&mut container, 64.0);
        assert_eq!(float_from_node(&container, Some(node)).unwrap(), 64.0);
        let int = to_node(&mut container, 64_u32);
        assert!(float_from_node(&container, Some(int)).is_err());
    }

    #[test]
    fn enums() {
        let mut container = Container::new();
        let node = enum_to_node::<u8, _>(&mut container, ComponentType::F32);
        assert_eq!(
            enum_from_node::<u8, ComponentType>(&container, Some(node)).unwrap(),
            ComponentType::F32
        );
        assert!(enum_from_node::<u32, ComponentType>(&container, Some(node)).is_err());

        let bad = to_node(&mut container, 200_u8);
        assert!(enum_from_node::<u8, SemanticKind>(&container, Some(bad)).is_err());
    }

    #[test]
    fn u32_vectors_keep_order() {
        let mut container = Container::new();
        let node = u32_vec_to_tuple(&mut container, &[3, 1, 2, 1]);
        assert_eq!(
            tuple_to_u32_vec(&container, Some(node)).unwrap(),
            vec![3, 1, 2, 1]
        );

        let empty = u32_vec_to_tuple(&mut container, &[]);
        assert!(tuple_to_u32_vec(&container, Some(empty)).unwrap().is_empty());

        let byte = to_node(&mut container, 1_u8);
        let mixed = container.tuple(vec![Some(byte)]);
        assert!(tuple_to_u32_vec(&container, Some(mixed)).is_err());
        let holey = container.tuple(vec![None]);
        assert!(tuple_to_u32_vec(&container, Some(holey)).is_err());
    }

    #[test]
    fn symbol_kinds() {
        let mut container = Container::new();
        let main = container.add_function("main", Vec::new(), ElementType::Void);
        let global = container.add_global("g", ElementType::Int(32));
        let main_node = container.value(main);
        let global_node = container.value(global);

        assert_eq!(function_from_node(&container, Some(main_node)).unwrap(), main);
        assert!(function_from_node(&container, Some(global_node)).is_err());
        assert_eq!(optional_function_from_node(&container, None).unwrap(), None);
        assert_eq!(
            optional_global_from_node(&container, Some(global_node)).unwrap(),
            Some(global)
        );
        assert!(optional_global_from_node(&container, Some(main_node)).is_err());
    }
}
