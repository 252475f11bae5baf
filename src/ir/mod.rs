//! The IR container holding the metadata graph.
//!
//! # Key Components
//!
//! - [`Container`] - Node arena, named top-level entries, symbols and struct types
//! - [`node`] - Node shapes ([`Node`], [`Constant`], [`DataArray`]) and [`NodeId`]
//! - [`symbol`] - Symbols, struct types and element types
//! - [`function`] - Functions, instructions and fast-math flags
//! - [`image`] - The persisted binary form of a container

pub mod function;
pub mod image;
pub mod interner;
pub mod node;
pub mod symbol;

use std::collections::HashMap;

pub use function::{FastMathFlags, Function, Instruction, Opcode};
pub use node::{Constant, DataArray, Node, NodeId};
pub use symbol::{ElementType, Global, StructType, StructTypeId, Symbol, SymbolId};

use crate::{ir::interner::Interner, Result};

/// An IR document: an arena of metadata nodes plus the symbols they refer to.
///
/// Named top-level entries are append-only lists of root nodes, kept in insertion order.
/// Value-like nodes (constants, strings, value references, data arrays) are memoized, so asking
/// for the same scalar twice returns the same [`NodeId`]; tuples are always fresh.
#[derive(Default, Debug, Clone)]
pub struct Container {
    nodes: Vec<Node>,
    interner: Interner,
    named: Vec<(String, Vec<NodeId>)>,
    symbols: Vec<Symbol>,
    struct_types: Vec<StructType>,
    undefs: HashMap<StructTypeId, SymbolId>,
    from_persisted: bool,
}

impl Container {
    /// Creates an empty, in-memory container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this container was produced by reading a persisted image.
    #[must_use]
    pub fn is_from_persisted(&self) -> bool {
        self.from_persisted
    }

    // ---------------------------------------------------------------------------------------
    // Nodes
    // ---------------------------------------------------------------------------------------

    /// Node stored under `id`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Canonical node for a value-like shape; allocates on first use.
    ///
    /// Tuples passed here are allocated fresh, like [`Container::tuple`].
    pub fn intern(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.interner.get(&node) {
            return id;
        }
        self.push(node)
    }

    /// Canonical constant node.
    pub fn constant(&mut self, constant: Constant) -> NodeId {
        self.intern(Node::Constant(constant))
    }

    /// Canonical string node.
    pub fn string(&mut self, value: &str) -> NodeId {
        self.intern(Node::String(value.to_string()))
    }

    /// Canonical value-reference node for `symbol`.
    pub fn value(&mut self, symbol: SymbolId) -> NodeId {
        self.intern(Node::Value(symbol))
    }

    /// Canonical data-array node.
    pub fn data(&mut self, data: DataArray) -> NodeId {
        self.intern(Node::Data(data))
    }

    /// Allocates a new tuple. Two calls with equal operands produce two distinct tuples.
    pub fn tuple(&mut self, operands: Vec<Option<NodeId>>) -> NodeId {
        self.push(Node::Tuple(operands))
    }

    /// Operands of the tuple `id`, or `None` if `id` is not a tuple.
    #[must_use]
    pub fn tuple_operands(&self, id: NodeId) -> Option<&[Option<NodeId>]> {
        match self.node(id) {
            Some(Node::Tuple(operands)) => Some(operands),
            _ => None,
        }
    }

    /// Overwrites operand `slot` of tuple `id` in place.
    ///
    /// Every holder of `id` observes the new operand; this is how a tuple is made to reference
    /// itself.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `id` is not a tuple or `slot` is out of range.
    pub fn replace_operand(
        &mut self,
        id: NodeId,
        slot: usize,
        operand: Option<NodeId>,
    ) -> Result<()> {
        match self.nodes.get_mut(id.index()) {
            Some(Node::Tuple(operands)) => match operands.get_mut(slot) {
                Some(entry) => {
                    *entry = operand;
                    Ok(())
                }
                None => Err(malformed_error!(
                    "Operand {} out of range for tuple {} of length {}",
                    slot,
                    id,
                    operands.len()
                )),
            },
            _ => Err(malformed_error!("Node {} is not a tuple", id)),
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.interner.record(&node, id);
        self.nodes.push(node);
        id
    }

    // ---------------------------------------------------------------------------------------
    // Named top-level entries
    // ---------------------------------------------------------------------------------------

    /// Operands of the named entry `name`, or `None` if it does not exist.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&[NodeId]> {
        self.named
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, operands)| operands.as_slice())
    }

    /// Creates the empty named entry `name`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry already exists.
    pub fn insert_named(&mut self, name: &str) -> Result<()> {
        if self.named(name).is_some() {
            return Err(malformed_error!("Named metadata '{}' already exists", name));
        }
        self.named.push((name.to_string(), Vec::new()));
        Ok(())
    }

    /// Removes the named entry `name`. Returns `true` if it existed.
    pub fn erase_named(&mut self, name: &str) -> bool {
        let before = self.named.len();
        self.named.retain(|(entry, _)| entry != name);
        before != self.named.len()
    }

    /// Appends `operand` to the existing named entry `name`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry does not exist.
    pub fn add_named_operand(&mut self, name: &str, operand: NodeId) -> Result<()> {
        match self.named.iter_mut().find(|(entry, _)| entry == name) {
            Some((_, operands)) => {
                operands.push(operand);
                Ok(())
            }
            None => Err(malformed_error!("Named metadata '{}' does not exist", name)),
        }
    }

    /// Names of all named entries, in insertion order.
    pub fn named_entries(&self) -> impl Iterator<Item = &str> {
        self.named.iter().map(|(name, _)| name.as_str())
    }

    // ---------------------------------------------------------------------------------------
    // Symbols and types
    // ---------------------------------------------------------------------------------------

    /// Adds a symbol and returns its id.
    pub fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        if let Symbol::Undef(ty) = &symbol {
            self.undefs.entry(*ty).or_insert(id);
        }
        self.symbols.push(symbol);
        id
    }

    /// Adds a function without a body.
    pub fn add_function(
        &mut self,
        name: &str,
        params: Vec<ElementType>,
        return_type: ElementType,
    ) -> SymbolId {
        self.add_symbol(Symbol::Function(Function::new(name, params, return_type)))
    }

    /// Adds a global variable.
    pub fn add_global(&mut self, name: &str, ty: ElementType) -> SymbolId {
        self.add_symbol(Symbol::Global(Global {
            name: name.to_string(),
            ty,
        }))
    }

    /// Symbol stored under `id`.
    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    /// All symbols, indexed by [`SymbolId::index`].
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Function stored under `id`, if that symbol is a function.
    #[must_use]
    pub fn function(&self, id: SymbolId) -> Option<&Function> {
        match self.symbols.get(id.index()) {
            Some(Symbol::Function(function)) => Some(function),
            _ => None,
        }
    }

    /// Mutable access to the function stored under `id`.
    pub fn function_mut(&mut self, id: SymbolId) -> Option<&mut Function> {
        match self.symbols.get_mut(id.index()) {
            Some(Symbol::Function(function)) => Some(function),
            _ => None,
        }
    }

    /// Iterates mutably over every function body.
    pub fn functions_mut(&mut self) -> impl Iterator<Item = &mut Function> {
        self.symbols.iter_mut().filter_map(|symbol| match symbol {
            Symbol::Function(function) => Some(function),
            _ => None,
        })
    }

    /// First symbol whose name is `name`. Undef values have no name.
    #[must_use]
    pub fn find_symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols
            .iter()
            .position(|symbol| match symbol {
                Symbol::Function(function) => function.name == name,
                Symbol::Global(global) => global.name == name,
                Symbol::Undef(_) => false,
            })
            .map(|index| SymbolId(index as u32))
    }

    /// The (memoized) undefined value of struct type `ty`.
    pub fn undef(&mut self, ty: StructTypeId) -> SymbolId {
        match self.undefs.get(&ty) {
            Some(id) => *id,
            None => self.add_symbol(Symbol::Undef(ty)),
        }
    }

    /// Adds a struct type and returns its id.
    pub fn add_struct_type(&mut self, ty: StructType) -> StructTypeId {
        let id = StructTypeId(self.struct_types.len() as u32);
        self.struct_types.push(ty);
        id
    }

    /// Struct type stored under `id`.
    #[must_use]
    pub fn struct_type(&self, id: StructTypeId) -> Option<&StructType> {
        self.struct_types.get(id.index())
    }

    /// All struct types, indexed by [`StructTypeId::index`].
    #[must_use]
    pub fn struct_types(&self) -> &[StructType] {
        &self.struct_types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn scalars_are_interned_tuples_are_not() {
        let mut container = Container::new();
        let a = container.constant(Constant::int(32, 5));
        let b = container.constant(Constant::int(32, 5));
        let c = container.constant(Constant::int(8, 5));
        assert_eq!(a, b);
        assert_ne!(a, c);

        assert_eq!(container.string("main"), container.string("main"));

        let t1 = container.tuple(vec![Some(a)]);
        let t2 = container.tuple(vec![Some(a)]);
        assert_ne!(t1, t2);
    }

    #[test]
    fn replace_operand_in_place() {
        let mut container = Container::new();
        let marker = container.string("marker");
        let tuple = container.tuple(vec![None, Some(marker)]);
        let holder = container.tuple(vec![Some(tuple)]);

        container.replace_operand(tuple, 0, Some(tuple)).unwrap();

        assert_eq!(
            container.tuple_operands(tuple).unwrap(),
            &[Some(tuple), Some(marker)]
        );
        assert_eq!(container.tuple_operands(holder).unwrap(), &[Some(tuple)]);

        assert!(matches!(
            container.replace_operand(tuple, 2, None),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            container.replace_operand(marker, 0, None),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn named_entries() {
        let mut container = Container::new();
        assert!(container.named("dx.version").is_none());

        container.insert_named("dx.version").unwrap();
        assert!(container.insert_named("dx.version").is_err());

        let node = container.tuple(Vec::new());
        container.add_named_operand("dx.version", node).unwrap();
        assert_eq!(container.named("dx.version"), Some(&[node][..]));
        assert!(container.add_named_operand("dx.missing", node).is_err());

        container.insert_named("dx.valver").unwrap();
        assert_eq!(
            container.named_entries().collect::<Vec<_>>(),
            ["dx.version", "dx.valver"]
        );

        assert!(container.erase_named("dx.version"));
        assert!(!container.erase_named("dx.version"));
        assert!(container.named("dx.version").is_none());
    }

    #[test]
    fn undef_is_memoized() {
        let mut container = Container::new();
        let ty = container.add_struct_type(StructType {
            name: "S".into(),
            elements: vec![ElementType::Float],
        });
        let a = container.undef(ty);
        let b = container.undef(ty);
        assert_eq!(a, b);
        assert_eq!(container.symbol(a), Some(&Symbol::Undef(ty)));
    }

    #[test]
    fn symbols() {
        let mut container = Container::new();
        let main = container.add_function("main", Vec::new(), ElementType::Void);
        let global = container.add_global("g_tex", ElementType::Int(32));

        assert!(container.function(main).is_some());
        assert!(container.function(global).is_none());
        assert_eq!(container.find_symbol("g_tex"), Some(global));
        assert_eq!(container.find_symbol("nope"), None);
        assert_eq!(container.functions_mut().count(), 1);
    }
}
