//! Persisted binary form of a [`Container`].
//!
//! # Layout
//!
//! ```text
//! magic        "DXMD"
//! version      u16
//! struct types count, { name, element count, element type* }
//! symbols      count, { tag u8, payload }
//! nodes        count, { tag u8, payload }
//! named        count, { name, operand count, node id* }
//! ```
//!
//! All counts, lengths and ids are compressed unsigned integers; strings are length prefixed
//! UTF-8. Tuple operands are stored as `id + 1`, with `0` meaning a null slot. Nodes may refer
//! forward (a tuple can reference itself), so references are only checked once every section
//! has been read.
//!
//! Reading never trusts a count to size an allocation up front: every element consumes at
//! least one byte, so a hostile count simply runs into [`crate::Error::OutOfBounds`].

use crate::{
    file::{
        io::{write_compressed_len, write_compressed_uint, write_le},
        parser::Parser,
    },
    ir::{
        function::{FastMathFlags, Function, Instruction, Opcode},
        node::{Constant, DataArray, Node, NodeId},
        symbol::{ElementType, Global, StructType, StructTypeId, Symbol, SymbolId},
        Container,
    },
    Error, Result,
};

/// Leading bytes of every persisted container image.
pub const IMAGE_MAGIC: [u8; 4] = *b"DXMD";

/// Image format revision written by [`Container::to_bytes`].
pub const IMAGE_VERSION: u16 = 1;

/// Maximum nesting of array element types accepted on read.
const MAX_TYPE_DEPTH: usize = 32;

const TYPE_VOID: u8 = 0;
const TYPE_INT: u8 = 1;
const TYPE_HALF: u8 = 2;
const TYPE_FLOAT: u8 = 3;
const TYPE_DOUBLE: u8 = 4;
const TYPE_STRUCT: u8 = 5;
const TYPE_ARRAY: u8 = 6;

const SYMBOL_FUNCTION: u8 = 0;
const SYMBOL_GLOBAL: u8 = 1;
const SYMBOL_UNDEF: u8 = 2;

const NODE_INT: u8 = 0;
const NODE_FLOAT: u8 = 1;
const NODE_STRING: u8 = 2;
const NODE_TUPLE: u8 = 3;
const NODE_VALUE: u8 = 4;
const NODE_BYTES: u8 = 5;
const NODE_WORDS: u8 = 6;
const NODE_ZERO: u8 = 7;

impl Container {
    /// Serializes the container into its persisted image.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a count or id exceeds the compressed integer range.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&IMAGE_MAGIC);
        write_le(&mut buffer, IMAGE_VERSION);

        write_compressed_len(&mut buffer, self.struct_types.len())?;
        for ty in &self.struct_types {
            write_string(&mut buffer, &ty.name)?;
            write_compressed_len(&mut buffer, ty.elements.len())?;
            for element in &ty.elements {
                write_type(&mut buffer, element)?;
            }
        }

        write_compressed_len(&mut buffer, self.symbols.len())?;
        for symbol in &self.symbols {
            write_symbol(&mut buffer, symbol)?;
        }

        write_compressed_len(&mut buffer, self.nodes.len())?;
        for node in &self.nodes {
            write_node(&mut buffer, node)?;
        }

        write_compressed_len(&mut buffer, self.named.len())?;
        for (name, operands) in &self.named {
            write_string(&mut buffer, name)?;
            write_compressed_len(&mut buffer, operands.len())?;
            for operand in operands {
                write_compressed_len(&mut buffer, operand.index())?;
            }
        }

        Ok(buffer)
    }

    /// Reads a persisted image. The result reports [`Container::is_from_persisted`].
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] for empty input, [`crate::Error::OutOfBounds`] for
    /// truncated input, and [`crate::Error::Malformed`] for a bad magic, unknown tags, dangling
    /// references, duplicate named entries or trailing bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Container> {
        if data.is_empty() {
            return Err(Error::Empty);
        }

        let mut parser = Parser::new(data);
        if parser.read_bytes(IMAGE_MAGIC.len())? != IMAGE_MAGIC {
            return Err(malformed_error!("Invalid container image magic"));
        }

        let version = parser.read_le::<u16>()?;
        if version != IMAGE_VERSION {
            return Err(malformed_error!("Unsupported container image version {}", version));
        }

        let mut container = Container::new();
        container.from_persisted = true;

        let type_count = parser.read_compressed_len()?;
        for _ in 0..type_count {
            let name = parser.read_string()?;
            let element_count = parser.read_compressed_len()?;
            let mut elements = Vec::new();
            for _ in 0..element_count {
                elements.push(read_type(&mut parser, 0)?);
            }
            container.add_struct_type(StructType { name, elements });
        }

        let symbol_count = parser.read_compressed_len()?;
        for _ in 0..symbol_count {
            let symbol = read_symbol(&mut parser)?;
            container.add_symbol(symbol);
        }

        let node_count = parser.read_compressed_len()?;
        for _ in 0..node_count {
            let node = read_node(&mut parser)?;
            container.push(node);
        }

        let named_count = parser.read_compressed_len()?;
        for _ in 0..named_count {
            let name = parser.read_string()?;
            container.insert_named(&name)?;
            let operand_count = parser.read_compressed_len()?;
            for _ in 0..operand_count {
                let operand = read_node_id(&mut parser)?;
                container.add_named_operand(&name, operand)?;
            }
        }

        if parser.has_more_data() {
            return Err(malformed_error!(
                "{} trailing bytes after container image",
                parser.remaining()
            ));
        }

        validate_references(&container)?;
        Ok(container)
    }
}

fn write_string(buffer: &mut Vec<u8>, value: &str) -> Result<()> {
    write_compressed_len(buffer, value.len())?;
    buffer.extend_from_slice(value.as_bytes());
    Ok(())
}

fn write_type(buffer: &mut Vec<u8>, ty: &ElementType) -> Result<()> {
    match ty {
        ElementType::Void => buffer.push(TYPE_VOID),
        ElementType::Int(bits) => {
            buffer.push(TYPE_INT);
            buffer.push(*bits);
        }
        ElementType::Half => buffer.push(TYPE_HALF),
        ElementType::Float => buffer.push(TYPE_FLOAT),
        ElementType::Double => buffer.push(TYPE_DOUBLE),
        ElementType::Struct(id) => {
            buffer.push(TYPE_STRUCT);
            write_compressed_len(buffer, id.index())?;
        }
        ElementType::Array(element, len) => {
            buffer.push(TYPE_ARRAY);
            write_le(buffer, *len);
            write_type(buffer, element)?;
        }
    }
    Ok(())
}

fn write_symbol(buffer: &mut Vec<u8>, symbol: &Symbol) -> Result<()> {
    match symbol {
        Symbol::Function(function) => {
            buffer.push(SYMBOL_FUNCTION);
            write_string(buffer, &function.name)?;
            write_type(buffer, &function.return_type)?;
            write_compressed_len(buffer, function.params.len())?;
            for param in &function.params {
                write_type(buffer, param)?;
            }
            write_compressed_len(buffer, function.instructions.len())?;
            for instruction in &function.instructions {
                write_instruction(buffer, instruction)?;
            }
        }
        Symbol::Global(global) => {
            buffer.push(SYMBOL_GLOBAL);
            write_string(buffer, &global.name)?;
            write_type(buffer, &global.ty)?;
        }
        Symbol::Undef(ty) => {
            buffer.push(SYMBOL_UNDEF);
            write_compressed_len(buffer, ty.index())?;
        }
    }
    Ok(())
}

fn write_instruction(buffer: &mut Vec<u8>, instruction: &Instruction) -> Result<()> {
    buffer.push(instruction.opcode as u8);
    match instruction.callee {
        Some(callee) => write_compressed_len(buffer, callee.index() + 1)?,
        None => write_compressed_uint(buffer, 0)?,
    }
    write_type(buffer, &instruction.ty)?;
    buffer.push(instruction.fast_math.bits());
    write_compressed_len(buffer, instruction.attachments.len())?;
    for (key, node) in &instruction.attachments {
        write_string(buffer, key)?;
        write_compressed_len(buffer, node.index())?;
    }
    Ok(())
}

fn write_node(buffer: &mut Vec<u8>, node: &Node) -> Result<()> {
    match node {
        Node::Constant(Constant::Int { bits, value }) => {
            buffer.push(NODE_INT);
            buffer.push(*bits);
            write_le(buffer, *value);
        }
        Node::Constant(Constant::Float(bits)) => {
            buffer.push(NODE_FLOAT);
            write_le(buffer, *bits);
        }
        Node::String(value) => {
            buffer.push(NODE_STRING);
            write_string(buffer, value)?;
        }
        Node::Tuple(operands) => {
            buffer.push(NODE_TUPLE);
            write_compressed_len(buffer, operands.len())?;
            for operand in operands {
                match operand {
                    Some(id) => write_compressed_len(buffer, id.index() + 1)?,
                    None => write_compressed_uint(buffer, 0)?,
                }
            }
        }
        Node::Value(symbol) => {
            buffer.push(NODE_VALUE);
            write_compressed_len(buffer, symbol.index())?;
        }
        Node::Data(DataArray::Bytes(bytes)) => {
            buffer.push(NODE_BYTES);
            write_compressed_len(buffer, bytes.len())?;
            buffer.extend_from_slice(bytes);
        }
        Node::Data(DataArray::Words(words)) => {
            buffer.push(NODE_WORDS);
            write_compressed_len(buffer, words.len())?;
            for word in words {
                write_le(buffer, *word);
            }
        }
        Node::Data(DataArray::Zero { element_bits, len }) => {
            buffer.push(NODE_ZERO);
            buffer.push(*element_bits);
            write_compressed_len(buffer, *len)?;
        }
    }
    Ok(())
}

fn read_type(parser: &mut Parser<'_>, depth: usize) -> Result<ElementType> {
    if depth > MAX_TYPE_DEPTH {
        return Err(malformed_error!("Element type nesting exceeds {}", MAX_TYPE_DEPTH));
    }

    match parser.read_le::<u8>()? {
        TYPE_VOID => Ok(ElementType::Void),
        TYPE_INT => match parser.read_le::<u8>()? {
            bits @ (1 | 8 | 16 | 32 | 64) => Ok(ElementType::Int(bits)),
            bits => Err(malformed_error!("Invalid integer width {}", bits)),
        },
        TYPE_HALF => Ok(ElementType::Half),
        TYPE_FLOAT => Ok(ElementType::Float),
        TYPE_DOUBLE => Ok(ElementType::Double),
        TYPE_STRUCT => Ok(ElementType::Struct(StructTypeId(parser.read_compressed_uint()?))),
        TYPE_ARRAY => {
            let len = parser.read_le::<u32>()?;
            let element = read_type(parser, depth + 1)?;
            Ok(ElementType::Array(Box::new(element), len))
        }
        tag => Err(malformed_error!("Invalid element type tag {}", tag)),
    }
}

fn read_symbol(parser: &mut Parser<'_>) -> Result<Symbol> {
    match parser.read_le::<u8>()? {
        SYMBOL_FUNCTION => {
            let name = parser.read_string()?;
            let return_type = read_type(parser, 0)?;
            let mut params = Vec::new();
            for _ in 0..parser.read_compressed_len()? {
                params.push(read_type(parser, 0)?);
            }
            let mut function = Function::new(&name, params, return_type);
            for _ in 0..parser.read_compressed_len()? {
                function.instructions.push(read_instruction(parser)?);
            }
            Ok(Symbol::Function(function))
        }
        SYMBOL_GLOBAL => {
            let name = parser.read_string()?;
            let ty = read_type(parser, 0)?;
            Ok(Symbol::Global(Global { name, ty }))
        }
        SYMBOL_UNDEF => Ok(Symbol::Undef(StructTypeId(parser.read_compressed_uint()?))),
        tag => Err(malformed_error!("Invalid symbol tag {}", tag)),
    }
}

fn read_instruction(parser: &mut Parser<'_>) -> Result<Instruction> {
    let code = parser.read_le::<u8>()?;
    let Some(opcode) = Opcode::from_repr(code) else {
        return Err(malformed_error!("Invalid opcode {}", code));
    };

    let callee = match parser.read_compressed_uint()? {
        0 => None,
        index => Some(SymbolId(index - 1)),
    };
    let ty = read_type(parser, 0)?;

    let flags = parser.read_le::<u8>()?;
    let Some(fast_math) = FastMathFlags::from_bits(flags) else {
        return Err(malformed_error!("Invalid fast-math flags {:#x}", flags));
    };

    let mut instruction = Instruction {
        opcode,
        callee,
        ty,
        fast_math,
        attachments: Default::default(),
    };
    for _ in 0..parser.read_compressed_len()? {
        let key = parser.read_string()?;
        let node = read_node_id(parser)?;
        instruction.attachments.insert(key, node);
    }

    Ok(instruction)
}

fn read_node(parser: &mut Parser<'_>) -> Result<Node> {
    match parser.read_le::<u8>()? {
        NODE_INT => {
            let bits = parser.read_le::<u8>()?;
            if !matches!(bits, 1 | 8 | 16 | 32 | 64) {
                return Err(malformed_error!("Invalid integer width {}", bits));
            }
            let value = parser.read_le::<u64>()?;
            let constant = Constant::int(bits, value);
            if constant != (Constant::Int { bits, value }) {
                return Err(malformed_error!(
                    "Integer {:#x} does not fit in {} bits",
                    value,
                    bits
                ));
            }
            Ok(Node::Constant(constant))
        }
        NODE_FLOAT => Ok(Node::Constant(Constant::Float(parser.read_le::<u32>()?))),
        NODE_STRING => Ok(Node::String(parser.read_string()?)),
        NODE_TUPLE => {
            let mut operands = Vec::new();
            for _ in 0..parser.read_compressed_len()? {
                operands.push(match parser.read_compressed_uint()? {
                    0 => None,
                    index => Some(NodeId(index - 1)),
                });
            }
            Ok(Node::Tuple(operands))
        }
        NODE_VALUE => Ok(Node::Value(SymbolId(parser.read_compressed_uint()?))),
        NODE_BYTES => {
            let len = parser.read_compressed_len()?;
            Ok(Node::Data(DataArray::Bytes(parser.read_bytes(len)?.to_vec())))
        }
        NODE_WORDS => {
            let mut words = Vec::new();
            for _ in 0..parser.read_compressed_len()? {
                words.push(parser.read_le::<u32>()?);
            }
            Ok(Node::Data(DataArray::Words(words)))
        }
        NODE_ZERO => {
            let element_bits = parser.read_le::<u8>()?;
            let len = parser.read_compressed_len()?;
            Ok(Node::Data(DataArray::Zero { element_bits, len }))
        }
        tag => Err(malformed_error!("Invalid node tag {}", tag)),
    }
}

fn read_node_id(parser: &mut Parser<'_>) -> Result<NodeId> {
    Ok(NodeId(parser.read_compressed_uint()?))
}

/// Checks every id read from an image against the final table sizes.
fn validate_references(container: &Container) -> Result<()> {
    let node_count = container.nodes.len();
    let symbol_count = container.symbols.len();
    let type_count = container.struct_types.len();

    let check_node = |id: NodeId| {
        if id.index() < node_count {
            Ok(())
        } else {
            Err(malformed_error!("Dangling node reference {}", id))
        }
    };
    let check_symbol = |id: SymbolId| {
        if id.index() < symbol_count {
            Ok(())
        } else {
            Err(malformed_error!("Dangling symbol reference {}", id))
        }
    };

    for ty in &container.struct_types {
        for element in &ty.elements {
            check_type(element, type_count)?;
        }
    }

    for symbol in &container.symbols {
        match symbol {
            Symbol::Function(function) => {
                check_type(&function.return_type, type_count)?;
                for param in &function.params {
                    check_type(param, type_count)?;
                }
                for instruction in &function.instructions {
                    check_type(&instruction.ty, type_count)?;
                    if let Some(callee) = instruction.callee {
                        check_symbol(callee)?;
                    }
                    for node in instruction.attachments.values() {
                        check_node(*node)?;
                    }
                }
            }
            Symbol::Global(global) => check_type(&global.ty, type_count)?,
            Symbol::Undef(ty) => check_type(&ElementType::Struct(*ty), type_count)?,
        }
    }

    for node in &container.nodes {
        match node {
            Node::Tuple(operands) => {
                for operand in operands.iter().flatten() {
                    check_node(*operand)?;
                }
            }
            Node::Value(symbol) => check_symbol(*symbol)?,
            _ => {}
        }
    }

    for (_, operands) in &container.named {
        for operand in operands {
            check_node(*operand)?;
        }
    }

    Ok(())
}

fn check_type(ty: &ElementType, type_count: usize) -> Result<()> {
    match ty {
        ElementType::Struct(id) if id.index() >= type_count => {
            Err(malformed_error!("Dangling struct type reference {}", id.index()))
        }
        ElementType::Array(element, _) => check_type(element, type_count),
        _ => Ok(()),
    }
}
