//! The precise marker bridge on floating point instructions.
//!
//! In memory, an instruction is precise when its fast-math flags do not allow unsafe algebra.
//! The persisted form instead carries no fast-math flags at all and marks precise instructions
//! with a `dx.precise` attachment holding `[i32 1]`. [`MetadataCodec::emit_precise_markers`]
//! converts the first form into the second, [`MetadataCodec::load_precise_markers`] converts
//! back; each runs once per direction.

use tracing::debug;

use crate::{
    ir::{FastMathFlags, Instruction, NodeId, Symbol, SymbolId},
    metadata::{
        codec::MetadataCodec,
        layout::{record_operands, RecordKind},
        names::PRECISE,
        scalar::{from_node, to_node},
    },
    Result,
};

impl MetadataCodec<'_> {
    /// Marks every precise floating point instruction and clears the flags of the relaxed
    /// ones. Returns the number of instructions marked.
    pub fn emit_precise_markers(&mut self) -> usize {
        let needs_marker = self.container.symbols().iter().any(|symbol| match symbol {
            Symbol::Function(function) => function.instructions.iter().any(|instruction| {
                instruction.is_fp_math() && !instruction.fast_math.has_unsafe_algebra()
            }),
            _ => false,
        });
        let marker = needs_marker.then(|| self.precise_marker());

        let mut marked = 0;
        for function in self.container.functions_mut() {
            for instruction in &mut function.instructions {
                if !instruction.is_fp_math() {
                    continue;
                }
                if instruction.fast_math.has_unsafe_algebra() {
                    instruction.fast_math = FastMathFlags::empty();
                    instruction.detach(PRECISE);
                } else if let Some(marker) = marker {
                    instruction.attach(PRECISE, marker);
                    marked += 1;
                }
            }
        }

        debug!(marked, "emitted precise markers");
        marked
    }

    /// Restores the fast-math flags of a container read from a persisted image: unmarked
    /// floating point instructions become relaxed, marked ones lose their marker. Returns the
    /// number of markers removed; does nothing for in-memory containers.
    pub fn load_precise_markers(&mut self) -> usize {
        if !self.container.is_from_persisted() {
            debug!("container was built in memory, skipping precise markers");
            return 0;
        }

        let mut unmarked = 0;
        for function in self.container.functions_mut() {
            for instruction in &mut function.instructions {
                if !instruction.is_fp_math() {
                    continue;
                }
                if instruction.detach(PRECISE).is_some() {
                    unmarked += 1;
                } else {
                    instruction.fast_math = FastMathFlags::relaxed();
                }
            }
        }

        debug!(unmarked, "loaded precise markers");
        unmarked
    }

    /// Returns `true` if `instruction` carries a well-formed precise marker.
    #[must_use]
    pub fn is_marked_precise(&self, instruction: &Instruction) -> bool {
        instruction
            .attachment(PRECISE)
            .and_then(|node| {
                record_operands(self.container, Some(node), RecordKind::PreciseMarker).ok()
            })
            .and_then(|operands| from_node::<i32>(self.container, operands[0]).ok())
            == Some(1)
    }

    /// Attaches a precise marker to the instruction at `index` in the body of `function`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `function` is not a function or `index` is out of
    /// range.
    pub fn mark_precise(&mut self, function: SymbolId, index: usize) -> Result<()> {
        let marker = self.precise_marker();
        let body = self
            .container
            .function_mut(function)
            .ok_or_else(|| malformed_error!("{} is not a function", function))?;
        let count = body.instructions.len();
        let instruction = body.instructions.get_mut(index).ok_or_else(|| {
            malformed_error!(
                "Instruction {} out of range for function with {} instructions",
                index,
                count
            )
        })?;
        instruction.attach(PRECISE, marker);
        Ok(())
    }

    fn precise_marker(&mut self) -> NodeId {
        let one = to_node(self.container, 1_i32);
        self.container.tuple(vec![Some(one)])
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ir::{Container, ElementType, FastMathFlags, Instruction, Opcode, SymbolId},
        metadata::names::PRECISE,
        MetadataCodec,
    };

    fn body(relaxed: bool) -> (Container, SymbolId) {
        let mut container = Container::new();
        let main = container.add_function("main", Vec::new(), ElementType::Void);
        if let Some(function) = container.function_mut(main) {
            let mut add = Instruction::new(Opcode::FAdd, ElementType::Float);
            if relaxed {
                add.fast_math = FastMathFlags::relaxed();
            }
            function.instructions.push(add);
            function
                .instructions
                .push(Instruction::new(Opcode::Load, ElementType::Float));
        }
        (container, main)
    }

    fn persisted(container: &Container) -> Container {
        Container::from_bytes(&container.to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn precise_instruction_gets_marker() {
        let (mut container, main) = body(false);
        let mut codec = MetadataCodec::new(&mut container);
        assert_eq!(codec.emit_precise_markers(), 1);

        let function = codec.container().function(main).unwrap();
        assert!(codec.is_marked_precise(&function.instructions[0]));
        assert!(function.instructions[1].attachment(PRECISE).is_none());

        let mut loaded = persisted(&container);
        assert_eq!(MetadataCodec::new(&mut loaded).load_precise_markers(), 1);
        let instruction = &loaded.function(main).unwrap().instructions[0];
        assert!(instruction.attachment(PRECISE).is_none());
        assert_eq!(instruction.fast_math, FastMathFlags::empty());
    }

    #[test]
    fn relaxed_instruction_roundtrip() {
        let (mut container, main) = body(true);
        assert_eq!(MetadataCodec::new(&mut container).emit_precise_markers(), 0);

        let instruction = &container.function(main).unwrap().instructions[0];
        assert_eq!(instruction.fast_math, FastMathFlags::empty());
        assert!(instruction.attachment(PRECISE).is_none());

        let mut loaded = persisted(&container);
        MetadataCodec::new(&mut loaded).load_precise_markers();
        let function = loaded.function(main).unwrap();
        assert_eq!(function.instructions[0].fast_math, FastMathFlags::relaxed());
        assert_eq!(function.instructions[1].fast_math, FastMathFlags::empty());
    }

    #[test]
    fn in_memory_load_is_a_no_op() {
        let (mut container, main) = body(false);
        let mut codec = MetadataCodec::new(&mut container);
        codec.emit_precise_markers();
        assert_eq!(codec.load_precise_markers(), 0);
        let function = codec.container().function(main).unwrap();
        assert!(codec.is_marked_precise(&function.instructions[0]));
    }

    #[test]
    fn mark_precise_by_index() {
        let (mut container, main) = body(true);
        let mut codec = MetadataCodec::new(&mut container);
        codec.mark_precise(main, 1).unwrap();
        assert!(codec.mark_precise(main, 2).is_err());

        let function = codec.container().function(main).unwrap();
        assert!(codec.is_marked_precise(&function.instructions[1]));
        assert!(!codec.is_marked_precise(&function.instructions[0]));
    }
}
