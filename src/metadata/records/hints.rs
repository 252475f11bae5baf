//! Control-flow hint tuples: `[self, "dx.controlflow.hints", hint*]`.
//!
//! The first slot refers to the tuple itself. A hint tuple is built as a placeholder with a
//! null first slot, which is then patched in place to point at the finished tuple.

use crate::{
    ir::{NodeId, Opcode, SymbolId},
    metadata::{
        codec::MetadataCodec,
        layout::control_flow_hints,
        names::CONTROL_FLOW_HINTS,
        scalar::{enum_from_node, enum_to_node, string_from_node, string_to_node, tuple_operands},
    },
    model::ControlFlowHint,
    Result,
};

impl MetadataCodec<'_> {
    /// Builds a self-referencing hint tuple holding `hints` in order.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the placeholder cannot be patched.
    pub fn emit_control_flow_hints(&mut self, hints: &[ControlFlowHint]) -> Result<NodeId> {
        let mut operands = Vec::with_capacity(control_flow_hints::FIRST_HINT + hints.len());
        operands.push(None);
        operands.push(Some(string_to_node(self.container, CONTROL_FLOW_HINTS)));
        for hint in hints {
            operands.push(Some(enum_to_node::<u32, _>(self.container, *hint)));
        }

        let node = self.container.tuple(operands);
        self.container
            .replace_operand(node, control_flow_hints::SELF, Some(node))?;
        Ok(node)
    }

    /// Reads the hints of a hint tuple.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the first slot does not refer to the tuple itself,
    /// the marker string is wrong, or a hint code is unknown.
    pub fn load_control_flow_hints(&self, node: Option<NodeId>) -> Result<Vec<ControlFlowHint>> {
        let operands = tuple_operands(self.container, node)?;
        if operands.len() < control_flow_hints::FIRST_HINT {
            return Err(malformed_error!(
                "Control-flow hint tuple has {} operands, expected at least {}",
                operands.len(),
                control_flow_hints::FIRST_HINT
            ));
        }
        if operands[control_flow_hints::SELF] != node {
            return Err(malformed_error!(
                "Control-flow hint tuple does not refer to itself"
            ));
        }

        let marker = string_from_node(self.container, operands[control_flow_hints::MARKER])?;
        if marker != CONTROL_FLOW_HINTS {
            return Err(malformed_error!(
                "Control-flow hint tuple has marker '{}'",
                marker
            ));
        }

        operands[control_flow_hints::FIRST_HINT..]
            .iter()
            .map(|hint| enum_from_node::<u32, ControlFlowHint>(self.container, *hint))
            .collect()
    }

    /// Attaches `hints` to the branch or switch at `index` in the body of `function`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `function` is not a function, `index` is out of
    /// range, or the instruction is not a branch or switch.
    pub fn annotate_branch(
        &mut self,
        function: SymbolId,
        index: usize,
        hints: &[ControlFlowHint],
    ) -> Result<()> {
        let opcode = self.instruction_opcode(function, index)?;
        if !matches!(opcode, Opcode::Br | Opcode::Switch) {
            return Err(malformed_error!(
                "Control-flow hints on a {:?} instruction",
                opcode
            ));
        }

        let node = self.emit_control_flow_hints(hints)?;
        if let Some(instruction) = self
            .container
            .function_mut(function)
            .and_then(|body| body.instructions.get_mut(index))
        {
            instruction.attach(CONTROL_FLOW_HINTS, node);
        }
        Ok(())
    }

    /// Hints attached to the instruction at `index` in the body of `function`; empty if none.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the instruction does not exist or the attached
    /// tuple is malformed.
    pub fn branch_hints(&self, function: SymbolId, index: usize) -> Result<Vec<ControlFlowHint>> {
        let attachment = self
            .container
            .function(function)
            .and_then(|body| body.instructions.get(index))
            .ok_or_else(|| malformed_error!("No instruction {} in {}", index, function))?
            .attachment(CONTROL_FLOW_HINTS);

        match attachment {
            Some(node) => self.load_control_flow_hints(Some(node)),
            None => Ok(Vec::new()),
        }
    }

    fn instruction_opcode(&self, function: SymbolId, index: usize) -> Result<Opcode> {
        let body = self
            .container
            .function(function)
            .ok_or_else(|| malformed_error!("{} is not a function", function))?;
        body.instructions
            .get(index)
            .map(|instruction| instruction.opcode)
            .ok_or_else(|| {
                malformed_error!(
                    "Instruction {} out of range for '{}' with {} instructions",
                    index,
                    body.name,
                    body.instructions.len()
                )
            })
    }
}
