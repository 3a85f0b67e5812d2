//! Accumulation of the input program.
//!
//! [`ProgramBuilder`] records instructions in the order the caller submits them.
//! That order is authoritative for every later pass: it decides block boundaries,
//! the order blocks are discovered in, and the order instructions are emitted in.

use std::collections::HashSet;

use crate::ir::{Instruction, LocalId, Offset};

/// A finished input program.
///
/// Besides the instruction sequence a program carries two derived sets: every
/// local id mentioned anywhere (destinations and operands), which fresh SSA ids
/// must avoid, and every branch target offset, which marks block leaders.
#[derive(Debug, Clone)]
pub struct Program<T> {
    instructions: Vec<Instruction<T>>,
    locals: HashSet<LocalId>,
    labels: HashSet<Offset>,
}

impl<T> Program<T> {
    /// Returns the instructions in program order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction<T>] {
        &self.instructions
    }

    /// Returns every local id referenced by the program.
    #[must_use]
    pub fn locals(&self) -> &HashSet<LocalId> {
        &self.locals
    }

    /// Returns every branch target offset.
    #[must_use]
    pub fn labels(&self) -> &HashSet<Offset> {
        &self.labels
    }

    /// Returns the number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the program has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the offset of the first instruction, the program entry point.
    #[must_use]
    pub fn entry_offset(&self) -> Option<Offset> {
        self.instructions.first().map(Instruction::offset)
    }

    /// Splits the program into instructions, referenced locals and labels.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Instruction<T>>, HashSet<LocalId>, HashSet<Offset>) {
        (self.instructions, self.locals, self.labels)
    }
}

/// Collects instructions in program order.
///
/// No validation happens while emitting. Offsets must be unique per instruction,
/// which is checked when the control flow graph is built.
///
/// # Examples
///
/// ```rust
/// use ssaform::{LocalId, ProgramBuilder};
///
/// let mut builder = ProgramBuilder::new();
/// builder
///     .emit_assignment(0, "load", LocalId::new(1), [])
///     .emit_branch(1, "brtrue", [LocalId::new(1)], true, 0)
///     .emit_statement(2, "ret", [LocalId::new(1)]);
///
/// let program = builder.finish();
/// assert_eq!(program.len(), 3);
/// assert!(program.labels().contains(&0));
/// assert_eq!(program.locals().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ProgramBuilder<T> {
    program: Program<T>,
}

impl<T> Default for ProgramBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProgramBuilder<T> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: Program {
                instructions: Vec::new(),
                locals: HashSet::new(),
                labels: HashSet::new(),
            },
        }
    }

    /// Appends an assignment of `destination` computed from `operands`.
    pub fn emit_assignment<I>(
        &mut self,
        offset: Offset,
        tag: T,
        destination: LocalId,
        operands: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = LocalId>,
    {
        self.program.locals.insert(destination);
        let operands = self.register_operands(operands);
        self.program.instructions.push(Instruction::Assignment {
            offset,
            tag,
            destination,
            operands,
        });
        self
    }

    /// Appends a statement reading `operands`.
    pub fn emit_statement<I>(&mut self, offset: Offset, tag: T, operands: I) -> &mut Self
    where
        I: IntoIterator<Item = LocalId>,
    {
        let operands = self.register_operands(operands);
        self.program.instructions.push(Instruction::Statement {
            offset,
            tag,
            operands,
        });
        self
    }

    /// Appends a branch to `target` and records `target` as a label.
    pub fn emit_branch<I>(
        &mut self,
        offset: Offset,
        tag: T,
        operands: I,
        conditional: bool,
        target: Offset,
    ) -> &mut Self
    where
        I: IntoIterator<Item = LocalId>,
    {
        let operands = self.register_operands(operands);
        self.program.instructions.push(Instruction::Branch {
            offset,
            tag,
            operands,
            conditional,
            target,
        });
        self.program.labels.insert(target);
        self
    }

    /// Returns the number of instructions emitted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.program.len()
    }

    /// Returns `true` if nothing has been emitted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }

    /// Finishes building and returns the program.
    #[must_use]
    pub fn finish(self) -> Program<T> {
        self.program
    }

    fn register_operands<I>(&mut self, operands: I) -> Vec<LocalId>
    where
        I: IntoIterator<Item = LocalId>,
    {
        let operands: Vec<LocalId> = operands.into_iter().collect();
        self.program.locals.extend(operands.iter().copied());
        operands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l(id: u32) -> LocalId {
        LocalId::new(id)
    }

    #[test]
    fn test_builder_preserves_order() {
        let mut builder = ProgramBuilder::new();
        builder
            .emit_statement(10, 'a', [])
            .emit_assignment(3, 'b', l(1), [l(2)])
            .emit_branch(7, 'c', [], false, 10);

        let program = builder.finish();
        let offsets: Vec<Offset> = program.instructions().iter().map(Instruction::offset).collect();
        assert_eq!(offsets, vec![10, 3, 7]);
        assert_eq!(program.entry_offset(), Some(10));
    }

    #[test]
    fn test_builder_registers_locals_and_labels() {
        let mut builder = ProgramBuilder::new();
        builder
            .emit_assignment(0, (), l(5), [l(1), l(2)])
            .emit_statement(1, (), [l(3)])
            .emit_branch(2, (), [l(4)], true, 0)
            .emit_branch(3, (), [], false, 99);

        let program = builder.finish();
        let mut locals: Vec<u32> = program.locals().iter().map(|l| l.index()).collect();
        locals.sort_unstable();
        assert_eq!(locals, vec![1, 2, 3, 4, 5]);

        let mut labels: Vec<Offset> = program.labels().iter().copied().collect();
        labels.sort_unstable();
        assert_eq!(labels, vec![0, 99]);
    }

    #[test]
    fn test_builder_empty() {
        let builder: ProgramBuilder<()> = ProgramBuilder::default();
        assert!(builder.is_empty());
        let program = builder.finish();
        assert!(program.is_empty());
        assert_eq!(program.entry_offset(), None);
    }
}
