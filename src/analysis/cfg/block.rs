//! Basic blocks of the control flow graph.

use std::collections::{BTreeMap, BTreeSet};

use crate::ir::{Instruction, InstructionKind, LocalId, Offset};

/// A basic block: a maximal run of instructions entered only at its first one.
///
/// A block is identified by the offset of its first instruction. Blocks created
/// for a branch target that the sequential walk never reaches keep their offset
/// but stay empty.
///
/// After the renaming pass a block also records how it interacts with the rest
/// of the program:
///
/// - `imported` - original locals read before any write inside the block; their
///   value flows in from predecessors
/// - `exported` - for each original local written inside the block, the SSA id of
///   the last write, which is what successors observe
#[derive(Debug, Clone)]
pub struct Block<T> {
    offset: Offset,
    instructions: Vec<Instruction<T>>,
    imported: BTreeSet<LocalId>,
    exported: BTreeMap<LocalId, LocalId>,
}

impl<T> Block<T> {
    /// Creates an empty block starting at `offset`.
    #[must_use]
    pub fn new(offset: Offset) -> Self {
        Self {
            offset,
            instructions: Vec::new(),
            imported: BTreeSet::new(),
            exported: BTreeMap::new(),
        }
    }

    /// Returns the offset of the block's first instruction.
    #[must_use]
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Returns the instructions in program order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction<T>] {
        &self.instructions
    }

    /// Returns the instruction list for in-place rewriting.
    pub fn instructions_mut(&mut self) -> &mut Vec<Instruction<T>> {
        &mut self.instructions
    }

    /// Appends an instruction.
    pub fn push(&mut self, instruction: Instruction<T>) {
        self.instructions.push(instruction);
    }

    /// Returns the number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the block holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the number of assignments, i.e. SSA definitions the block will mint.
    #[must_use]
    pub fn assignment_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.kind() == InstructionKind::Assignment)
            .count()
    }

    /// Returns the original locals read before being written in this block.
    #[must_use]
    pub fn imported(&self) -> &BTreeSet<LocalId> {
        &self.imported
    }

    /// Returns the map from original local to the SSA id live at block exit.
    #[must_use]
    pub fn exported(&self) -> &BTreeMap<LocalId, LocalId> {
        &self.exported
    }

    /// Returns `true` if `local` is read before any write in this block.
    #[must_use]
    pub fn imports(&self, local: LocalId) -> bool {
        self.imported.contains(&local)
    }

    /// Returns the SSA id this block exports for the original `local`.
    #[must_use]
    pub fn exported_local(&self, local: LocalId) -> Option<LocalId> {
        self.exported.get(&local).copied()
    }

    /// Stores the result of renaming this block.
    pub fn set_locals(
        &mut self,
        imported: BTreeSet<LocalId>,
        exported: BTreeMap<LocalId, LocalId>,
    ) {
        self.imported = imported;
        self.exported = exported;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_instructions() {
        let mut block = Block::new(12);
        assert!(block.is_empty());
        assert_eq!(block.offset(), 12);

        block.push(Instruction::Assignment {
            offset: 12,
            tag: (),
            destination: LocalId::new(1),
            operands: vec![],
        });
        block.push(Instruction::Statement {
            offset: 13,
            tag: (),
            operands: vec![LocalId::new(1)],
        });

        assert_eq!(block.len(), 2);
        assert_eq!(block.assignment_count(), 1);
    }

    #[test]
    fn test_block_locals() {
        let mut block: Block<()> = Block::new(0);
        block.set_locals(
            BTreeSet::from([LocalId::new(3)]),
            BTreeMap::from([(LocalId::new(1), LocalId::new(7))]),
        );

        assert!(block.imports(LocalId::new(3)));
        assert!(!block.imports(LocalId::new(1)));
        assert_eq!(block.exported_local(LocalId::new(1)), Some(LocalId::new(7)));
        assert_eq!(block.exported_local(LocalId::new(3)), None);
    }
}
