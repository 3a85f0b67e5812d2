//! The register-based instruction model.
//!
//! The converter only needs to know three things about an instruction: which
//! locals it reads, whether it writes a local, and whether it transfers control.
//! Everything else the caller cares about (opcode, constants, types) rides along
//! in the opaque tag `T` and is handed back unchanged on emission.

use strum::{Display, EnumCount, EnumIter};

use crate::ir::LocalId;

/// Program offset of an instruction.
///
/// Offsets identify instructions and, through branch targets, blocks. They need
/// not be contiguous or monotonic but must be unique within a program.
pub type Offset = u32;

/// The three instruction shapes the converter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum InstructionKind {
    /// Writes one destination local
    Assignment,
    /// Reads operands without writing a local
    Statement,
    /// Transfers control to a target offset
    Branch,
}

/// A single instruction of the linear input program.
///
/// Operand lists and assignment destinations are rewritten in place while the
/// program is converted; offsets, tags, branch flags and targets never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction<T> {
    /// `destination = op(operands...)`
    Assignment {
        /// Program offset
        offset: Offset,
        /// Caller-defined payload
        tag: T,
        /// The local written by this instruction
        destination: LocalId,
        /// Locals read by this instruction, in order
        operands: Vec<LocalId>,
    },
    /// An effect that reads `operands` and writes nothing.
    Statement {
        /// Program offset
        offset: Offset,
        /// Caller-defined payload
        tag: T,
        /// Locals read by this instruction, in order
        operands: Vec<LocalId>,
    },
    /// A jump to `target`.
    ///
    /// An unconditional branch never falls through to the next instruction; a
    /// conditional one may.
    Branch {
        /// Program offset
        offset: Offset,
        /// Caller-defined payload
        tag: T,
        /// Locals read by this instruction, in order
        operands: Vec<LocalId>,
        /// Whether control may also continue with the next instruction
        conditional: bool,
        /// Offset of the jump target
        target: Offset,
    },
}

impl<T> Instruction<T> {
    /// Returns the program offset.
    #[must_use]
    pub fn offset(&self) -> Offset {
        match self {
            Instruction::Assignment { offset, .. }
            | Instruction::Statement { offset, .. }
            | Instruction::Branch { offset, .. } => *offset,
        }
    }

    /// Returns the caller-defined tag.
    #[must_use]
    pub fn tag(&self) -> &T {
        match self {
            Instruction::Assignment { tag, .. }
            | Instruction::Statement { tag, .. }
            | Instruction::Branch { tag, .. } => tag,
        }
    }

    /// Returns the operand list.
    #[must_use]
    pub fn operands(&self) -> &[LocalId] {
        match self {
            Instruction::Assignment { operands, .. }
            | Instruction::Statement { operands, .. }
            | Instruction::Branch { operands, .. } => operands,
        }
    }

    /// Returns the operand list for in-place rewriting.
    pub fn operands_mut(&mut self) -> &mut [LocalId] {
        match self {
            Instruction::Assignment { operands, .. }
            | Instruction::Statement { operands, .. }
            | Instruction::Branch { operands, .. } => operands,
        }
    }

    /// Returns the destination of an assignment.
    #[must_use]
    pub fn destination(&self) -> Option<LocalId> {
        match self {
            Instruction::Assignment { destination, .. } => Some(*destination),
            _ => None,
        }
    }

    /// Returns `(conditional, target)` for a branch.
    #[must_use]
    pub fn branch_target(&self) -> Option<(bool, Offset)> {
        match self {
            Instruction::Branch {
                conditional,
                target,
                ..
            } => Some((*conditional, *target)),
            _ => None,
        }
    }

    /// Returns the kind of this instruction.
    #[must_use]
    pub fn kind(&self) -> InstructionKind {
        match self {
            Instruction::Assignment { .. } => InstructionKind::Assignment,
            Instruction::Statement { .. } => InstructionKind::Statement,
            Instruction::Branch { .. } => InstructionKind::Branch,
        }
    }

    /// Returns `true` for branches.
    #[must_use]
    pub fn is_branch(&self) -> bool {
        matches!(self, Instruction::Branch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_accessors() {
        let assign = Instruction::Assignment {
            offset: 4,
            tag: "add",
            destination: LocalId::new(1),
            operands: vec![LocalId::new(2), LocalId::new(3)],
        };
        assert_eq!(assign.offset(), 4);
        assert_eq!(*assign.tag(), "add");
        assert_eq!(assign.destination(), Some(LocalId::new(1)));
        assert_eq!(assign.operands(), &[LocalId::new(2), LocalId::new(3)]);
        assert_eq!(assign.branch_target(), None);
        assert_eq!(assign.kind(), InstructionKind::Assignment);
        assert!(!assign.is_branch());

        let branch: Instruction<&str> = Instruction::Branch {
            offset: 8,
            tag: "brtrue",
            operands: vec![LocalId::new(1)],
            conditional: true,
            target: 0,
        };
        assert_eq!(branch.destination(), None);
        assert_eq!(branch.branch_target(), Some((true, 0)));
        assert!(branch.is_branch());
    }

    #[test]
    fn test_operands_mut() {
        let mut stmt = Instruction::Statement {
            offset: 0,
            tag: (),
            operands: vec![LocalId::new(1), LocalId::new(1)],
        };
        stmt.operands_mut()[1] = LocalId::new(9);
        assert_eq!(stmt.operands(), &[LocalId::new(1), LocalId::new(9)]);
    }

    #[test]
    fn test_kind_names() {
        let names: Vec<String> = InstructionKind::iter().map(|k| k.to_string()).collect();
        assert_eq!(names, vec!["assignment", "statement", "branch"]);
        assert_eq!(InstructionKind::COUNT, 3);
    }
}
