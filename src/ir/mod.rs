//! Input program representation.
//!
//! The caller describes a function body as a flat list of instructions over
//! integer-named locals:
//!
//! - [`Instruction`] - Assignment, statement or branch with an opaque tag
//! - [`LocalId`] - A local variable slot, before or after renaming
//! - [`ProgramBuilder`] / [`Program`] - The instruction sequence plus the local
//!   and label sets derived while emitting

mod instruction;
mod local;
mod program;

pub use instruction::{Instruction, InstructionKind, Offset};
pub use local::LocalId;
pub use program::{Program, ProgramBuilder};
