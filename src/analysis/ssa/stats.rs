//! Summary counters of one conversion.

use std::fmt;

use strum::{EnumCount, IntoEnumIterator};

use crate::ir::InstructionKind;

/// Statistics returned by [`SsaConverter::process`](crate::SsaConverter::process).
///
/// # Examples
///
/// ```rust
/// use ssaform::{InstructionKind, LocalId, NullSink, SsaConverter};
///
/// let mut converter = SsaConverter::new();
/// converter
///     .emit_assignment(0, (), LocalId::new(1), [])
///     .emit_branch(1, (), [LocalId::new(1)], false, 0);
///
/// let stats = converter.process(&mut NullSink)?;
/// assert_eq!(stats.blocks, 1);
/// assert_eq!(stats.emitted(InstructionKind::Branch), 1);
/// assert_eq!(stats.total_emitted(), 2);
/// # Ok::<(), ssaform::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Blocks created, including dangling ones.
    pub blocks: usize,
    /// Blocks reached by the sequential walk.
    pub reached_blocks: usize,
    /// Branches whose target holds no instruction.
    pub dangling_targets: usize,
    /// Assignments renamed to fresh ids.
    pub definitions: usize,
    /// Phi nodes reported.
    pub phis: usize,
    /// Imported reads with no reaching definition, counted once per block and local.
    pub unresolved_imports: usize,
    /// Emitted instructions, indexed by [`InstructionKind`].
    pub(crate) emitted: [usize; InstructionKind::COUNT],
}

impl ConversionStats {
    /// Returns the number of emitted instructions of `kind`.
    #[must_use]
    pub fn emitted(&self, kind: InstructionKind) -> usize {
        self.emitted[kind as usize]
    }

    /// Returns the number of emitted instructions of every kind.
    #[must_use]
    pub fn total_emitted(&self) -> usize {
        self.emitted.iter().sum()
    }

    pub(crate) fn record_emitted(&mut self, kind: InstructionKind) {
        self.emitted[kind as usize] += 1;
    }
}

impl fmt::Display for ConversionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} blocks ({} reached, {} dangling), {} definitions, {} phis, {} unresolved",
            self.blocks,
            self.reached_blocks,
            self.dangling_targets,
            self.definitions,
            self.phis,
            self.unresolved_imports
        )?;
        for kind in InstructionKind::iter() {
            write!(f, ", {} {kind}", self.emitted(kind))?;
        }
        Ok(())
    }
}
