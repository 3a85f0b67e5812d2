//! Phi node representation for SSA form.
//!
//! Phi nodes represent the merging of values where control flow paths converge.
//! A phi node `v5 = phi(v2 from 0x0, v3 from 0x2)` means: if the value of the
//! original local flowed in from the block at `0x0`, use `v2`; if it came from
//! the block at `0x2`, use `v3`.
//!
//! # Placement
//!
//! Placement is driven by use sites rather than dominance frontiers. A phi is
//! reported when an imported read reaches two or more definitions through the
//! predecessor graph, and it is keyed by the offset of the first instruction in
//! its block that reads the local. Phi nodes are surfaced through
//! [`SsaSink::phi`](crate::SsaSink::phi) and never stored by the converter.

use std::{collections::BTreeMap, fmt};

use crate::ir::{LocalId, Offset};

/// An operand of a phi node: a definition exported by a contributing block.
///
/// # Examples
///
/// ```rust
/// use ssaform::{LocalId, PhiOperand};
///
/// let operand = PhiOperand::new(LocalId::new(2), 0x10);
/// assert_eq!(operand.to_string(), "v2 from 0x10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhiOperand {
    /// The SSA id live at exit of the contributing block.
    value: LocalId,
    /// Start offset of the contributing block.
    predecessor: Offset,
}

impl PhiOperand {
    /// Creates a new phi operand.
    ///
    /// # Arguments
    ///
    /// * `value` - The SSA id providing the value
    /// * `predecessor` - Start offset of the block exporting `value`
    #[must_use]
    pub const fn new(value: LocalId, predecessor: Offset) -> Self {
        Self { value, predecessor }
    }

    /// Returns the SSA id providing the value.
    #[must_use]
    pub const fn value(&self) -> LocalId {
        self.value
    }

    /// Returns the start offset of the contributing block.
    #[must_use]
    pub const fn predecessor(&self) -> Offset {
        self.predecessor
    }
}

impl fmt::Display for PhiOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {:#x}", self.value, self.predecessor)
    }
}

/// A phi node merging the reaching definitions of one original local.
///
/// # Invariants
///
/// - At least two operands, in the order the reaching-definition search met them
/// - At most one operand per contributing block
/// - `result` is fresh: it is neither an original local nor defined elsewhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhiNode {
    /// Offset of the instruction whose read required the merge.
    offset: Offset,
    /// The SSA id defined by this phi.
    result: LocalId,
    /// The original local this phi merges.
    origin: LocalId,
    /// Contributing definitions.
    operands: Vec<PhiOperand>,
}

impl PhiNode {
    /// Creates a phi node.
    #[must_use]
    pub fn new(
        offset: Offset,
        result: LocalId,
        origin: LocalId,
        operands: Vec<PhiOperand>,
    ) -> Self {
        Self {
            offset,
            result,
            origin,
            operands,
        }
    }

    /// Returns the offset of the use site.
    #[must_use]
    pub const fn offset(&self) -> Offset {
        self.offset
    }

    /// Returns the SSA id this phi defines.
    #[must_use]
    pub const fn result(&self) -> LocalId {
        self.result
    }

    /// Returns the original local being merged.
    #[must_use]
    pub const fn origin(&self) -> LocalId {
        self.origin
    }

    /// Returns the contributing definitions in search order.
    #[must_use]
    pub fn operands(&self) -> &[PhiOperand] {
        &self.operands
    }

    /// Returns the number of operands.
    #[must_use]
    pub fn operand_count(&self) -> usize {
        self.operands.len()
    }

    /// Returns the operand contributed by the block at `predecessor`.
    #[must_use]
    pub fn operand_from(&self, predecessor: Offset) -> Option<LocalId> {
        self.operands
            .iter()
            .find(|op| op.predecessor == predecessor)
            .map(PhiOperand::value)
    }

    /// Returns the operands keyed by contributing block offset.
    #[must_use]
    pub fn sources_map(&self) -> BTreeMap<Offset, LocalId> {
        self.operands
            .iter()
            .map(|op| (op.predecessor, op.value))
            .collect()
    }
}

impl fmt::Display for PhiNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}: {} = phi(", self.offset, self.result)?;
        for (i, operand) in self.operands.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{operand}")?;
        }
        write!(f, ") ; {}", self.origin)
    }
}
