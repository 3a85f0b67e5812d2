//! Control flow edge kinds.

use strum::Display;

/// How control moves along a CFG edge.
///
/// Only one edge is kept between any two blocks. When a branch target coincides
/// with the fall-through successor, the branch edge is recorded first and keeps
/// its kind.
///
/// # Examples
///
/// ```rust
/// use ssaform::CfgEdgeKind;
///
/// assert!(CfgEdgeKind::ConditionalTrue.is_conditional());
/// assert!(CfgEdgeKind::ConditionalFalse.is_fall_through());
/// assert!(!CfgEdgeKind::Unconditional.is_fall_through());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum CfgEdgeKind {
    /// Sequential flow into a block that starts at a label.
    #[strum(serialize = "fallthrough")]
    FallThrough,

    /// The taken side of a conditional branch.
    #[strum(serialize = "true")]
    ConditionalTrue,

    /// The not-taken side of a conditional branch (falls through).
    #[strum(serialize = "false")]
    ConditionalFalse,

    /// An unconditional jump.
    #[strum(serialize = "jump")]
    Unconditional,
}

impl CfgEdgeKind {
    /// Returns `true` for either side of a conditional branch.
    #[must_use]
    pub const fn is_conditional(&self) -> bool {
        matches!(self, Self::ConditionalTrue | Self::ConditionalFalse)
    }

    /// Returns `true` if the edge follows program order rather than a branch target.
    #[must_use]
    pub const fn is_fall_through(&self) -> bool {
        matches!(self, Self::FallThrough | Self::ConditionalFalse)
    }

    /// Returns the edge kind for a branch instruction's target edge.
    #[must_use]
    pub const fn for_branch(conditional: bool) -> Self {
        if conditional {
            Self::ConditionalTrue
        } else {
            Self::Unconditional
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_branch() {
        assert_eq!(CfgEdgeKind::for_branch(true), CfgEdgeKind::ConditionalTrue);
        assert_eq!(CfgEdgeKind::for_branch(false), CfgEdgeKind::Unconditional);
    }

    #[test]
    fn test_display() {
        assert_eq!(CfgEdgeKind::FallThrough.to_string(), "fallthrough");
        assert_eq!(CfgEdgeKind::ConditionalTrue.to_string(), "true");
        assert_eq!(CfgEdgeKind::ConditionalFalse.to_string(), "false");
        assert_eq!(CfgEdgeKind::Unconditional.to_string(), "jump");
    }
}
