//! Local variable identifiers.
//!
//! Original locals and synthesized SSA locals share one integer namespace. The
//! caller's numbering is taken as-is; fresh identifiers are minted around it by
//! [`LocalAllocator`](crate::analysis::ssa::LocalAllocator) so they never collide.

use std::fmt;

/// Identifier of a local variable slot.
///
/// Before conversion a `LocalId` names a slot in the caller's numbering and may be
/// written any number of times. After conversion every id that appears as an
/// assignment destination or phi result is written exactly once program-wide.
///
/// # Examples
///
/// ```rust
/// use ssaform::LocalId;
///
/// let local = LocalId::new(4);
/// assert_eq!(local.index(), 4);
/// assert_eq!(LocalId::from(4), local);
/// assert_eq!(local.to_string(), "v4");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalId(u32);

impl LocalId {
    /// Creates a local identifier from its raw number.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw number of this local.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalId({})", self.0)
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u32> for LocalId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl From<LocalId> for u32 {
    fn from(local: LocalId) -> Self {
        local.0
    }
}
