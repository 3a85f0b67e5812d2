//! Fresh SSA id allocation.

use std::collections::HashSet;

use crate::{ir::LocalId, Error, Result};

/// Mints local ids that collide with neither the program's own locals nor any
/// id minted before.
///
/// Allocation starts at 1 and probes upward, skipping every id in use, so the
/// fresh ids fill the gaps of the caller's numbering first. Ids are never
/// reused within one conversion.
///
/// # Examples
///
/// ```rust
/// use ssaform::{LocalAllocator, LocalId};
///
/// let mut alloc = LocalAllocator::new([LocalId::new(1), LocalId::new(3)]);
/// assert_eq!(alloc.fresh()?, LocalId::new(2));
/// assert_eq!(alloc.fresh()?, LocalId::new(4));
/// # Ok::<(), ssaform::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LocalAllocator {
    used: HashSet<LocalId>,
    /// Next candidate; `None` once `u32::MAX` was handed out.
    next: Option<u32>,
}

impl LocalAllocator {
    /// Creates an allocator that avoids every id in `used`.
    #[must_use]
    pub fn new<I>(used: I) -> Self
    where
        I: IntoIterator<Item = LocalId>,
    {
        Self {
            used: used.into_iter().collect(),
            next: Some(1),
        }
    }

    /// Returns `true` if `local` is an original id or was minted already.
    #[must_use]
    pub fn is_used(&self, local: LocalId) -> bool {
        self.used.contains(&local)
    }

    /// Returns the number of ids in use.
    #[must_use]
    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    /// Mints the lowest unused id and marks it used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LocalIdExhausted`] when no id up to `u32::MAX` is free.
    pub fn fresh(&mut self) -> Result<LocalId> {
        let mut candidate = self.next.ok_or(Error::LocalIdExhausted)?;
        while self.used.contains(&LocalId::new(candidate)) {
            candidate = candidate.checked_add(1).ok_or(Error::LocalIdExhausted)?;
        }

        let local = LocalId::new(candidate);
        self.used.insert(local);
        self.next = candidate.checked_add(1);
        Ok(local)
    }

    /// Mints `count` ids in allocation order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LocalIdExhausted`] if the id space runs out midway.
    pub fn reserve(&mut self, count: usize) -> Result<Vec<LocalId>> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(self.fresh()?);
        }
        Ok(ids)
    }
}
