//! A fixed-capacity bit set over small dense indices.
//!
//! Used for per-node marks in graph walks (visited blocks, reached blocks) where
//! the universe is the node count of the block arena.
//!
//! # Example
//!
//! ```rust,ignore
//! use ssaform::utils::BitSet;
//!
//! let mut visited = BitSet::new(8);
//! assert!(visited.insert(3));
//! assert!(!visited.insert(3));
//! assert!(visited.contains(3));
//! ```

/// A bit vector with 64 elements per word.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    /// The bits, stored as a vector of words.
    words: Vec<u64>,
    /// The number of addressable bits.
    len: usize,
}

impl BitSet {
    /// Creates a new empty bit set able to hold indices `0..capacity`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(64)],
            len: capacity,
        }
    }

    /// Returns the capacity of this bit set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Sets the bit at `index`.
    ///
    /// Returns `true` if the bit was previously clear.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn insert(&mut self, index: usize) -> bool {
        assert!(index < self.len, "index out of bounds");
        let word = &mut self.words[index / 64];
        let mask = 1u64 << (index % 64);
        let was_clear = *word & mask == 0;
        *word |= mask;
        was_clear
    }

    /// Returns `true` if the bit at `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        assert!(index < self.len, "index out of bounds");
        (self.words[index / 64] & (1u64 << (index % 64))) != 0
    }

    /// Returns the number of bits set.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Clears all bits, keeping the capacity.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Returns an iterator over the indices of set bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words
            .iter()
            .enumerate()
            .flat_map(|(word_idx, &word)| {
                (0..64)
                    .filter(move |bit| word & (1u64 << bit) != 0)
                    .map(move |bit| word_idx * 64 + bit)
            })
            .take_while(|&idx| idx < self.len)
    }
}

impl std::fmt::Debug for BitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitset_basic() {
        let mut bs = BitSet::new(100);
        assert!(bs.is_empty());
        assert_eq!(bs.len(), 100);

        assert!(bs.insert(0));
        assert!(bs.insert(64));
        assert!(bs.insert(99));
        assert!(!bs.insert(64));

        assert!(bs.contains(64));
        assert!(!bs.contains(63));
        assert_eq!(bs.count(), 3);
        assert_eq!(bs.iter().collect::<Vec<_>>(), vec![0, 64, 99]);
    }

    #[test]
    fn test_bitset_clear() {
        let mut bs = BitSet::new(10);
        bs.insert(3);
        bs.clear();
        assert!(bs.is_empty());
        assert!(bs.insert(3));
    }

    #[test]
    fn test_bitset_debug() {
        let mut bs = BitSet::new(8);
        bs.insert(1);
        bs.insert(5);
        assert_eq!(format!("{bs:?}"), "{1, 5}");
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_bitset_out_of_bounds() {
        let mut bs = BitSet::new(4);
        bs.insert(4);
    }
}
