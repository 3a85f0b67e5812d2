//! Configuration for SSA conversion.

/// Default minimum number of reached blocks before renaming runs in parallel.
pub const DEFAULT_PARALLEL_RENAME_THRESHOLD: usize = 64;

/// Configuration for [`SsaConverter`](crate::SsaConverter).
///
/// None of the settings change the converted output; they only select how the
/// work is scheduled and which inputs are rejected.
///
/// # Examples
///
/// ```rust
/// use ssaform::SsaConfig;
///
/// let config = SsaConfig::new()
///     .with_parallel_rename_threshold(usize::MAX)
///     .with_reject_dangling_targets(true);
/// assert!(config.reject_dangling_targets);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsaConfig {
    /// Minimum reached block count before renaming uses the rayon thread pool
    /// (default: 64). `usize::MAX` keeps renaming on the calling thread. Only
    /// [`convert_program_parallel`](crate::convert_program_parallel) and
    /// [`SsaConverter::process_parallel`](crate::SsaConverter::process_parallel)
    /// consult it.
    pub parallel_rename_threshold: usize,

    /// Fail with [`Error::DanglingBranchTarget`](crate::Error::DanglingBranchTarget)
    /// instead of logging a warning when a branch targets an offset no
    /// instruction occupies (default: false).
    pub reject_dangling_targets: bool,
}

impl Default for SsaConfig {
    fn default() -> Self {
        Self {
            parallel_rename_threshold: DEFAULT_PARALLEL_RENAME_THRESHOLD,
            reject_dangling_targets: false,
        }
    }
}

impl SsaConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that never spawns parallel work.
    #[must_use]
    pub fn sequential() -> Self {
        Self::default().with_parallel_rename_threshold(usize::MAX)
    }

    /// Sets the reached block count at which renaming goes parallel.
    ///
    /// # Arguments
    ///
    /// * `threshold` - Minimum block count; `0` always uses the thread pool
    #[must_use]
    pub fn with_parallel_rename_threshold(mut self, threshold: usize) -> Self {
        self.parallel_rename_threshold = threshold;
        self
    }

    /// Sets whether dangling branch targets abort the conversion.
    #[must_use]
    pub fn with_reject_dangling_targets(mut self, reject: bool) -> Self {
        self.reject_dangling_targets = reject;
        self
    }

    /// Returns `true` if renaming `blocks` reached blocks should use rayon.
    #[must_use]
    pub fn rename_in_parallel(&self, blocks: usize) -> bool {
        blocks >= self.parallel_rename_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SsaConfig::default();
        assert_eq!(config.parallel_rename_threshold, 64);
        assert!(!config.reject_dangling_targets);
        assert_eq!(config, SsaConfig::new());
    }

    #[test]
    fn test_parallel_threshold() {
        let config = SsaConfig::new().with_parallel_rename_threshold(10);
        assert!(!config.rename_in_parallel(9));
        assert!(config.rename_in_parallel(10));

        let sequential = SsaConfig::sequential();
        assert!(!sequential.rename_in_parallel(1_000_000));

        assert!(SsaConfig::new()
            .with_parallel_rename_threshold(0)
            .rename_in_parallel(1));
    }
}
