use thiserror::Error;

use crate::ir::Offset;

macro_rules! invariant_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvariantViolation {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvariantViolation {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Conversion either succeeds completely or fails before the first sink callback that depends
/// on the failing condition. Conditions the pipeline treats as benign, such as a read of a
/// local that is never defined on any path, are not errors and are reported through
/// [`crate::ConversionStats`] and the `log` facade instead.
///
/// # Error Categories
///
/// ## Input Errors
/// - [`Error::EmptyProgram`] - Processing was requested without any instructions
/// - [`Error::DuplicateOffset`] - Two instructions share one offset
/// - [`Error::DanglingBranchTarget`] - A branch targets an offset no instruction occupies
///   (only when [`crate::SsaConfig::reject_dangling_targets`] is set)
///
/// ## Internal Errors
/// - [`Error::LocalIdExhausted`] - The fresh identifier space ran out
/// - [`Error::GraphError`] - Block graph operation failed
/// - [`Error::InvariantViolation`] - An internal consistency check failed
///
/// # Examples
///
/// ```rust
/// use ssaform::{Error, NullSink, SsaConverter};
///
/// let mut converter: SsaConverter<()> = SsaConverter::new();
/// match converter.process(&mut NullSink) {
///     Err(Error::EmptyProgram) => println!("nothing to convert"),
///     Err(e) => eprintln!("conversion failed: {e}"),
///     Ok(stats) => println!("{} phis", stats.phis),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Processing was invoked with zero instructions.
    ///
    /// The entry block is keyed by the offset of the first instruction, so an
    /// empty program has no entry point and no pass can run.
    #[error("Cannot convert an empty program")]
    EmptyProgram,

    /// Two distinct instructions share the same offset.
    ///
    /// Blocks are identified by their starting offset. Accepting duplicate
    /// offsets would silently merge unrelated instructions into one block.
    #[error("Duplicate instruction offset 0x{offset:X}")]
    DuplicateOffset {
        /// The offset that occurs more than once
        offset: Offset,
    },

    /// A branch targets an offset that no instruction occupies.
    ///
    /// Only raised when dangling targets are configured to be rejected; by
    /// default such targets become empty, unreachable blocks.
    #[error("Branch at 0x{branch:X} targets unknown offset 0x{target:X}")]
    DanglingBranchTarget {
        /// The offset of the branch instruction
        branch: Offset,
        /// The offset the branch jumps to
        target: Offset,
    },

    /// No fresh local identifier is left in the `u32` space.
    #[error("Local identifier space exhausted")]
    LocalIdExhausted,

    /// Block graph error.
    ///
    /// Raised when an edge references a block that does not exist in the arena.
    #[error("{0}")]
    GraphError(String),

    /// An internal invariant did not hold.
    ///
    /// This indicates a bug in the conversion pipeline rather than bad input.
    /// The source location of the failed check is included for debugging.
    ///
    /// # Fields
    ///
    /// * `message` - Description of the violated invariant
    /// * `file` - Source file where the violation was detected
    /// * `line` - Source line where the violation was detected
    #[error("Invariant violated - {file}:{line}: {message}")]
    InvariantViolation {
        /// The message to be printed for the violation
        message: String,
        /// The source file in which this violation was detected
        file: &'static str,
        /// The source line in which this violation was detected
        line: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_error_records_location() {
        let err = invariant_error!("block {} missing", 3);
        match err {
            Error::InvariantViolation {
                message,
                file,
                line,
            } => {
                assert_eq!(message, "block 3 missing");
                assert!(file.ends_with("error.rs"));
                assert!(line > 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::DuplicateOffset { offset: 0x1A }.to_string(),
            "Duplicate instruction offset 0x1A"
        );
        assert_eq!(
            Error::DanglingBranchTarget {
                branch: 4,
                target: 0x40
            }
            .to_string(),
            "Branch at 0x4 targets unknown offset 0x40"
        );
    }
}
