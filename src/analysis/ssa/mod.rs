//! Static Single Assignment (SSA) conversion.
//!
//! This module rewrites a register-based program so that every local is assigned
//! exactly once, and reports phi nodes where several definitions of the same
//! original local meet.
//!
//! # Architecture
//!
//! The module is organized into focused sub-modules:
//!
//! - `alloc` - Fresh id allocation around the caller's numbering
//! - `rename` - Block-local renaming of definitions and reads
//! - `resolve` - Reaching-definition search over predecessor edges
//! - `phi` - Phi node representation for control flow merges
//! - `sink` - The output trait and the bundled sinks
//! - `converter` - The pipeline driving all passes
//!
//! # Phi Placement
//!
//! Phis are not placed at dominance frontiers. A read of an original local that
//! a block imports is resolved by searching backwards through predecessors for
//! blocks that export the local:
//!
//! - **No definition** - the read stays on the original id (an external input)
//! - **One definition** - the read is rewritten to it; no phi
//! - **Several definitions** - a fresh id is minted, a phi merging the
//!   definitions is reported at the read, and the read uses the phi's id
//!
//! Each block resolves each imported local at most once; later reads in the same
//! block reuse the result.
//!
//! # Usage
//!
//! ```rust
//! use ssaform::{EventRecorder, LocalId, SsaConverter};
//!
//! let (i, sum) = (LocalId::new(1), LocalId::new(2));
//! let mut converter = SsaConverter::new();
//! converter
//!     .emit_assignment(0, "ldc 0", i, [])
//!     .emit_assignment(1, "ldc 0", sum, [])
//!     .emit_assignment(2, "add", sum, [sum, i])
//!     .emit_assignment(3, "inc", i, [i])
//!     .emit_branch(4, "blt", [i], true, 2)
//!     .emit_statement(5, "ret", [sum]);
//!
//! let mut recorder = EventRecorder::new();
//! let stats = converter.process(&mut recorder)?;
//!
//! // one loop-header phi for each of `i` and `sum`
//! assert_eq!(stats.phis, 2);
//! for phi in recorder.phis() {
//!     println!("{phi}");
//! }
//! # Ok::<(), ssaform::Error>(())
//! ```

mod alloc;
mod config;
mod converter;
mod phi;
mod rename;
mod resolve;
mod sink;
mod stats;

pub use alloc::LocalAllocator;
pub use config::{SsaConfig, DEFAULT_PARALLEL_RENAME_THRESHOLD};
pub use converter::{convert_program, convert_program_parallel, SsaConverter};
pub use phi::{PhiNode, PhiOperand};
pub use rename::rename_block;
pub use resolve::DefinitionSearch;
pub use sink::{EventRecorder, NullSink, SsaEvent, SsaSink};
pub use stats::ConversionStats;

pub(crate) use sink::emit_instruction;
