// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(clippy::too_many_arguments)]

//! # ssaform
//!
//! Conversion of register-based instruction streams into Static Single Assignment
//! form. Feed instructions in program order, receive renamed instructions and phi
//! placements through a sink.
//!
//! ## Features
//!
//! - **Offset-based input** - Assignments, statements and branches over integer
//!   locals, each carrying an opaque caller tag that is handed back unchanged
//! - **Block discovery** - Leaders at branch targets and after branches, with
//!   fall-through, conditional and jump edges
//! - **Use-driven phis** - Merges are reported where an imported read meets
//!   several definitions, including loop-carried ones
//! - **Deterministic output** - Identical input yields an identical event stream,
//!   whether or not renaming runs on the rayon thread pool
//!   ([`SsaConverter::process_parallel`])
//!
//! ## Quick Start
//!
//! ```rust
//! use ssaform::{EventRecorder, LocalId, SsaConverter};
//!
//! let x = LocalId::new(1);
//! let mut converter = SsaConverter::new();
//! converter
//!     .emit_assignment(0, "ldc 1", x, [])
//!     .emit_branch(1, "brtrue", [], true, 10)
//!     .emit_assignment(2, "ldc 2", x, [])
//!     .emit_branch(3, "br", [], false, 10)
//!     .emit_statement(10, "ret", [x]);
//!
//! let mut recorder = EventRecorder::new();
//! let stats = converter.process(&mut recorder)?;
//!
//! assert_eq!(stats.reached_blocks, 3);
//! assert_eq!(stats.phis, 1);
//!
//! let ret = recorder.instructions().last().unwrap();
//! let phi = recorder.phis().next().unwrap();
//! assert_eq!(ret.operands(), &[phi.result()]);
//! # Ok::<(), ssaform::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`ir`] - The input model: instructions, locals, and the program builder
//! - [`analysis::cfg`] - Basic blocks and the control flow graph
//! - [`analysis::ssa`] - Renaming, phi resolution, sinks and the converter
//! - [`utils`] - Arena graph, bit set and DOT helpers
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger:
//! pass summaries and unresolved reads at `debug`, each placed phi at `trace`,
//! and dangling branch targets at `warn`.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`]; see [`Error`] for the failure
//! conditions.

#[macro_use]
pub(crate) mod error;

pub mod analysis;
pub mod ir;
pub mod utils;

pub use analysis::{
    ssa::{
        convert_program, convert_program_parallel, ConversionStats, DefinitionSearch,
        EventRecorder, LocalAllocator, NullSink, PhiNode, PhiOperand, SsaConfig, SsaConverter,
        SsaEvent, SsaSink,
    },
    Block, CfgEdgeKind, ControlFlowGraph,
};
pub use ir::{Instruction, InstructionKind, LocalId, Offset, Program, ProgramBuilder};

/// `ssaform` Result type.
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `ssaform` Error type.
///
/// The main error type for all operations in this crate.
pub use error::Error;
