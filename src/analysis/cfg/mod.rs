//! Control Flow Graph (CFG) construction.
//!
//! This module partitions a linear instruction stream into basic blocks and
//! links them into a graph the SSA passes walk.
//!
//! # Architecture
//!
//! The CFG builds upon the generic [`crate::utils::graph::DirectedGraph`] arena.
//! Blocks are addressed by [`NodeId`](crate::utils::graph::NodeId) and looked up
//! by their starting offset; adjacency lists carry a [`CfgEdgeKind`].
//!
//! # Key Components
//!
//! - [`ControlFlowGraph`] - The block arena, offset index and discovery order
//! - [`Block`] - Instructions plus the imported/exported local sets of renaming
//! - [`CfgEdgeKind`] - Classification of edges (fall-through, true, false, jump)
//!
//! # Examples
//!
//! ```rust
//! use ssaform::{ControlFlowGraph, LocalId, ProgramBuilder};
//!
//! let mut builder = ProgramBuilder::new();
//! builder
//!     .emit_assignment(0, (), LocalId::new(1), [])
//!     .emit_branch(1, (), [LocalId::new(1)], true, 0)
//!     .emit_statement(2, (), [LocalId::new(1)]);
//!
//! let cfg = ControlFlowGraph::from_program(builder.finish())?;
//! for (node, block) in cfg.blocks_in_order() {
//!     println!("{node}: block at {:#x} with {} instructions", block.offset(), block.len());
//! }
//! println!("{}", cfg.to_dot(Some("example")));
//! # Ok::<(), ssaform::Error>(())
//! ```

mod block;
mod edge;
mod graph;

pub use block::Block;
pub use edge::CfgEdgeKind;
pub use graph::ControlFlowGraph;
