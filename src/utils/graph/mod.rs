//! Directed graph infrastructure for the block arena.
//!
//! The control flow graph stores its blocks in a [`DirectedGraph`] and refers to them
//! through [`NodeId`] indices instead of pointers. Predecessor and successor links are
//! adjacency lists over those indices, so a cyclic graph (any loop) needs no shared
//! ownership or interior mutability.
//!
//! # Key Components
//!
//! - [`NodeId`] - Strongly-typed node index
//! - [`DirectedGraph`] - Owned node storage with duplicate-free edges in both directions

mod directed;
mod node;

pub use directed::DirectedGraph;
pub use node::NodeId;
