//! Supporting data structures shared by the analysis passes.

mod bitset;
mod dot;
pub mod graph;

pub use bitset::BitSet;
pub use dot::escape_dot;
