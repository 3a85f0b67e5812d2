//! Reaching-definition search over predecessor edges.
//!
//! This is the lookup behind phi placement: given a block that imports an
//! original local, find every block that exports a definition of it and can
//! reach the importing block without passing through another definition.

use crate::{
    analysis::{cfg::ControlFlowGraph, ssa::PhiOperand},
    ir::LocalId,
    utils::{graph::NodeId, BitSet},
};

/// Reusable state for reaching-definition searches over one CFG.
///
/// # Algorithm
///
/// A depth-first walk backwards along predecessor edges, driven by an explicit
/// stack. Popping a block that was already visited does nothing. Otherwise the
/// block is marked visited and either contributes its export of the local, which
/// ends that path, or pushes its own predecessors.
///
/// Predecessors are pushed in reverse so that they pop in edge order; the
/// contributors therefore appear in the same preorder a recursive walk would
/// produce. The starting block is not pre-marked visited: a path that loops back
/// into it picks up its own export, which is how loop-carried values surface.
///
/// Each block contributes at most once and each block is expanded at most once,
/// so the search terminates on any cyclic graph.
#[derive(Debug)]
pub struct DefinitionSearch {
    visited: BitSet,
    stack: Vec<NodeId>,
}

impl DefinitionSearch {
    /// Creates search state sized for `cfg`.
    #[must_use]
    pub fn new<T>(cfg: &ControlFlowGraph<T>) -> Self {
        Self {
            visited: BitSet::new(cfg.block_count()),
            stack: Vec::new(),
        }
    }

    /// Returns every definition of `local` reaching the entry of `node`.
    ///
    /// The visited set grows when `cfg` has more blocks than the graph this
    /// state was created for.
    ///
    /// # Returns
    ///
    /// The contributing `(exported id, block offset)` pairs in search order. An
    /// empty result means the local is an external input on every path.
    pub fn reaching_definitions<T>(
        &mut self,
        cfg: &ControlFlowGraph<T>,
        node: NodeId,
        local: LocalId,
    ) -> Vec<PhiOperand> {
        if self.visited.len() < cfg.block_count() {
            self.visited = BitSet::new(cfg.block_count());
        }
        self.visited.clear();
        self.stack.clear();

        let mut contributors = Vec::new();
        self.push_predecessors(cfg, node);

        while let Some(current) = self.stack.pop() {
            if !self.visited.insert(current.index()) {
                continue;
            }
            let Some(block) = cfg.block(current) else {
                continue;
            };

            match block.exported_local(local) {
                Some(value) => contributors.push(PhiOperand::new(value, block.offset())),
                None => self.push_predecessors(cfg, current),
            }
        }

        contributors
    }

    fn push_predecessors<T>(&mut self, cfg: &ControlFlowGraph<T>, node: NodeId) {
        let start = self.stack.len();
        self.stack.extend(cfg.predecessors(node));
        self.stack[start..].reverse();
    }
}
