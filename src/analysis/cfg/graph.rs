//! Control Flow Graph construction from a linear instruction stream.
//!
//! This module provides [`ControlFlowGraph`], which partitions a program into
//! basic blocks at leaders and links them with typed edges.

use std::{
    collections::{HashMap, HashSet},
    fmt::{self, Write},
};

use log::{debug, warn};

use crate::{
    analysis::cfg::{Block, CfgEdgeKind},
    ir::{Instruction, Offset, Program},
    utils::{
        escape_dot,
        graph::{DirectedGraph, NodeId},
        BitSet,
    },
    Error, Result,
};

/// A control flow graph over the blocks of one program.
///
/// Blocks live in an arena addressed by [`NodeId`] and are also indexed by their
/// starting offset. Two orders matter:
///
/// - **Creation order** (`NodeId`s) - a forward branch creates its target block
///   before the walk reaches it
/// - **Discovery order** ([`order`](Self::order)) - the order in which the walk
///   reaches block leaders, which is program order; passes that emit anything
///   iterate in this order
///
/// # Leaders
///
/// A new block starts at an instruction whose offset is a branch target, and at
/// every instruction following a branch. The first instruction always starts the
/// entry block.
///
/// # Edges
///
/// - A branch links its block to the target block (conditional or jump)
/// - A block falls through to the next leader unless it ends in an unconditional
///   branch
///
/// # Dangling Targets
///
/// A branch to an offset that no instruction occupies produces a permanently
/// empty block. It has no successors, so it never contributes a definition to
/// any other block, and it is not part of the discovery order.
///
/// # Examples
///
/// ```rust
/// use ssaform::{ControlFlowGraph, LocalId, ProgramBuilder};
///
/// let mut builder = ProgramBuilder::new();
/// builder
///     .emit_assignment(0, "a", LocalId::new(1), [])
///     .emit_branch(1, "b", [], true, 10)
///     .emit_assignment(2, "c", LocalId::new(1), [])
///     .emit_branch(3, "d", [], false, 10)
///     .emit_statement(10, "e", [LocalId::new(1)]);
///
/// let cfg = ControlFlowGraph::from_program(builder.finish())?;
/// assert_eq!(cfg.reached_count(), 3);
///
/// let join = cfg.node_for_offset(10).unwrap();
/// assert_eq!(cfg.predecessors(join).count(), 2);
/// # Ok::<(), ssaform::Error>(())
/// ```
#[derive(Debug)]
pub struct ControlFlowGraph<T> {
    /// Block arena and edges.
    graph: DirectedGraph<Block<T>, CfgEdgeKind>,
    /// Block lookup by starting offset.
    by_offset: HashMap<Offset, NodeId>,
    /// Reached blocks in discovery order.
    order: Vec<NodeId>,
    /// Blocks reached by the sequential walk.
    reached: BitSet,
    /// `(branch offset, target offset)` for every branch to an unoccupied offset.
    dangling: Vec<(Offset, Offset)>,
}

impl<T> ControlFlowGraph<T> {
    /// Builds the control flow graph of a program.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyProgram`] if the program has no instructions
    /// - [`Error::DuplicateOffset`] if two instructions share an offset
    pub fn from_program(program: Program<T>) -> Result<Self> {
        let (instructions, _, labels) = program.into_parts();
        Self::from_instructions(instructions, &labels)
    }

    /// Builds the control flow graph from instructions in program order.
    ///
    /// `labels` must contain every branch target of `instructions`; targets
    /// missing from it would not start a block.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyProgram`] if `instructions` is empty
    /// - [`Error::DuplicateOffset`] if two instructions share an offset
    pub fn from_instructions(
        instructions: Vec<Instruction<T>>,
        labels: &HashSet<Offset>,
    ) -> Result<Self> {
        let Some(first) = instructions.first() else {
            return Err(Error::EmptyProgram);
        };

        let mut graph: DirectedGraph<Block<T>, CfgEdgeKind> =
            DirectedGraph::with_capacity(labels.len() + 1, labels.len() * 2 + 1);
        let mut by_offset: HashMap<Offset, NodeId> = HashMap::with_capacity(labels.len() + 1);
        let mut seen: HashSet<Offset> = HashSet::with_capacity(instructions.len());
        let mut branches: Vec<(Offset, Offset)> = Vec::new();

        let entry = graph.add_node(Block::new(first.offset()));
        by_offset.insert(first.offset(), entry);
        let mut order = vec![entry];
        let mut current = entry;

        // `Some(conditional)` while the previous instruction was a branch
        let mut previous_branch: Option<bool> = None;

        for (index, instruction) in instructions.into_iter().enumerate() {
            let offset = instruction.offset();
            if !seen.insert(offset) {
                return Err(Error::DuplicateOffset { offset });
            }

            if index > 0 && (previous_branch.is_some() || labels.contains(&offset)) {
                let block = Self::block_at(&mut graph, &mut by_offset, offset);
                match previous_branch {
                    None => {
                        graph.add_edge(current, block, CfgEdgeKind::FallThrough)?;
                    }
                    Some(true) => {
                        graph.add_edge(current, block, CfgEdgeKind::ConditionalFalse)?;
                    }
                    Some(false) => {}
                }
                order.push(block);
                current = block;
            }

            previous_branch = None;
            if let Some((conditional, target)) = instruction.branch_target() {
                let target_block = Self::block_at(&mut graph, &mut by_offset, target);
                graph.add_edge(current, target_block, CfgEdgeKind::for_branch(conditional))?;
                branches.push((offset, target));
                previous_branch = Some(conditional);
            }

            graph
                .node_mut(current)
                .ok_or_else(|| invariant_error!("Current block {} is not in the arena", current))?
                .push(instruction);
        }

        let mut reached = BitSet::new(graph.node_count());
        for node in &order {
            reached.insert(node.index());
        }

        let dangling: Vec<(Offset, Offset)> = branches
            .into_iter()
            .filter(|(_, target)| {
                by_offset
                    .get(target)
                    .is_some_and(|node| !reached.contains(node.index()))
            })
            .collect();
        for (branch, target) in &dangling {
            warn!("Branch at 0x{branch:X} targets offset 0x{target:X} which holds no instruction");
        }

        debug!(
            "Built CFG with {} blocks ({} reached, {} edges)",
            graph.node_count(),
            order.len(),
            graph.edge_count()
        );

        Ok(Self {
            graph,
            by_offset,
            order,
            reached,
            dangling,
        })
    }

    /// Returns the block keyed by `offset`, creating an empty one if needed.
    fn block_at(
        graph: &mut DirectedGraph<Block<T>, CfgEdgeKind>,
        by_offset: &mut HashMap<Offset, NodeId>,
        offset: Offset,
    ) -> NodeId {
        *by_offset
            .entry(offset)
            .or_insert_with(|| graph.add_node(Block::new(offset)))
    }

    /// Returns the entry block.
    #[must_use]
    pub fn entry(&self) -> NodeId {
        self.order[0]
    }

    /// Returns the total number of blocks, including dangling ones.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of blocks reached by the sequential walk.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.order.len()
    }

    /// Returns the number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns reached blocks in discovery order.
    #[must_use]
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Returns the block stored at `node`.
    #[must_use]
    pub fn block(&self, node: NodeId) -> Option<&Block<T>> {
        self.graph.node(node)
    }

    /// Returns the block stored at `node` for in-place rewriting.
    pub fn block_mut(&mut self, node: NodeId) -> Option<&mut Block<T>> {
        self.graph.node_mut(node)
    }

    /// Returns all blocks indexed by `NodeId`.
    pub fn blocks_mut(&mut self) -> &mut [Block<T>] {
        self.graph.nodes_mut()
    }

    /// Returns the node of the block starting at `offset`.
    #[must_use]
    pub fn node_for_offset(&self, offset: Offset) -> Option<NodeId> {
        self.by_offset.get(&offset).copied()
    }

    /// Returns the block starting at `offset`.
    #[must_use]
    pub fn block_by_offset(&self, offset: Offset) -> Option<&Block<T>> {
        self.node_for_offset(offset).and_then(|node| self.block(node))
    }

    /// Returns reached blocks with their nodes, in discovery order.
    pub fn blocks_in_order(&self) -> impl Iterator<Item = (NodeId, &Block<T>)> + '_ {
        self.order
            .iter()
            .filter_map(|&node| self.graph.node(node).map(|block| (node, block)))
    }

    /// Returns the predecessors of `node` in the order their edges were added.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.predecessors(node)
    }

    /// Returns the successors of `node` in the order their edges were added.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.successors(node)
    }

    /// Returns `(target, kind)` for every outgoing edge of `node`.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = (NodeId, CfgEdgeKind)> + '_ {
        self.graph
            .outgoing_edges(node)
            .map(|(target, kind)| (target, *kind))
    }

    /// Returns `true` if `node` was created for a branch target no instruction occupies.
    #[must_use]
    pub fn is_dangling(&self, node: NodeId) -> bool {
        node.index() < self.graph.node_count() && !self.reached.contains(node.index())
    }

    /// Returns `(branch offset, target offset)` for every branch to an unoccupied offset.
    #[must_use]
    pub fn dangling_targets(&self) -> &[(Offset, Offset)] {
        &self.dangling
    }
}

impl<T: fmt::Debug> ControlFlowGraph<T> {
    /// Renders the graph in Graphviz DOT format.
    ///
    /// Blocks are labelled with their offset and instructions; after renaming the
    /// label shows rewritten ids. Dangling blocks are drawn dashed.
    ///
    /// # Arguments
    ///
    /// * `title` - Optional graph label
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = String::new();

        dot.push_str("digraph CFG {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"{}\";", escape_dot(name));
            dot.push_str("    labelloc=t;\n");
        }
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n");
        dot.push_str("    edge [fontname=\"Courier\", fontsize=9];\n\n");

        for (node, block) in self.graph.nodes() {
            let mut label = format!("B_{:04X}", block.offset());
            if node == self.entry() {
                label.push_str(" (entry)");
            }
            label.push_str("\\l");

            for instruction in block.instructions() {
                let _ = write!(label, "{:04X}: {}", instruction.offset(), instruction.kind());
                if let Some(destination) = instruction.destination() {
                    let _ = write!(label, " {destination} =");
                }
                for operand in instruction.operands() {
                    let _ = write!(label, " {operand}");
                }
                if let Some((_, target)) = instruction.branch_target() {
                    let _ = write!(label, " -> {target:04X}");
                }
                let _ = write!(label, " {}", escape_dot(&format!("{:?}", instruction.tag())));
                label.push_str("\\l");
            }

            let style = if node == self.entry() {
                ", style=filled, fillcolor=lightgreen"
            } else if self.is_dangling(node) {
                ", style=dashed"
            } else {
                ""
            };
            let _ = writeln!(dot, "    {node} [label=\"{label}\"{style}];");
        }

        dot.push('\n');
        for (node, _) in self.graph.nodes() {
            for (target, kind) in self.outgoing_edges(node) {
                let _ = writeln!(dot, "    {node} -> {target} [label=\"{kind}\"];");
            }
        }
        dot.push_str("}\n");
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{LocalId, ProgramBuilder};

    fn l(id: u32) -> LocalId {
        LocalId::new(id)
    }

    fn offsets<T>(cfg: &ControlFlowGraph<T>, nodes: impl Iterator<Item = NodeId>) -> Vec<Offset> {
        nodes.map(|n| cfg.block(n).unwrap().offset()).collect()
    }

    #[test]
    fn test_straight_line_single_block() {
        let mut builder = ProgramBuilder::new();
        builder
            .emit_assignment(0, (), l(1), [])
            .emit_assignment(1, (), l(2), [l(1)])
            .emit_statement(2, (), [l(2)]);

        let cfg = ControlFlowGraph::from_program(builder.finish()).unwrap();
        assert_eq!(cfg.block_count(), 1);
        assert_eq!(cfg.reached_count(), 1);
        assert_eq!(cfg.edge_count(), 0);
        assert_eq!(cfg.block(cfg.entry()).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_program() {
        let builder: ProgramBuilder<()> = ProgramBuilder::new();
        assert!(matches!(
            ControlFlowGraph::from_program(builder.finish()),
            Err(Error::EmptyProgram)
        ));
    }

    #[test]
    fn test_duplicate_offset() {
        let mut builder = ProgramBuilder::new();
        builder
            .emit_statement(0, (), [])
            .emit_statement(4, (), [])
            .emit_statement(4, (), []);

        assert!(matches!(
            ControlFlowGraph::from_program(builder.finish()),
            Err(Error::DuplicateOffset { offset: 4 })
        ));
    }

    #[test]
    fn test_diamond() {
        let mut builder = ProgramBuilder::new();
        builder
            .emit_assignment(0, (), l(1), [])
            .emit_branch(1, (), [], true, 10)
            .emit_assignment(2, (), l(1), [])
            .emit_branch(3, (), [], false, 10)
            .emit_statement(10, (), [l(1)]);

        let cfg = ControlFlowGraph::from_program(builder.finish()).unwrap();
        assert_eq!(cfg.block_count(), 3);
        assert_eq!(offsets(&cfg, cfg.order().iter().copied()), vec![0, 2, 10]);

        let entry = cfg.entry();
        let middle = cfg.node_for_offset(2).unwrap();
        let join = cfg.node_for_offset(10).unwrap();

        let entry_edges: Vec<_> = cfg.outgoing_edges(entry).collect();
        assert_eq!(
            entry_edges,
            vec![
                (join, CfgEdgeKind::ConditionalTrue),
                (middle, CfgEdgeKind::ConditionalFalse)
            ]
        );
        let middle_edges: Vec<_> = cfg.outgoing_edges(middle).collect();
        assert_eq!(middle_edges, vec![(join, CfgEdgeKind::Unconditional)]);
        assert_eq!(offsets(&cfg, cfg.predecessors(join)), vec![0, 2]);
    }

    #[test]
    fn test_unconditional_branch_severs_fall_through() {
        let mut builder = ProgramBuilder::new();
        builder
            .emit_branch(0, (), [], false, 5)
            .emit_statement(1, (), [])
            .emit_statement(5, (), []);

        let cfg = ControlFlowGraph::from_program(builder.finish()).unwrap();
        let skipped = cfg.node_for_offset(1).unwrap();
        let target = cfg.node_for_offset(5).unwrap();

        assert_eq!(cfg.predecessors(skipped).count(), 0);
        // block at 1 falls through into the label at 5
        assert_eq!(offsets(&cfg, cfg.predecessors(target)), vec![0, 1]);
        let kinds: Vec<_> = cfg.outgoing_edges(skipped).map(|(_, k)| k).collect();
        assert_eq!(kinds, vec![CfgEdgeKind::FallThrough]);
    }

    #[test]
    fn test_backward_branch_loop() {
        let mut builder = ProgramBuilder::new();
        builder
            .emit_assignment(0, (), l(1), [])
            .emit_assignment(1, (), l(1), [l(1)])
            .emit_branch(2, (), [l(1)], true, 1)
            .emit_statement(3, (), [l(1)]);

        let cfg = ControlFlowGraph::from_program(builder.finish()).unwrap();
        assert_eq!(offsets(&cfg, cfg.order().iter().copied()), vec![0, 1, 3]);

        let header = cfg.node_for_offset(1).unwrap();
        assert_eq!(offsets(&cfg, cfg.predecessors(header)), vec![0, 1]);
        assert_eq!(offsets(&cfg, cfg.successors(header)), vec![1, 3]);
    }

    #[test]
    fn test_branch_to_next_instruction_single_edge() {
        let mut builder = ProgramBuilder::new();
        builder
            .emit_branch(0, (), [], true, 1)
            .emit_statement(1, (), []);

        let cfg = ControlFlowGraph::from_program(builder.finish()).unwrap();
        let next = cfg.node_for_offset(1).unwrap();
        let edges: Vec<_> = cfg.outgoing_edges(cfg.entry()).collect();
        assert_eq!(edges, vec![(next, CfgEdgeKind::ConditionalTrue)]);
        assert_eq!(cfg.edge_count(), 1);
    }

    #[test]
    fn test_label_on_entry_does_not_split() {
        let mut builder = ProgramBuilder::new();
        builder
            .emit_assignment(0, (), l(1), [])
            .emit_branch(1, (), [], true, 0)
            .emit_statement(2, (), []);

        let cfg = ControlFlowGraph::from_program(builder.finish()).unwrap();
        assert_eq!(offsets(&cfg, cfg.order().iter().copied()), vec![0, 2]);
        assert_eq!(cfg.block(cfg.entry()).unwrap().len(), 2);
        // the loop edge back into the entry block
        assert_eq!(offsets(&cfg, cfg.predecessors(cfg.entry())), vec![0]);
    }

    #[test]
    fn test_dangling_target() {
        let mut builder = ProgramBuilder::new();
        builder
            .emit_branch(0, (), [], true, 100)
            .emit_statement(1, (), []);

        let cfg = ControlFlowGraph::from_program(builder.finish()).unwrap();
        assert_eq!(cfg.block_count(), 3);
        assert_eq!(cfg.reached_count(), 2);

        let dangling = cfg.node_for_offset(100).unwrap();
        assert!(cfg.is_dangling(dangling));
        assert!(!cfg.is_dangling(cfg.entry()));
        assert!(cfg.block(dangling).unwrap().is_empty());
        assert_eq!(cfg.dangling_targets(), &[(0, 100)]);
        assert!(!cfg.order().contains(&dangling));
    }

    #[test]
    fn test_block_by_offset() {
        let mut builder = ProgramBuilder::new();
        builder
            .emit_statement(0, 'x', [])
            .emit_branch(1, 'y', [], false, 0);

        let cfg = ControlFlowGraph::from_program(builder.finish()).unwrap();
        let block = cfg.block_by_offset(0).unwrap();
        assert_eq!(block.len(), 2);
        assert!(cfg.block_by_offset(1).is_none());
        let collected: Vec<Offset> = cfg.blocks_in_order().map(|(_, b)| b.offset()).collect();
        assert_eq!(collected, vec![0]);
    }

    #[test]
    fn test_to_dot() {
        let mut builder = ProgramBuilder::new();
        builder
            .emit_assignment(0, "load", l(1), [])
            .emit_branch(1, "br<t>", [l(1)], true, 8)
            .emit_statement(2, "ret", [l(1)]);

        let cfg = ControlFlowGraph::from_program(builder.finish()).unwrap();
        let dot = cfg.to_dot(Some("sample"));

        assert!(dot.starts_with("digraph CFG {"));
        assert!(dot.contains("label=\"sample\""));
        assert!(dot.contains("0000: assignment v1 = \\\"load\\\""));
        assert!(dot.contains("br\\<t\\>"));
        assert!(dot.contains("label=\"true\""));
        assert!(dot.contains("label=\"false\""));
        assert!(dot.contains("style=dashed"));
        assert!(dot.trim_end().ends_with('}'));
    }
}
