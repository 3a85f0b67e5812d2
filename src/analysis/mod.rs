//! Program analysis infrastructure.
//!
//! This module builds on the generic graph infrastructure in
//! [`crate::utils::graph`] to turn a linear program into SSA form.
//!
//! # Architecture
//!
//! The analysis module is organized into focused sub-modules:
//!
//! - [`cfg`] - Control Flow Graph construction
//! - [`ssa`] - Renaming, phi resolution and emission
//!
//! # Usage
//!
//! ```rust
//! use ssaform::analysis::{ssa::DefinitionSearch, ControlFlowGraph};
//! use ssaform::{LocalId, ProgramBuilder};
//!
//! let mut builder = ProgramBuilder::new();
//! builder
//!     .emit_statement(0, (), [])
//!     .emit_branch(1, (), [], true, 3)
//!     .emit_statement(2, (), [])
//!     .emit_statement(3, (), [LocalId::new(1)]);
//!
//! let cfg = ControlFlowGraph::from_program(builder.finish())?;
//! let join = cfg.node_for_offset(3).unwrap();
//!
//! // nothing defines v1, so the read at 3 is an external input
//! let mut search = DefinitionSearch::new(&cfg);
//! assert!(search.reaching_definitions(&cfg, join, LocalId::new(1)).is_empty());
//! # Ok::<(), ssaform::Error>(())
//! ```

pub mod cfg;
pub mod ssa;

// Re-export primary types at module level
pub use cfg::{Block, CfgEdgeKind, ControlFlowGraph};

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::{
        analysis::{
            ssa::{EventRecorder, SsaConfig, SsaConverter},
            CfgEdgeKind, ControlFlowGraph,
        },
        ir::{LocalId, Offset, ProgramBuilder},
    };

    fn l(id: u32) -> LocalId {
        LocalId::new(id)
    }

    #[test]
    fn test_nested_loops() {
        // 0: i = 0
        // 1: j = 0          <- outer header
        // 2: j = j + i      <- inner header
        // 3: br.true 2
        // 4: i = i + 1
        // 5: br.true 1
        // 6: ret i, j
        let mut builder = ProgramBuilder::new();
        builder
            .emit_assignment(0, (), l(1), [])
            .emit_assignment(1, (), l(2), [])
            .emit_assignment(2, (), l(2), [l(2), l(1)])
            .emit_branch(3, (), [l(2)], true, 2)
            .emit_assignment(4, (), l(1), [l(1)])
            .emit_branch(5, (), [l(1)], true, 1)
            .emit_statement(6, (), [l(1), l(2)]);

        let cfg = ControlFlowGraph::from_program(builder.finish()).unwrap();
        assert_eq!(cfg.reached_count(), 5);

        let outer = cfg.node_for_offset(1).unwrap();
        let inner = cfg.node_for_offset(2).unwrap();
        let kinds: Vec<_> = cfg.outgoing_edges(inner).collect();
        assert_eq!(
            kinds,
            vec![
                (inner, CfgEdgeKind::ConditionalTrue),
                (cfg.node_for_offset(4).unwrap(), CfgEdgeKind::ConditionalFalse)
            ]
        );
        assert_eq!(cfg.predecessors(outer).count(), 2);

        let mut converter = SsaConverter::with_config(SsaConfig::sequential());
        converter
            .emit_assignment(0, (), l(1), [])
            .emit_assignment(1, (), l(2), [])
            .emit_assignment(2, (), l(2), [l(2), l(1)])
            .emit_branch(3, (), [l(2)], true, 2)
            .emit_assignment(4, (), l(1), [l(1)])
            .emit_branch(5, (), [l(1)], true, 1)
            .emit_statement(6, (), [l(1), l(2)]);

        let mut recorder = EventRecorder::new();
        let stats = converter.process(&mut recorder).unwrap();

        // the inner header merges j from the outer header and from itself, and i
        // from the entry and the outer latch; the outer latch re-merges i since
        // the search may loop back into it
        let phis: Vec<_> = recorder
            .phis()
            .map(|phi| (phi.offset(), phi.origin(), phi.result(), phi.sources_map()))
            .collect();
        let expected: Vec<(Offset, LocalId, LocalId, BTreeMap<Offset, LocalId>)> = vec![
            (2, l(2), l(7), BTreeMap::from([(1, l(4)), (2, l(5))])),
            (2, l(1), l(8), BTreeMap::from([(0, l(3)), (4, l(6))])),
            (4, l(1), l(9), BTreeMap::from([(0, l(3)), (4, l(6))])),
        ];
        assert_eq!(phis, expected);

        let last = recorder.instructions().last().unwrap();
        assert_eq!(last.operands(), &[l(6), l(5)]);
        assert_eq!(stats.unresolved_imports, 0);
    }
}
