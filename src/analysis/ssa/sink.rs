//! Output hooks for the conversion.
//!
//! A conversion reports its results through an [`SsaSink`]: first every renamed
//! definition (`unalias`), then, interleaved in program order, phi placements and
//! the rewritten instructions.
//!
//! Two sinks ship with the crate:
//!
//! - [`NullSink`] - Discards everything, for callers that only want statistics
//! - [`EventRecorder`] - Records the full event stream for inspection and tests

use std::collections::HashMap;

use crate::{
    analysis::ssa::PhiNode,
    ir::{Instruction, LocalId, Offset},
};

/// Receiver of SSA conversion results.
///
/// Every method is required; implement a method as a no-op to ignore that event.
///
/// # Event Order
///
/// - `unalias` for every assignment, block by block in discovery order, before any
///   instruction is emitted
/// - then for each reached block in discovery order and each instruction in
///   program order: the `unalias` and `phi` of every merge its operands need,
///   followed by exactly one `assignment`, `statement` or `branch`
///
/// # Examples
///
/// ```rust
/// use ssaform::{LocalId, Offset, PhiNode, SsaSink};
///
/// #[derive(Default)]
/// struct Printer(Vec<String>);
///
/// impl SsaSink<&'static str> for Printer {
///     fn unalias(&mut self, _local: LocalId, _original: LocalId) {}
///
///     fn phi(&mut self, phi: &PhiNode) {
///         self.0.push(phi.to_string());
///     }
///
///     fn assignment(
///         &mut self,
///         offset: Offset,
///         tag: &'static str,
///         dst: LocalId,
///         ops: Vec<LocalId>,
///     ) {
///         self.0.push(format!("{offset:#x}: {dst} = {tag} {ops:?}"));
///     }
///
///     fn statement(&mut self, offset: Offset, tag: &'static str, ops: Vec<LocalId>) {
///         self.0.push(format!("{offset:#x}: {tag} {ops:?}"));
///     }
///
///     fn branch(
///         &mut self,
///         offset: Offset,
///         tag: &'static str,
///         ops: Vec<LocalId>,
///         conditional: bool,
///         target: Offset,
///     ) {
///         self.0.push(format!("{offset:#x}: {tag} {ops:?} {conditional} -> {target:#x}"));
///     }
/// }
/// ```
pub trait SsaSink<T> {
    /// Reports that the fresh id `local` now stands for a definition of `original`.
    fn unalias(&mut self, local: LocalId, original: LocalId);

    /// Reports a merge of several reaching definitions.
    fn phi(&mut self, phi: &PhiNode);

    /// Emits a renamed assignment.
    fn assignment(&mut self, offset: Offset, tag: T, destination: LocalId, operands: Vec<LocalId>);

    /// Emits a renamed statement.
    fn statement(&mut self, offset: Offset, tag: T, operands: Vec<LocalId>);

    /// Emits a renamed branch.
    fn branch(
        &mut self,
        offset: Offset,
        tag: T,
        operands: Vec<LocalId>,
        conditional: bool,
        target: Offset,
    );
}

/// Dispatches a rewritten instruction to the matching sink method.
pub(crate) fn emit_instruction<T, S>(sink: &mut S, instruction: Instruction<T>)
where
    S: SsaSink<T> + ?Sized,
{
    match instruction {
        Instruction::Assignment {
            offset,
            tag,
            destination,
            operands,
        } => sink.assignment(offset, tag, destination, operands),
        Instruction::Statement {
            offset,
            tag,
            operands,
        } => sink.statement(offset, tag, operands),
        Instruction::Branch {
            offset,
            tag,
            operands,
            conditional,
            target,
        } => sink.branch(offset, tag, operands, conditional, target),
    }
}

/// A sink that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl<T> SsaSink<T> for NullSink {
    fn unalias(&mut self, _local: LocalId, _original: LocalId) {}

    fn phi(&mut self, _phi: &PhiNode) {}

    fn assignment(
        &mut self,
        _offset: Offset,
        _tag: T,
        _destination: LocalId,
        _operands: Vec<LocalId>,
    ) {
    }

    fn statement(&mut self, _offset: Offset, _tag: T, _operands: Vec<LocalId>) {}

    fn branch(
        &mut self,
        _offset: Offset,
        _tag: T,
        _operands: Vec<LocalId>,
        _conditional: bool,
        _target: Offset,
    ) {
    }
}

/// One event delivered to an [`SsaSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SsaEvent<T> {
    /// A fresh id was bound to an original local.
    Unalias {
        /// The fresh SSA id.
        local: LocalId,
        /// The original local it defines.
        original: LocalId,
    },
    /// A merge was placed.
    Phi(PhiNode),
    /// A renamed instruction was emitted.
    Instruction(Instruction<T>),
}

/// A sink that records every event in delivery order.
///
/// # Examples
///
/// ```rust
/// use ssaform::{EventRecorder, LocalId, SsaConverter};
///
/// let mut converter = SsaConverter::new();
/// converter
///     .emit_assignment(0, "a", LocalId::new(1), [])
///     .emit_statement(1, "b", [LocalId::new(1)]);
///
/// let mut recorder = EventRecorder::new();
/// converter.process(&mut recorder)?;
///
/// assert_eq!(recorder.instructions().count(), 2);
/// assert_eq!(recorder.phis().count(), 0);
/// # Ok::<(), ssaform::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct EventRecorder<T> {
    events: Vec<SsaEvent<T>>,
}

impl<T> Default for EventRecorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventRecorder<T> {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Returns the recorded events in delivery order.
    #[must_use]
    pub fn events(&self) -> &[SsaEvent<T>] {
        &self.events
    }

    /// Consumes the recorder and returns its events.
    #[must_use]
    pub fn into_events(self) -> Vec<SsaEvent<T>> {
        self.events
    }

    /// Returns the emitted instructions in delivery order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction<T>> + '_ {
        self.events.iter().filter_map(|event| match event {
            SsaEvent::Instruction(instruction) => Some(instruction),
            _ => None,
        })
    }

    /// Returns the reported phi nodes in delivery order.
    pub fn phis(&self) -> impl Iterator<Item = &PhiNode> + '_ {
        self.events.iter().filter_map(|event| match event {
            SsaEvent::Phi(phi) => Some(phi),
            _ => None,
        })
    }

    /// Returns the map from every fresh id to the original local it defines.
    #[must_use]
    pub fn unalias_map(&self) -> HashMap<LocalId, LocalId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SsaEvent::Unalias { local, original } => Some((*local, *original)),
                _ => None,
            })
            .collect()
    }

    /// Removes all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<T> SsaSink<T> for EventRecorder<T> {
    fn unalias(&mut self, local: LocalId, original: LocalId) {
        self.events.push(SsaEvent::Unalias { local, original });
    }

    fn phi(&mut self, phi: &PhiNode) {
        self.events.push(SsaEvent::Phi(phi.clone()));
    }

    fn assignment(&mut self, offset: Offset, tag: T, destination: LocalId, operands: Vec<LocalId>) {
        self.events.push(SsaEvent::Instruction(Instruction::Assignment {
            offset,
            tag,
            destination,
            operands,
        }));
    }

    fn statement(&mut self, offset: Offset, tag: T, operands: Vec<LocalId>) {
        self.events.push(SsaEvent::Instruction(Instruction::Statement {
            offset,
            tag,
            operands,
        }));
    }

    fn branch(
        &mut self,
        offset: Offset,
        tag: T,
        operands: Vec<LocalId>,
        conditional: bool,
        target: Offset,
    ) {
        self.events.push(SsaEvent::Instruction(Instruction::Branch {
            offset,
            tag,
            operands,
            conditional,
            target,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ssa::PhiOperand;

    fn l(id: u32) -> LocalId {
        LocalId::new(id)
    }

    #[test]
    fn test_emit_instruction_dispatch() {
        let mut recorder = EventRecorder::new();
        emit_instruction(
            &mut recorder,
            Instruction::Branch {
                offset: 4,
                tag: 'b',
                operands: vec![l(2)],
                conditional: true,
                target: 9,
            },
        );
        emit_instruction(
            &mut recorder,
            Instruction::Assignment {
                offset: 5,
                tag: 'a',
                destination: l(3),
                operands: vec![],
            },
        );

        let emitted: Vec<_> = recorder.instructions().cloned().collect();
        assert_eq!(
            emitted,
            vec![
                Instruction::Branch {
                    offset: 4,
                    tag: 'b',
                    operands: vec![l(2)],
                    conditional: true,
                    target: 9,
                },
                Instruction::Assignment {
                    offset: 5,
                    tag: 'a',
                    destination: l(3),
                    operands: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_recorder_unalias_map_and_phis() {
        let mut recorder: EventRecorder<()> = EventRecorder::new();
        recorder.unalias(l(5), l(1));
        recorder.unalias(l(6), l(1));
        let operands = vec![PhiOperand::new(l(5), 0), PhiOperand::new(l(6), 2)];
        let phi = PhiNode::new(3, l(7), l(1), operands);
        recorder.phi(&phi);

        let map = recorder.unalias_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&l(6)], l(1));
        assert_eq!(recorder.phis().collect::<Vec<_>>(), vec![&phi]);
        assert_eq!(recorder.events().len(), 3);

        recorder.clear();
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        let mut sink = NullSink;
        emit_instruction(
            &mut sink,
            Instruction::Statement {
                offset: 0,
                tag: "x",
                operands: vec![l(1)],
            },
        );
        SsaSink::<&str>::phi(&mut sink, &PhiNode::new(0, l(2), l(1), vec![]));
    }
}
