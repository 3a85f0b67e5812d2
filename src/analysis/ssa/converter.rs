//! The SSA conversion pipeline.
//!
//! Conversion runs three passes over one program:
//!
//! 1. **CFG construction** - [`ControlFlowGraph::from_instructions`] splits the
//!    instruction stream into blocks and links them.
//! 2. **Renaming** - every block gets fresh ids for its assignments and records
//!    which original locals it imports and which SSA ids it exports.
//! 3. **Resolution and emission** - imported reads are resolved through the
//!    predecessor graph, merges are reported as phis, and every instruction is
//!    handed to the sink.
//!
//! # Determinism
//!
//! Fresh ids for renaming are reserved block by block in discovery order before
//! any block is renamed. Blocks are independent during renaming, so the pass can
//! run on the rayon thread pool and still produce exactly the ids a sequential
//! pass would. The sink sees the same event stream either way.

use std::{collections::HashMap, mem};

use log::{debug, trace};
use rayon::prelude::*;

use crate::{
    analysis::{
        cfg::{Block, ControlFlowGraph},
        ssa::{
            emit_instruction, rename_block, ConversionStats, DefinitionSearch, LocalAllocator,
            PhiNode, SsaConfig, SsaSink,
        },
    },
    ir::{LocalId, Offset, Program, ProgramBuilder},
    utils::graph::NodeId,
    Error, Result,
};

/// Renames a slice of blocks against their reserved ids.
type RenameFn<T> = fn(&mut [Block<T>], &[Vec<LocalId>]) -> Result<Vec<Vec<(LocalId, LocalId)>>>;

/// Converts a program to SSA form, reporting results through `sink`.
///
/// Renaming always runs on the calling thread, so the tag type carries no
/// thread-safety bounds. Use [`convert_program_parallel`] to let renaming use
/// the rayon thread pool.
///
/// # Errors
///
/// - [`Error::EmptyProgram`] if the program has no instructions
/// - [`Error::DuplicateOffset`] if two instructions share an offset
/// - [`Error::DanglingBranchTarget`] if a branch targets an unoccupied offset and
///   [`SsaConfig::reject_dangling_targets`] is set
/// - [`Error::LocalIdExhausted`] if fresh ids run out
///
/// No sink method is called when CFG construction fails.
pub fn convert_program<T, S>(
    program: Program<T>,
    config: &SsaConfig,
    sink: &mut S,
) -> Result<ConversionStats>
where
    S: SsaSink<T> + ?Sized,
{
    run(program, config, sink, None)
}

/// Converts a program to SSA form, renaming blocks in parallel once the reached
/// block count meets [`SsaConfig::parallel_rename_threshold`].
///
/// The sink sees exactly the event stream [`convert_program`] would produce.
///
/// # Errors
///
/// See [`convert_program`].
pub fn convert_program_parallel<T, S>(
    program: Program<T>,
    config: &SsaConfig,
    sink: &mut S,
) -> Result<ConversionStats>
where
    T: Send,
    S: SsaSink<T> + ?Sized,
{
    run(program, config, sink, Some(rename_parallel::<T>))
}

fn run<T, S>(
    program: Program<T>,
    config: &SsaConfig,
    sink: &mut S,
    parallel: Option<RenameFn<T>>,
) -> Result<ConversionStats>
where
    S: SsaSink<T> + ?Sized,
{
    let (instructions, locals, labels) = program.into_parts();
    let mut allocator = LocalAllocator::new(locals);
    let mut cfg = ControlFlowGraph::from_instructions(instructions, &labels)?;

    if config.reject_dangling_targets {
        if let Some(&(branch, target)) = cfg.dangling_targets().first() {
            return Err(Error::DanglingBranchTarget { branch, target });
        }
    }

    let mut stats = ConversionStats {
        blocks: cfg.block_count(),
        reached_blocks: cfg.reached_count(),
        dangling_targets: cfg.dangling_targets().len(),
        ..ConversionStats::default()
    };

    let renamer = match parallel {
        Some(renamer) if config.rename_in_parallel(cfg.reached_count()) => renamer,
        _ => rename_sequential::<T>,
    };
    stats.definitions = rename(&mut cfg, &mut allocator, renamer, sink)?;
    resolve_and_emit(&mut cfg, &mut allocator, sink, &mut stats)?;

    debug!("SSA conversion finished: {stats}");
    Ok(stats)
}

fn rename_sequential<T>(
    blocks: &mut [Block<T>],
    reservations: &[Vec<LocalId>],
) -> Result<Vec<Vec<(LocalId, LocalId)>>> {
    blocks
        .iter_mut()
        .zip(reservations)
        .map(|(block, fresh)| rename_block(block, fresh))
        .collect()
}

fn rename_parallel<T: Send>(
    blocks: &mut [Block<T>],
    reservations: &[Vec<LocalId>],
) -> Result<Vec<Vec<(LocalId, LocalId)>>> {
    trace!("Renaming {} blocks in parallel", blocks.len());
    blocks
        .par_iter_mut()
        .zip(reservations.par_iter())
        .map(|(block, fresh)| rename_block(block, fresh))
        .collect()
}

/// Renames every block and reports the new definitions.
///
/// Returns the number of renamed assignments.
fn rename<T, S>(
    cfg: &mut ControlFlowGraph<T>,
    allocator: &mut LocalAllocator,
    renamer: RenameFn<T>,
    sink: &mut S,
) -> Result<usize>
where
    S: SsaSink<T> + ?Sized,
{
    // Indexed by NodeId; dangling blocks hold no assignments and get no ids.
    let mut reservations: Vec<Vec<LocalId>> = vec![Vec::new(); cfg.block_count()];
    for &node in cfg.order() {
        let count = cfg
            .block(node)
            .ok_or_else(|| invariant_error!("Block {} missing from CFG arena", node))?
            .assignment_count();
        reservations[node.index()] = allocator.reserve(count)?;
    }

    let definitions = renamer(cfg.blocks_mut(), &reservations)?;

    let mut total = 0;
    for &node in cfg.order() {
        for &(local, original) in &definitions[node.index()] {
            sink.unalias(local, original);
            total += 1;
        }
    }

    debug!("Renamed {} definitions across {} blocks", total, cfg.reached_count());
    Ok(total)
}

/// Resolves imported reads and emits every reached instruction in order.
fn resolve_and_emit<T, S>(
    cfg: &mut ControlFlowGraph<T>,
    allocator: &mut LocalAllocator,
    sink: &mut S,
    stats: &mut ConversionStats,
) -> Result<()>
where
    S: SsaSink<T> + ?Sized,
{
    let mut search = DefinitionSearch::new(cfg);
    let order = cfg.order().to_vec();

    for node in order {
        let instructions = mem::take(
            cfg.block_mut(node)
                .ok_or_else(|| invariant_error!("Block {} missing from CFG arena", node))?
                .instructions_mut(),
        );
        let block = cfg
            .block(node)
            .ok_or_else(|| invariant_error!("Block {} missing from CFG arena", node))?;
        let block_offset = block.offset();

        // original local -> id it resolves to on entry of this block
        let mut resolved: HashMap<LocalId, LocalId> = HashMap::new();

        for mut instruction in instructions {
            let offset = instruction.offset();
            for operand in instruction.operands_mut() {
                let original = *operand;
                if !block.imports(original) {
                    continue;
                }
                if let Some(&local) = resolved.get(&original) {
                    *operand = local;
                    continue;
                }

                let local = resolve_import(
                    &mut search,
                    cfg,
                    node,
                    original,
                    offset,
                    allocator,
                    sink,
                    stats,
                )?;
                if local == original {
                    debug!(
                        "{original} read at 0x{offset:X} has no reaching definition \
                         in block at 0x{block_offset:X}"
                    );
                }
                resolved.insert(original, local);
                *operand = local;
            }

            stats.record_emitted(instruction.kind());
            emit_instruction(sink, instruction);
        }
    }

    Ok(())
}

/// Resolves one imported local, placing a phi if several definitions reach it.
fn resolve_import<T, S>(
    search: &mut DefinitionSearch,
    cfg: &ControlFlowGraph<T>,
    node: NodeId,
    original: LocalId,
    offset: Offset,
    allocator: &mut LocalAllocator,
    sink: &mut S,
    stats: &mut ConversionStats,
) -> Result<LocalId>
where
    S: SsaSink<T> + ?Sized,
{
    let mut contributors = search.reaching_definitions(cfg, node, original);
    match contributors.len() {
        0 => {
            stats.unresolved_imports += 1;
            Ok(original)
        }
        1 => Ok(contributors.remove(0).value()),
        _ => {
            let result = allocator.fresh()?;
            sink.unalias(result, original);

            let phi = PhiNode::new(offset, result, original, contributors);
            trace!("Placed phi {phi}");
            sink.phi(&phi);
            stats.phis += 1;
            Ok(result)
        }
    }
}

/// Incremental front end for SSA conversion.
///
/// Combines a [`ProgramBuilder`] with an [`SsaConfig`]: instructions are emitted
/// in program order, then [`process`](Self::process) converts everything emitted
/// so far and leaves the converter empty for the next batch.
///
/// # Examples
///
/// ```rust
/// use ssaform::{EventRecorder, LocalId, SsaConverter};
///
/// let x = LocalId::new(1);
/// let mut converter = SsaConverter::new();
/// converter
///     .emit_assignment(0, "a", x, [])
///     .emit_branch(1, "b", [], true, 10)
///     .emit_assignment(2, "c", x, [])
///     .emit_branch(3, "d", [], false, 10)
///     .emit_statement(10, "e", [x]);
///
/// let mut recorder = EventRecorder::new();
/// let stats = converter.process(&mut recorder)?;
///
/// assert_eq!(stats.phis, 1);
/// let phi = recorder.phis().next().unwrap();
/// assert_eq!(phi.offset(), 10);
/// assert_eq!(phi.operand_count(), 2);
/// # Ok::<(), ssaform::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SsaConverter<T> {
    builder: ProgramBuilder<T>,
    config: SsaConfig,
}

impl<T> Default for SsaConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SsaConverter<T> {
    /// Creates a converter with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SsaConfig::default())
    }

    /// Creates a converter with the given configuration.
    #[must_use]
    pub fn with_config(config: SsaConfig) -> Self {
        Self {
            builder: ProgramBuilder::new(),
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SsaConfig {
        &self.config
    }

    /// Appends an assignment of `destination` computed from `operands`.
    pub fn emit_assignment<I>(
        &mut self,
        offset: Offset,
        tag: T,
        destination: LocalId,
        operands: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = LocalId>,
    {
        self.builder.emit_assignment(offset, tag, destination, operands);
        self
    }

    /// Appends a statement reading `operands`.
    pub fn emit_statement<I>(&mut self, offset: Offset, tag: T, operands: I) -> &mut Self
    where
        I: IntoIterator<Item = LocalId>,
    {
        self.builder.emit_statement(offset, tag, operands);
        self
    }

    /// Appends a branch to `target`.
    pub fn emit_branch<I>(
        &mut self,
        offset: Offset,
        tag: T,
        operands: I,
        conditional: bool,
        target: Offset,
    ) -> &mut Self
    where
        I: IntoIterator<Item = LocalId>,
    {
        self.builder.emit_branch(offset, tag, operands, conditional, target);
        self
    }

    /// Returns the number of instructions waiting to be converted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.builder.len()
    }

    /// Returns `true` if nothing has been emitted since the last conversion.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builder.is_empty()
    }

    /// Converts every instruction emitted so far on the calling thread.
    ///
    /// The pending program is consumed even when conversion fails.
    ///
    /// # Errors
    ///
    /// See [`convert_program`].
    pub fn process<S>(&mut self, sink: &mut S) -> Result<ConversionStats>
    where
        S: SsaSink<T> + ?Sized,
    {
        let program = mem::take(&mut self.builder).finish();
        convert_program(program, &self.config, sink)
    }
}

impl<T: Send> SsaConverter<T> {
    /// Converts every instruction emitted so far, renaming on the rayon thread
    /// pool when the program is large enough.
    ///
    /// # Errors
    ///
    /// See [`convert_program`].
    pub fn process_parallel<S>(&mut self, sink: &mut S) -> Result<ConversionStats>
    where
        S: SsaSink<T> + ?Sized,
    {
        let program = mem::take(&mut self.builder).finish();
        convert_program_parallel(program, &self.config, sink)
    }
}
