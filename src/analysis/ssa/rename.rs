//! Block-local renaming.
//!
//! Renaming looks at one block in isolation. It never consults predecessors, so
//! every block can be renamed independently once its fresh ids are known.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    analysis::cfg::Block,
    ir::{Instruction, LocalId},
    Result,
};

/// Renames the definitions of one block and classifies its reads.
///
/// Walks the instructions in order with an empty export map:
///
/// - an operand with an export entry is rewritten to the SSA id it maps to;
///   otherwise its original id is kept and recorded as imported
/// - an assignment, after its operands, takes the next id from `fresh`, which
///   becomes its destination and the block's export for the original local
///
/// The resulting import set and export map are stored on the block.
///
/// # Arguments
///
/// * `block` - The block to rewrite in place
/// * `fresh` - Exactly one reserved id per assignment, in instruction order
///
/// # Returns
///
/// `(fresh id, original local)` for every assignment, in instruction order.
///
/// # Errors
///
/// Returns [`crate::Error::InvariantViolation`] if `fresh` does not hold
/// exactly one id per assignment.
pub fn rename_block<T>(block: &mut Block<T>, fresh: &[LocalId]) -> Result<Vec<(LocalId, LocalId)>> {
    let mut imported = BTreeSet::new();
    let mut exported: BTreeMap<LocalId, LocalId> = BTreeMap::new();
    let mut definitions = Vec::with_capacity(fresh.len());
    let mut ids = fresh.iter().copied();
    let offset = block.offset();

    for instruction in block.instructions_mut() {
        for operand in instruction.operands_mut() {
            match exported.get(&*operand) {
                Some(&renamed) => *operand = renamed,
                None => {
                    imported.insert(*operand);
                }
            }
        }

        if let Instruction::Assignment { destination, .. } = instruction {
            let renamed = ids.next().ok_or_else(|| {
                invariant_error!(
                    "Block at 0x{:X} has more assignments than the {} reserved ids",
                    offset,
                    fresh.len()
                )
            })?;
            definitions.push((renamed, *destination));
            exported.insert(*destination, renamed);
            *destination = renamed;
        }
    }

    if ids.next().is_some() {
        return Err(invariant_error!(
            "Reserved {} ids for block at 0x{:X} but only {} assignments were renamed",
            fresh.len(),
            offset,
            definitions.len()
        ));
    }

    block.set_locals(imported, exported);
    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn l(id: u32) -> LocalId {
        LocalId::new(id)
    }

    fn assign(offset: u32, destination: u32, operands: &[u32]) -> Instruction<()> {
        Instruction::Assignment {
            offset,
            tag: (),
            destination: l(destination),
            operands: operands.iter().copied().map(l).collect(),
        }
    }

    fn stmt(offset: u32, operands: &[u32]) -> Instruction<()> {
        Instruction::Statement {
            offset,
            tag: (),
            operands: operands.iter().copied().map(l).collect(),
        }
    }

    #[test]
    fn test_rename_chain() {
        // x1 = x2; x1 = x1 + x3; use x1
        let mut block = Block::new(0);
        block.push(assign(0, 1, &[2]));
        block.push(assign(1, 1, &[1, 3]));
        block.push(stmt(2, &[1]));

        let defs = rename_block(&mut block, &[l(10), l(11)]).unwrap();
        assert_eq!(defs, vec![(l(10), l(1)), (l(11), l(1))]);

        let instructions = block.instructions();
        assert_eq!(instructions[0].destination(), Some(l(10)));
        assert_eq!(instructions[0].operands(), &[l(2)]);
        assert_eq!(instructions[1].destination(), Some(l(11)));
        assert_eq!(instructions[1].operands(), &[l(10), l(3)]);
        assert_eq!(instructions[2].operands(), &[l(11)]);

        assert_eq!(block.imported().iter().copied().collect::<Vec<_>>(), vec![l(2), l(3)]);
        assert_eq!(block.exported_local(l(1)), Some(l(11)));
        assert_eq!(block.exported().len(), 1);
    }

    #[test]
    fn test_read_before_write_is_imported() {
        // x1 = x1 reads the incoming value, then redefines it
        let mut block = Block::new(4);
        block.push(assign(4, 1, &[1]));
        block.push(stmt(5, &[1]));

        rename_block(&mut block, &[l(7)]).unwrap();
        assert!(block.imports(l(1)));
        assert_eq!(block.instructions()[0].operands(), &[l(1)]);
        assert_eq!(block.instructions()[1].operands(), &[l(7)]);
    }

    #[test]
    fn test_rename_without_assignments() {
        let mut block = Block::new(0);
        block.push(stmt(0, &[4, 4]));

        let defs = rename_block(&mut block, &[]).unwrap();
        assert!(defs.is_empty());
        assert!(block.imports(l(4)));
        assert!(block.exported().is_empty());
    }

    #[test]
    fn test_reservation_mismatch() {
        let mut block = Block::new(0);
        block.push(assign(0, 1, &[]));

        assert!(matches!(
            rename_block(&mut block, &[]),
            Err(Error::InvariantViolation { .. })
        ));

        let mut block = Block::new(0);
        block.push(assign(0, 1, &[]));
        assert!(matches!(
            rename_block(&mut block, &[l(2), l(3)]),
            Err(Error::InvariantViolation { .. })
        ));
    }
}
