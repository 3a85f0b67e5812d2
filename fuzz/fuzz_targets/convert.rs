#![no_main]

use std::collections::HashSet;

use libfuzzer_sys::fuzz_target;
use ssaform::{EventRecorder, Instruction, LocalId, SsaConfig, SsaConverter};

// Each instruction takes four bytes: shape, destination/target, two operands.
// Locals come from a small range so that definitions collide and merge.
fuzz_target!(|data: &[u8]| {
    let count = (data.len() / 4).min(512) as u32;
    if count == 0 {
        return;
    }

    let config = SsaConfig::new().with_parallel_rename_threshold(8);
    let mut converter = SsaConverter::with_config(config);
    let mut originals = HashSet::new();
    for (offset, chunk) in (0u32..).zip(data.chunks_exact(4).take(count as usize)) {
        let operands = [
            LocalId::new(u32::from(chunk[2] % 8)),
            LocalId::new(u32::from(chunk[3] % 8)),
        ];
        originals.extend(operands);
        match chunk[0] % 4 {
            0 | 1 => {
                let destination = LocalId::new(u32::from(chunk[1] % 8));
                originals.insert(destination);
                converter.emit_assignment(offset, offset, destination, operands);
            }
            2 => {
                converter.emit_statement(offset, offset, operands);
            }
            _ => {
                // targets past the end exercise dangling blocks
                let target = u32::from(chunk[1]) % (count + 2);
                converter.emit_branch(offset, offset, operands, chunk[0] & 0x80 != 0, target);
            }
        }
    }

    let mut recorder = EventRecorder::new();
    let stats = converter.process_parallel(&mut recorder).expect("well-formed program");

    // order preservation
    let emitted: Vec<&Instruction<u32>> = recorder.instructions().collect();
    assert_eq!(emitted.len() as u32, count);
    assert_eq!(stats.total_emitted() as u32, count);
    for (expected, instruction) in (0u32..).zip(&emitted) {
        assert_eq!(instruction.offset(), expected);
        assert_eq!(*instruction.tag(), expected);
    }

    // freshness and single assignment
    let mut defined = HashSet::new();
    for local in emitted
        .iter()
        .filter_map(|i| i.destination())
        .chain(recorder.phis().map(|phi| phi.result()))
    {
        assert!(!originals.contains(&local));
        assert!(defined.insert(local));
    }
});
