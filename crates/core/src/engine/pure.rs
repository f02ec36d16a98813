//! Pure interpreter.
//!
//! The simplest engine: every iteration fetches one word through the gateway
//! and hands it to the executor. No translation state exists, so the store
//! path's invalidation queue is drained into the void and redirects are plain
//! program counter writes.

use crate::common::VirtAddr;
use crate::core::Cpu;
use crate::engine::{InstructionSet, StepOutcome};

/// Fetch-decode-execute loop with no cached state.
#[derive(Debug, Default)]
pub struct PureInterpreter;

impl PureInterpreter {
    /// Creates the engine.
    pub fn new() -> Self {
        Self
    }

    /// Runs until the stop flag is raised.
    pub fn run(&mut self, cpu: &mut Cpu, iset: &mut dyn InstructionSet) {
        while !cpu.backing.stop() {
            // No blocks exist, so queued invalidations are already satisfied.
            cpu.pending_invalidations.clear();

            let pc = cpu.backing.pc_raw();
            let word = match cpu.fetch_word(VirtAddr::new(pc)) {
                Ok(w) => w,
                Err(fault) => {
                    tracing::error!(%fault, "instruction fetch failed, stopping");
                    cpu.backing.set_stop(true);
                    break;
                }
            };

            match iset.execute(cpu, pc, word) {
                StepOutcome::Continue => cpu.backing.set_pc_raw(pc.wrapping_add(4)),
                StepOutcome::Jump(target) => cpu.backing.set_pc_raw(target),
                StepOutcome::Stop => cpu.backing.set_stop(true),
            }

            cpu.cp0.advance_count(1);
            cpu.stats.instructions_retired += 1;
        }
    }
}
