//! Scripted instruction executor.
//!
//! The core treats instruction semantics as a collaborator seam, so tests
//! drive it with a mock executor whose behavior is keyed by fetch address:
//! each scripted address maps to one [`MockOp`], and every unscripted address
//! behaves as a no-op falling through to the next instruction. The executor
//! records every address it is asked to execute, giving tests an exact
//! dispatch trace regardless of which engine ran.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use r4300_core::common::VirtAddr;
use r4300_core::core::Cpu;
use r4300_core::{InstructionSet, StepOutcome};

/// One scripted behavior at a fetch address.
#[derive(Clone, Copy, Debug)]
pub enum MockOp {
    /// Fall through to the next instruction.
    Nop,
    /// Transfer control to the given virtual address.
    Jump(u32),
    /// Stop the run loop.
    Stop,
    /// Store a full word through the gateway, then fall through.
    StoreWord { addr: u32, value: u32 },
    /// Write a general-purpose register, then fall through.
    SetReg { idx: usize, value: i64 },
}

/// Shared handle to the dispatch trace.
pub type Trace = Arc<Mutex<Vec<u32>>>;

/// Address-keyed scripted executor.
pub struct ScriptedIset {
    ops: HashMap<u32, MockOp>,
    trace: Trace,
}

impl ScriptedIset {
    /// Creates an empty script and the trace handle observing it.
    pub fn new() -> (Self, Trace) {
        let trace: Trace = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                ops: HashMap::new(),
                trace: Arc::clone(&trace),
            },
            trace,
        )
    }

    /// Scripts the behavior at `addr`.
    pub fn script(&mut self, addr: u32, op: MockOp) {
        self.ops.insert(addr, op);
    }
}

impl InstructionSet for ScriptedIset {
    fn execute(&mut self, cpu: &mut Cpu, addr: u32, _word: u32) -> StepOutcome {
        self.trace.lock().unwrap().push(addr);
        match self.ops.get(&addr).copied().unwrap_or(MockOp::Nop) {
            MockOp::Nop => StepOutcome::Continue,
            MockOp::Jump(target) => StepOutcome::Jump(target),
            MockOp::Stop => StepOutcome::Stop,
            MockOp::StoreWord { addr, value } => {
                cpu.write_word(VirtAddr::new(addr), value, 0xffff_ffff)
                    .unwrap();
                StepOutcome::Continue
            }
            MockOp::SetReg { idx, value } => {
                cpu.backing.set_reg(idx, value);
                StepOutcome::Continue
            }
        }
    }
}
