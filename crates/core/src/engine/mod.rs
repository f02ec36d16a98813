//! Execution engines.
//!
//! The core supports three mutually exclusive engines, selected once from
//! configuration and never switched mid-run:
//! 1. **Pure Interpreter:** Fetches, decodes, and executes one word at a
//!    time straight from the gateway. No translation state exists at all.
//! 2. **Cached Interpreter:** Translates one guest page at a time into a
//!    block of decoded nodes and walks the block, re-entering translation
//!    only on block exit or invalidation.
//! 3. **Dynarec:** Extends the cached design with per-block compiled
//!    execution through a pluggable code generator, falling back to stepped
//!    interpretation of the block when no generator is installed.
//!
//! All three share the same outer contract: honor the stop flag between
//! instructions, drain queued invalidations before dispatching into cached
//! state, and redirect through the engine so the program counter
//! representation stays consistent with the engine's bookkeeping.

/// Cached-interpreter engine.
pub mod cached;

/// Dynamic-recompiler engine and its code generation seams.
pub mod dynarec;

/// Pure-interpreter engine.
pub mod pure;

use serde::Deserialize;

use crate::cache::{CodeBlock, DecodedInstr};
use crate::common::constants::{PAGE_BASE_MASK, PAGE_SIZE, PAGE_WORDS};
use crate::common::{VirtAddr, BOOT_VECTOR};
use crate::core::Cpu;
use crate::engine::cached::CachedInterpreter;
use crate::engine::dynarec::Dynarec;
use crate::engine::pure::PureInterpreter;

/// Which execution engine drives the core.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub enum EmulationMode {
    /// Fetch-decode-execute every instruction from memory.
    PureInterpreter,
    /// Decode guest pages into blocks and interpret the blocks.
    #[default]
    CachedInterpreter,
    /// Compile guest pages through a pluggable code generator.
    Dynarec,
}

/// What the executor asks the engine to do after one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Fall through to the next sequential instruction.
    Continue,
    /// Transfer control to the given virtual address.
    Jump(u32),
    /// Stop the execution loop.
    Stop,
}

/// Executes decoded guest instructions against the CPU.
///
/// The core owns fetch, dispatch, and retirement bookkeeping; the concrete
/// instruction semantics (ALU, FPU, loads and stores through the gateway,
/// exception delivery) live behind this seam.
pub trait InstructionSet: Send {
    /// Executes the instruction `word` fetched from `addr`.
    fn execute(&mut self, cpu: &mut Cpu, addr: u32, word: u32) -> StepOutcome;
}

/// Translates the guest page containing `addr` into a decoded block.
///
/// Returns `None` when the page cannot be fetched (mapped space with no
/// resident translation); the caller decides whether that stops the run.
/// On success the block's physical page is marked in the code page map so
/// later stores into it queue invalidations.
pub(crate) fn translate_page(cpu: &mut Cpu, addr: u32) -> Option<CodeBlock> {
    let page = addr & PAGE_BASE_MASK;
    let vpage = VirtAddr::new(page);
    if !vpage.is_direct_mapped() {
        return None;
    }
    let phys_start = vpage.direct_phys().val();

    let mut instrs = Vec::with_capacity(PAGE_WORDS);
    for i in 0..PAGE_WORDS {
        let va = page + (i as u32) * 4;
        // The whole page is directly mapped, so fetches cannot fault.
        let word = match cpu.fetch_word(VirtAddr::new(va)) {
            Ok(w) => w,
            Err(_) => return None,
        };
        instrs.push(DecodedInstr { addr: va, word });
    }

    cpu.code_map.mark_range(phys_start, PAGE_SIZE);
    cpu.stats.blocks_translated += 1;

    Some(CodeBlock {
        start: page,
        end: page + PAGE_SIZE,
        phys_start,
        instrs,
    })
}

/// The engine selected at initialization.
///
/// Enum dispatch rather than a boxed trait: the variant is fixed for the
/// lifetime of the core and the run loops are the hottest code in the crate.
pub enum EngineDispatch {
    /// Pure interpreter.
    Pure(PureInterpreter),
    /// Cached interpreter.
    Cached(CachedInterpreter),
    /// Dynamic recompiler.
    Dynarec(Dynarec),
}

impl EngineDispatch {
    /// Builds the engine for the configured mode.
    pub fn for_mode(mode: EmulationMode, no_compiled_jump: bool) -> Self {
        match mode {
            EmulationMode::PureInterpreter => Self::Pure(PureInterpreter::new()),
            EmulationMode::CachedInterpreter => Self::Cached(CachedInterpreter::new()),
            EmulationMode::Dynarec => Self::Dynarec(Dynarec::new(no_compiled_jump)),
        }
    }

    /// Runs the engine until the stop flag is raised.
    ///
    /// A cold start (program counter still zero from power-on) enters at the
    /// boot vector; nothing is cached for address zero, so dispatching there
    /// would be a translation of uninitialized state.
    pub fn run(&mut self, cpu: &mut Cpu, iset: &mut dyn InstructionSet) {
        if cpu.backing.pc_raw() == 0 {
            self.jump_to(cpu, BOOT_VECTOR);
        }
        match self {
            Self::Pure(e) => e.run(cpu, iset),
            Self::Cached(e) => e.run(cpu, iset),
            Self::Dynarec(e) => e.run(cpu, iset),
        }
    }

    /// Redirects execution to `addr` in the engine's own representation.
    pub fn jump_to(&mut self, cpu: &mut Cpu, addr: u32) {
        match self {
            Self::Pure(_) => cpu.backing.set_pc_raw(addr),
            Self::Cached(e) => e.jump_to(cpu, addr),
            Self::Dynarec(_) => cpu.backing.raise_redirect(addr),
        }
    }

    /// Removes cached translations whose source intersects
    /// `[addr, addr + size)`; `size == 0` removes everything.
    pub fn invalidate(&mut self, cpu: &mut Cpu, addr: u32, size: u32) {
        let removed = match self {
            Self::Pure(_) => 0,
            Self::Cached(e) => e.invalidate(addr, size),
            Self::Dynarec(e) => e.invalidate(addr, size),
        };
        cpu.stats.blocks_invalidated += removed;
        if size == 0 {
            cpu.code_map.clear_all();
        }
    }

    /// Drops all cached translations and clears the code page map.
    pub fn free_blocks(&mut self, cpu: &mut Cpu) {
        match self {
            Self::Pure(_) => {}
            Self::Cached(e) => e.free_blocks(),
            Self::Dynarec(e) => e.free_blocks(),
        }
        cpu.code_map.clear_all();
        cpu.pending_invalidations.clear();
    }

    /// Returns `true` when a translation exists for the page containing
    /// `addr`.
    pub fn has_block(&self, addr: u32) -> bool {
        let page = addr & PAGE_BASE_MASK;
        match self {
            Self::Pure(_) => false,
            Self::Cached(e) => e.has_block(page),
            Self::Dynarec(e) => e.has_block(page),
        }
    }
}
