//! Dynamic recompiler engine.
//!
//! The recompiler keeps the cached interpreter's page-block structure but
//! executes each block through a [`CompiledBlock`], produced by a pluggable
//! [`CodeGenerator`]. When no generator is installed the engine degrades to
//! per-block stepped interpretation, which preserves the dynarec's external
//! contract (hot-state register layout, deferred redirects) without any
//! native code.
//!
//! Redirects from outside the run loop are deferred: generated code owns the
//! hot-state program counter while it runs, so callers raise a pending flag
//! and the loop honors it at the next block boundary.

use std::collections::HashMap;

use crate::cache::{BlockCache, CodeBlock};
use crate::common::constants::PAGE_BASE_MASK;
use crate::core::Cpu;
use crate::engine::{translate_page, InstructionSet, StepOutcome};

/// One executable translation of a guest page.
///
/// `run` executes from the current hot-state program counter until control
/// leaves the block's address range, the stop flag is raised, or a deferred
/// redirect is pending. Implementations update the hot state directly and
/// account retired instructions themselves.
pub trait CompiledBlock: Send {
    /// Executes until control leaves the block.
    fn run(&mut self, cpu: &mut Cpu, iset: &mut dyn InstructionSet);
}

/// Produces compiled blocks from decoded guest pages.
///
/// `no_compiled_jump` asks the generator to return to the dispatch loop on
/// every taken jump instead of linking blocks together; generators that do
/// not link blocks may ignore it.
pub trait CodeGenerator: Send {
    /// Compiles one decoded page.
    fn compile(&mut self, block: &CodeBlock, no_compiled_jump: bool) -> Box<dyn CompiledBlock>;
}

/// Fallback block used when no code generator is installed.
///
/// Steps the block's nodes through the executor, leaving on any transfer out
/// of the page. With `no_compiled_jump` set it also leaves on transfers that
/// stay inside the page, so every jump goes back through dispatch.
pub struct InterpretedBlock {
    block: CodeBlock,
    no_compiled_jump: bool,
}

impl InterpretedBlock {
    /// Wraps a decoded page for stepped execution.
    pub fn new(block: CodeBlock, no_compiled_jump: bool) -> Self {
        Self {
            block,
            no_compiled_jump,
        }
    }
}

impl CompiledBlock for InterpretedBlock {
    fn run(&mut self, cpu: &mut Cpu, iset: &mut dyn InstructionSet) {
        loop {
            if cpu.backing.stop() || cpu.backing.redirect_pending() {
                return;
            }
            let pc = cpu.backing.pc_raw();
            let Some(index) = self.block.index_of(pc) else {
                return;
            };
            let instr = self.block.instrs[index];

            let outcome = iset.execute(cpu, pc, instr.word);
            cpu.cp0.advance_count(1);
            cpu.stats.instructions_retired += 1;

            match outcome {
                StepOutcome::Continue => cpu.backing.set_pc_raw(pc.wrapping_add(4)),
                StepOutcome::Jump(target) => {
                    cpu.backing.set_pc_raw(target);
                    if self.no_compiled_jump {
                        return;
                    }
                }
                StepOutcome::Stop => {
                    cpu.backing.set_stop(true);
                    return;
                }
            }
        }
    }
}

/// The recompiler engine: decoded source pages plus their compiled forms.
pub struct Dynarec {
    source: BlockCache,
    compiled: HashMap<u32, Box<dyn CompiledBlock>>,
    generator: Option<Box<dyn CodeGenerator>>,
    no_compiled_jump: bool,
}

impl Dynarec {
    /// Creates the engine with no generator installed.
    pub fn new(no_compiled_jump: bool) -> Self {
        Self {
            source: BlockCache::new(),
            compiled: HashMap::new(),
            generator: None,
            no_compiled_jump,
        }
    }

    /// Installs a code generator. Existing compiled blocks are dropped so
    /// every page is recompiled through the new generator.
    pub fn install_generator(&mut self, generator: Box<dyn CodeGenerator>) {
        self.compiled.clear();
        self.generator = Some(generator);
    }

    /// Runs until the stop flag is raised.
    pub fn run(&mut self, cpu: &mut Cpu, iset: &mut dyn InstructionSet) {
        while !cpu.backing.stop() {
            for (addr, size) in cpu.take_pending_invalidations() {
                cpu.stats.blocks_invalidated += self.invalidate(addr, size);
            }

            // A deferred redirect has already written the hot-state program
            // counter; consuming it just lowers the flag.
            let _ = cpu.backing.take_pending_redirect();

            let pc = cpu.backing.pc_raw();
            let page = pc & PAGE_BASE_MASK;

            if !self.source.contains(page) {
                let Some(block) = translate_page(cpu, pc) else {
                    tracing::error!("cannot translate fetch page at {pc:#010x}, stopping");
                    cpu.backing.set_stop(true);
                    return;
                };
                self.source.insert(block);
            }

            if !self.compiled.contains_key(&page) {
                let Some(src) = self.source.get(page) else {
                    return;
                };
                let compiled = match self.generator.as_mut() {
                    Some(generator) => generator.compile(src, self.no_compiled_jump),
                    None => Box::new(InterpretedBlock::new(src.clone(), self.no_compiled_jump)),
                };
                self.compiled.insert(page, compiled);
            }

            if let Some(block) = self.compiled.get_mut(&page) {
                block.run(cpu, iset);
            }
        }
    }

    /// Removes blocks intersecting the range; returns the count removed.
    ///
    /// Compiled forms are keyed identically to their source pages and are
    /// dropped whenever their source goes.
    pub fn invalidate(&mut self, addr: u32, size: u32) -> u64 {
        let removed = self.source.invalidate(addr, size);
        let source = &self.source;
        self.compiled.retain(|page, _| source.contains(*page));
        removed
    }

    /// Drops every source and compiled block.
    pub fn free_blocks(&mut self) {
        self.source.free();
        self.compiled.clear();
    }

    /// Returns `true` when the page has a live source block.
    pub fn has_block(&self, page: u32) -> bool {
        self.source.contains(page)
    }
}
