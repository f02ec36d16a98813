//! Cached interpreter.
//!
//! Guest pages are decoded once into blocks of nodes; the run loop walks the
//! current block node by node and only returns to translation on a block
//! exit, a redirect into an untranslated page, or an invalidation. The
//! program counter holds a node position while inside a block, so
//! sequential dispatch is an index increment rather than an address lookup.

use crate::cache::BlockCache;
use crate::common::constants::PAGE_BASE_MASK;
use crate::core::Cpu;
use crate::engine::{translate_page, InstructionSet, StepOutcome};

/// Block-walking interpreter engine.
#[derive(Debug, Default)]
pub struct CachedInterpreter {
    blocks: BlockCache,
}

impl CachedInterpreter {
    /// Creates the engine with an empty block table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs until the stop flag is raised.
    pub fn run(&mut self, cpu: &mut Cpu, iset: &mut dyn InstructionSet) {
        while !cpu.backing.stop() {
            for (addr, size) in cpu.take_pending_invalidations() {
                cpu.stats.blocks_invalidated += self.blocks.invalidate(addr, size);
            }

            let Some((page, index, addr)) = self.resolve(cpu) else {
                break;
            };

            let Some(instr) = self.blocks.get(page).and_then(|b| b.instrs.get(index)).copied()
            else {
                // resolve() only yields live positions; a miss here means the
                // block table was corrupted.
                tracing::error!("lost current block at {page:#010x} node {index}");
                cpu.backing.set_stop(true);
                break;
            };

            match iset.execute(cpu, addr, instr.word) {
                StepOutcome::Continue => {
                    let len = self.blocks.get(page).map(|b| b.instrs.len()).unwrap_or(0);
                    if index + 1 < len {
                        cpu.backing.set_pc_node(page, index + 1, addr.wrapping_add(4));
                    } else {
                        cpu.backing.set_pc_raw(addr.wrapping_add(4));
                    }
                }
                StepOutcome::Jump(target) => self.jump_to(cpu, target),
                StepOutcome::Stop => cpu.backing.set_stop(true),
            }

            cpu.cp0.advance_count(1);
            cpu.stats.instructions_retired += 1;
        }
    }

    /// Resolves the program counter to a live node, translating the current
    /// page if needed. `None` stops the run (untranslatable fetch address).
    fn resolve(&mut self, cpu: &mut Cpu) -> Option<(u32, usize, u32)> {
        if let Some((page, index, addr)) = cpu.backing.pc_node() {
            if self.blocks.contains(page) {
                return Some((page, index, addr));
            }
        }

        let raw = cpu.backing.pc_raw();
        let page = raw & PAGE_BASE_MASK;
        if !self.blocks.contains(page) {
            let Some(block) = translate_page(cpu, raw) else {
                tracing::error!("cannot translate fetch page at {raw:#010x}, stopping");
                cpu.backing.set_stop(true);
                return None;
            };
            self.blocks.insert(block);
        }
        let index = self.blocks.get(page).and_then(|b| b.index_of(raw))?;
        cpu.backing.set_pc_node(page, index, raw);
        Some((page, index, raw))
    }

    /// Redirects to `addr`, entering block form when a translation exists.
    pub fn jump_to(&mut self, cpu: &mut Cpu, addr: u32) {
        let page = addr & PAGE_BASE_MASK;
        if let Some(index) = self.blocks.get(page).and_then(|b| b.index_of(addr)) {
            cpu.backing.set_pc_node(page, index, addr);
        } else {
            cpu.backing.set_pc_raw(addr);
        }
    }

    /// Removes blocks intersecting the range; returns the count removed.
    pub fn invalidate(&mut self, addr: u32, size: u32) -> u64 {
        self.blocks.invalidate(addr, size)
    }

    /// Drops every block.
    pub fn free_blocks(&mut self) {
        self.blocks.free();
    }

    /// Returns `true` when the page has a live block.
    pub fn has_block(&self, page: u32) -> bool {
        self.blocks.contains(page)
    }
}
