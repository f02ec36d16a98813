//! The execution core's CPU state.
//!
//! [`Cpu`] aggregates everything a single guest CPU owns: the
//! engine-selected register backing, both coprocessor register files, the
//! physical memory map, and the cached-code bookkeeping shared between the
//! store path and the execution engines. Engines borrow the whole structure
//! mutably for the duration of a run; everything else reaches it through the
//! top-level core handle.

/// System control coprocessor registers.
pub mod cop0;

/// Floating-point coprocessor registers.
pub mod cop1;

/// Memory access gateway (virtual-address read/write/fetch paths).
pub mod gateway;

/// Register file layouts and the program counter representation.
pub mod registers;

use crate::cache::CodePageMap;
use crate::common::constants::PHYS_WINDOW_SIZE;
use crate::config::Config;
use crate::core::cop0::Cp0;
use crate::core::cop1::Cp1;
use crate::core::registers::Backing;
use crate::mem::MemoryMap;
use crate::stats::CoreStats;

/// One guest CPU: registers, coprocessors, memory, and code bookkeeping.
pub struct Cpu {
    /// Engine-selected register storage.
    pub backing: Backing,
    /// System control coprocessor.
    pub cp0: Cp0,
    /// Floating-point coprocessor.
    pub cp1: Cp1,
    /// Physical memory map.
    pub mem: MemoryMap,
    /// Per-physical-page translated-code bitmap.
    pub code_map: CodePageMap,
    /// Invalidation requests queued by the store path, drained by the active
    /// engine before it resumes dispatch.
    pub pending_invalidations: Vec<(u32, u32)>,
    /// Run counters.
    pub stats: CoreStats,
}

impl Cpu {
    /// Builds a CPU from configuration. State is zeroed; call
    /// [`Cpu::poweron`] before executing.
    pub fn new(config: &Config) -> Self {
        Self {
            backing: Backing::for_mode(config.general.emumode),
            cp0: Cp0::new(config.general.count_per_op),
            cp1: Cp1::new(),
            mem: MemoryMap::new(config.system.rdram_size),
            code_map: CodePageMap::new(PHYS_WINDOW_SIZE),
            pending_invalidations: Vec::new(),
            stats: CoreStats::default(),
        }
    }

    /// Resets all architectural state to power-on values.
    ///
    /// Memory contents are untouched; boot code injected before power-on
    /// survives, matching hardware where RDRAM is not cleared by reset.
    pub fn poweron(&mut self) {
        self.backing.poweron();
        self.cp0.poweron();
        self.cp1.poweron();
        self.code_map.clear_all();
        self.pending_invalidations.clear();
        self.stats.reset();
    }

    /// Takes the queued invalidation requests, leaving the queue empty.
    pub fn take_pending_invalidations(&mut self) -> Vec<(u32, u32)> {
        std::mem::take(&mut self.pending_invalidations)
    }
}
