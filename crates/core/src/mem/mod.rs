//! Physical memory map.
//!
//! This module implements the physical side of the memory system. It
//! provides:
//! 1. **Backing Store:** The lazily-mapped 512 MiB linear window holding
//!    RDRAM, SP memory, cartridge space, and everything else that is plain
//!    storage.
//! 2. **Handler Dispatch:** Registered peripherals claim physical ranges;
//!    accesses falling inside a claimed range go to the peripheral, all
//!    others to the linear window.
//!
//! Addresses arriving here have already been translated and masked by the
//! memory access gateway; this layer never sees virtual addresses.

/// Memory handler trait and the resident interrupt controller registers.
pub mod handler;

/// Raw backing store for the physical window.
pub mod linear;

use self::handler::{MemHandler, MiRegs, MI_BASE, MI_SIZE};
use self::linear::LinearMemory;
use crate::common::constants::{PHYS_WINDOW_SIZE, PHYS_WORD_MASK};

struct MappedHandler {
    base: u32,
    size: u32,
    handler: Box<dyn MemHandler>,
}

/// The guest physical address map: linear window plus registered handlers.
pub struct MemoryMap {
    base: LinearMemory,
    rdram_size: usize,
    handlers: Vec<MappedHandler>,
}

impl MemoryMap {
    /// Creates the physical map with the interrupt controller registers
    /// already resident.
    ///
    /// `rdram_size` bounds the region reported as installed RAM; the linear
    /// window always spans the full physical space regardless.
    pub fn new(rdram_size: usize) -> Self {
        let mut map = Self {
            base: LinearMemory::new(PHYS_WINDOW_SIZE),
            rdram_size,
            handlers: Vec::new(),
        };
        map.register(MI_BASE, MI_SIZE, Box::new(MiRegs::new()));
        map
    }

    /// Registers a peripheral over `[base, base + size)`.
    ///
    /// Later registrations win when ranges overlap; the core itself never
    /// registers overlapping handlers.
    pub fn register(&mut self, base: u32, size: u32, handler: Box<dyn MemHandler>) {
        self.handlers.push(MappedHandler {
            base,
            size,
            handler,
        });
    }

    fn find(&mut self, paddr: u32) -> Option<(&mut dyn MemHandler, u32)> {
        for m in self.handlers.iter_mut().rev() {
            if paddr >= m.base && paddr - m.base < m.size {
                return Some((m.handler.as_mut(), paddr - m.base));
            }
        }
        None
    }

    /// Reads the aligned word at the masked physical address.
    pub fn read_u32(&mut self, paddr: u32) -> u32 {
        debug_assert_eq!(paddr & !PHYS_WORD_MASK, 0);
        match self.find(paddr) {
            Some((handler, offset)) => handler.read_u32(offset),
            None => self.base.read_u32(paddr),
        }
    }

    /// Writes the aligned word at the masked physical address, changing only
    /// the bits selected by `mask`.
    pub fn write_u32(&mut self, paddr: u32, value: u32, mask: u32) {
        debug_assert_eq!(paddr & !PHYS_WORD_MASK, 0);
        match self.find(paddr) {
            Some((handler, offset)) => handler.write_u32(offset, value, mask),
            None => self.base.write_u32(paddr, value, mask),
        }
    }

    /// Returns `true` when a registered peripheral claims the address.
    pub fn has_handler(&self, paddr: u32) -> bool {
        self.handlers
            .iter()
            .any(|m| paddr >= m.base && paddr - m.base < m.size)
    }

    /// Returns the linear backing store (fast path, code fetch, host-fault
    /// classification).
    pub fn base(&self) -> &LinearMemory {
        &self.base
    }

    /// Installed RDRAM size in bytes.
    pub fn rdram_size(&self) -> usize {
        self.rdram_size
    }

    /// Loads instruction words into the linear window starting at `paddr`.
    ///
    /// Convenience for boot code injection and tests; equivalent to a series
    /// of full-mask word writes against the backing store.
    pub fn load_words(&mut self, paddr: u32, words: &[u32]) {
        for (i, word) in words.iter().enumerate() {
            let addr = (paddr + (i as u32) * 4) & PHYS_WORD_MASK;
            self.base.write_u32(addr, *word, 0xffff_ffff);
        }
    }
}
