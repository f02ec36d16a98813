//! Cached-code bookkeeping.
//!
//! This module owns the data structures behind cached-block execution and its
//! invalidation contract. It provides:
//! 1. **Decoded Nodes:** The unit the external decoder produces per word.
//! 2. **Block Table:** Page-keyed table of translated blocks with
//!    intersection-based removal.
//! 3. **Code Page Map:** A per-physical-page bitmap consulted by the store
//!    path to detect writes into previously translated code.
//!
//! The invariant throughout: a block is removed before any write touching its
//! source bytes completes, so the next fetch of that range re-translates from
//! current memory contents.

use std::collections::HashMap;

use crate::common::constants::{PAGE_BASE_MASK, PAGE_SIZE};
use crate::common::VirtAddr;

/// One decoded instruction node.
///
/// Decoding beyond capturing the word is the executor collaborator's job;
/// the core only needs the address for PC bookkeeping and the raw word to
/// hand back at execution time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedInstr {
    /// Virtual address this node was fetched from.
    pub addr: u32,
    /// Raw instruction word.
    pub word: u32,
}

/// A translated block covering one guest page.
#[derive(Clone, Debug)]
pub struct CodeBlock {
    /// Virtual address of the first instruction (page-aligned).
    pub start: u32,
    /// Virtual address one past the last instruction.
    pub end: u32,
    /// Physical address the source bytes were fetched from.
    pub phys_start: u32,
    /// Decoded nodes, one per word of the page.
    pub instrs: Vec<DecodedInstr>,
}

impl CodeBlock {
    /// Returns the node index for `vaddr`, if it falls inside the block.
    pub fn index_of(&self, vaddr: u32) -> Option<usize> {
        if vaddr >= self.start && vaddr < self.end {
            Some(((vaddr - self.start) >> 2) as usize)
        } else {
            None
        }
    }
}

/// Tests whether a block's source range conflicts with an invalidation
/// request.
///
/// `size == 0` means "everything" (the full-range safety flush used by state
/// restore). Both ranges are normalized into physical space when they lie in
/// the direct-mapped window, so a write through one alias invalidates code
/// cached through the other. Ranges that cannot be normalized (TLB-mapped)
/// are compared in virtual space.
pub fn source_overlaps(block_start: u32, block_len: u32, addr: u32, size: u32) -> bool {
    if size == 0 {
        return true;
    }

    let norm = |a: u32| {
        let v = VirtAddr::new(a);
        if v.is_direct_mapped() {
            (v.direct_phys().val(), true)
        } else {
            (a, false)
        }
    };

    let (bs, b_phys) = norm(block_start);
    let (ws, w_phys) = norm(addr);
    if b_phys != w_phys {
        // One side is TLB-mapped, the other physical: compare raw.
        return addr < block_start.wrapping_add(block_len) && block_start < addr.wrapping_add(size);
    }
    ws < bs.wrapping_add(block_len) && bs < ws.wrapping_add(size)
}

/// Page-keyed table of live translated blocks.
///
/// Keys are page-aligned virtual start addresses and every block spans
/// exactly one page, so no two live entries can claim overlapping ranges.
#[derive(Debug, Default)]
pub struct BlockCache {
    blocks: HashMap<u32, CodeBlock>,
}

impl BlockCache {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the block for a page-aligned virtual address.
    pub fn get(&self, page: u32) -> Option<&CodeBlock> {
        debug_assert_eq!(page & !PAGE_BASE_MASK, 0);
        self.blocks.get(&page)
    }

    /// Returns `true` if a block exists for the page.
    pub fn contains(&self, page: u32) -> bool {
        self.blocks.contains_key(&page)
    }

    /// Inserts a block, replacing any previous translation of the page.
    pub fn insert(&mut self, block: CodeBlock) {
        debug_assert_eq!(block.start & !PAGE_BASE_MASK, 0);
        self.blocks.insert(block.start, block);
    }

    /// Removes every block whose source range intersects
    /// `[addr, addr + size)`; `size == 0` removes everything.
    ///
    /// Returns the number of blocks removed. Removal happens before the
    /// conflicting write is observed by any later fetch.
    pub fn invalidate(&mut self, addr: u32, size: u32) -> u64 {
        if size == 0 {
            let removed = self.blocks.len() as u64;
            self.blocks.clear();
            return removed;
        }
        let before = self.blocks.len();
        self.blocks
            .retain(|_, b| !source_overlaps(b.start, PAGE_SIZE, addr, size));
        (before - self.blocks.len()) as u64
    }

    /// Drops the whole table (end-of-run teardown).
    pub fn free(&mut self) {
        self.blocks.clear();
    }

    /// Number of live blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` when no blocks are live.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Per-physical-page "contains translated code" bitmap.
///
/// Engines set bits when translating a block; the gateway's store path
/// consults the bitmap to decide whether a write needs to queue an
/// invalidation. Bits are only cleared in bulk: a stale set bit merely costs
/// a no-op invalidation, while a stale clear bit would lose the conflict.
#[derive(Debug)]
pub struct CodePageMap {
    pages: Vec<bool>,
}

impl CodePageMap {
    /// Creates a map covering `window_bytes` of physical space.
    pub fn new(window_bytes: usize) -> Self {
        Self {
            pages: vec![false; window_bytes / PAGE_SIZE as usize],
        }
    }

    #[inline(always)]
    fn index(paddr: u32) -> usize {
        (paddr >> 12) as usize
    }

    /// Marks every page covering `[paddr, paddr + bytes)`.
    pub fn mark_range(&mut self, paddr: u32, bytes: u32) {
        let first = Self::index(paddr);
        let last = Self::index(paddr + bytes.saturating_sub(1));
        for page in first..=last.min(self.pages.len() - 1) {
            self.pages[page] = true;
        }
    }

    /// Returns `true` if the page containing `paddr` holds translated code.
    #[inline(always)]
    pub fn is_marked(&self, paddr: u32) -> bool {
        self.pages
            .get(Self::index(paddr))
            .copied()
            .unwrap_or(false)
    }

    /// Clears the whole map (full flush or engine teardown).
    pub fn clear_all(&mut self) {
        self.pages.fill(false);
    }
}
