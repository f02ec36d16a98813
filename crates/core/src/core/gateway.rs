//! Memory access gateway.
//!
//! Every guest access funnels through here. The gateway decides, per virtual
//! address, between three paths:
//! 1. **Direct window:** Addresses whose top two bits match the direct-mapped
//!    pattern bypass translation; the physical address is the low 29 bits,
//!    masked to word granularity.
//! 2. **Handler dispatch:** Translated addresses claimed by a registered
//!    peripheral go to that peripheral.
//! 3. **Mapped space:** Everything else requires page translation, which is
//!    an external collaborator's concern; the gateway surfaces it as an
//!    access fault for the caller to deliver.
//!
//! Doubleword accesses are composed from two word accesses, most-significant
//! word first. An unaligned doubleword address is diagnosed but still
//! serviced at the enclosing aligned addresses, matching guest software that
//! relies on the lenient behavior.
//!
//! The store path is also where write-to-code detection happens: a write
//! whose target page is marked in the code page map queues an invalidation
//! request before the write completes, so no stale translation can be
//! dispatched afterwards.

use crate::common::constants::PHYS_WORD_MASK;
use crate::common::{AccessFault, AccessKind, VirtAddr};
use crate::core::Cpu;

impl Cpu {
    /// Translates a virtual address for the given access kind.
    ///
    /// Only the direct-mapped window resolves here; mapped space reports a
    /// TLB miss for the exception path to handle.
    #[inline(always)]
    fn translate(&mut self, vaddr: VirtAddr, kind: AccessKind) -> Result<u32, AccessFault> {
        if vaddr.is_direct_mapped() {
            Ok(vaddr.direct_phys().val())
        } else {
            self.stats.tlb_misses += 1;
            Err(AccessFault::TlbMiss {
                addr: vaddr.val(),
                kind,
            })
        }
    }

    /// Returns a raw pointer to the backing word for `vaddr`, when the
    /// address is directly mapped and not claimed by a peripheral.
    ///
    /// This is the fast path used by block translation: a `None` forces the
    /// caller back through the full dispatch, it is never an error by itself.
    pub fn fast_access(&mut self, vaddr: VirtAddr) -> Option<*mut u32> {
        if !vaddr.is_direct_mapped() {
            return None;
        }
        let paddr = vaddr.direct_phys().val();
        if self.mem.has_handler(paddr) {
            return None;
        }
        Some(self.mem.base().word_ptr(paddr & PHYS_WORD_MASK))
    }

    /// Fetches the instruction word at `vaddr`.
    pub fn fetch_word(&mut self, vaddr: VirtAddr) -> Result<u32, AccessFault> {
        let paddr = self.translate(vaddr, AccessKind::Fetch)?;
        Ok(self.mem.read_u32(paddr & PHYS_WORD_MASK))
    }

    /// Reads the word containing `vaddr`.
    pub fn read_word(&mut self, vaddr: VirtAddr) -> Result<u32, AccessFault> {
        let paddr = self.translate(vaddr, AccessKind::Read)?;
        Ok(self.mem.read_u32(paddr & PHYS_WORD_MASK))
    }

    /// Writes the word containing `vaddr`, changing only the bits selected
    /// by `mask`.
    ///
    /// If the target page holds translated code, an invalidation covering the
    /// write is queued before the write lands.
    pub fn write_word(&mut self, vaddr: VirtAddr, value: u32, mask: u32) -> Result<(), AccessFault> {
        let paddr = self.translate(vaddr, AccessKind::Write)?;
        if self.code_map.is_marked(paddr) {
            self.pending_invalidations.push((vaddr.val(), 4));
        }
        self.mem.write_u32(paddr & PHYS_WORD_MASK, value, mask);
        Ok(())
    }

    /// Reads the doubleword at `vaddr` as two words, most-significant first.
    pub fn read_dword(&mut self, vaddr: VirtAddr) -> Result<u64, AccessFault> {
        if vaddr.val() & 0x7 != 0 {
            tracing::warn!("unaligned doubleword read at {:#010x}", vaddr.val());
        }
        let hi = self.read_word(vaddr)?;
        let lo = self.read_word(VirtAddr::new(vaddr.val().wrapping_add(4)))?;
        Ok(((hi as u64) << 32) | lo as u64)
    }

    /// Writes the doubleword at `vaddr` as two masked words, most-significant
    /// first. `mask` selects the bits to change, split per 32-bit lane.
    pub fn write_dword(&mut self, vaddr: VirtAddr, value: u64, mask: u64) -> Result<(), AccessFault> {
        if vaddr.val() & 0x7 != 0 {
            tracing::warn!("unaligned doubleword write at {:#010x}", vaddr.val());
        }
        self.write_word(vaddr, (value >> 32) as u32, (mask >> 32) as u32)?;
        self.write_word(
            VirtAddr::new(vaddr.val().wrapping_add(4)),
            value as u32,
            mask as u32,
        )
    }
}
