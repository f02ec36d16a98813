//! Global System Constants.
//!
//! This module defines the fixed address-space geometry of the emulated
//! machine. It includes:
//! 1. **Segment Constants:** The direct-mapped window test pattern and the
//!    cached/uncached virtual aliases of physical memory.
//! 2. **Physical Window:** Size and masks of the decoded physical space.
//! 3. **Paging Constants:** Page size and masks used by code invalidation.

/// Virtual address of the boot vector every block-cached engine jumps to at
/// run start (start of SP DMEM plus the IPL3 entry offset).
pub const BOOT_VECTOR: u32 = 0xa400_0040;

/// Mask selecting the top two virtual address bits.
pub const DIRECT_MAP_MASK: u32 = 0xc000_0000;

/// Top-two-bit pattern identifying the direct-mapped kseg0/kseg1 window.
///
/// Addresses matching `addr & DIRECT_MAP_MASK == DIRECT_MAP_PATTERN` bypass
/// the TLB entirely; everything else requires a translation probe.
pub const DIRECT_MAP_PATTERN: u32 = 0x8000_0000;

/// Base of the cached direct-mapped alias (kseg0).
pub const KSEG0_BASE: u32 = 0x8000_0000;

/// Base of the uncached direct-mapped alias (kseg1).
pub const KSEG1_BASE: u32 = 0xa000_0000;

/// Size of the decoded physical address space (512 MiB).
///
/// The hardware decodes only the low 29 address bits; the host-side backing
/// store for guest memory spans exactly this window.
pub const PHYS_WINDOW_SIZE: usize = 0x2000_0000;

/// Mask clearing the virtual segment bits of a direct-mapped address.
pub const PHYS_ADDR_MASK: u32 = 0x1fff_ffff;

/// Mask applied to every address before handler dispatch: clears the bits
/// outside the physical window and the two sub-word bits in one step.
pub const PHYS_WORD_MASK: u32 = 0x1fff_fffc;

/// Guest page size in bytes.
pub const PAGE_SIZE: u32 = 0x1000;

/// Mask extracting the page-aligned base of an address.
pub const PAGE_BASE_MASK: u32 = !(PAGE_SIZE - 1);

/// Number of instruction words covered by one guest page.
pub const PAGE_WORDS: usize = (PAGE_SIZE / 4) as usize;
