//! Physical and Virtual Address types.
//!
//! This module defines strong types for guest addresses to prevent accidental
//! mixing of address spaces. It provides:
//! 1. **Type Safety:** Distinguishes virtual and physical addresses at compile time.
//! 2. **Segment Tests:** Detects the direct-mapped kseg0/kseg1 window.
//! 3. **Page Helpers:** Page base and offset extraction for invalidation.

use super::constants::{DIRECT_MAP_MASK, DIRECT_MAP_PATTERN, PAGE_BASE_MASK, PHYS_ADDR_MASK};

/// A 32-bit virtual address in the guest address space.
///
/// Virtual addresses are what guest instructions operate on. Addresses in the
/// kseg0/kseg1 window map directly onto physical memory; everything else must
/// go through the TLB before a physical access can happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct VirtAddr(pub u32);

/// A 32-bit physical address within the 512 MiB physical window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PhysAddr(pub u32);

impl VirtAddr {
    /// Creates a new virtual address from a raw 32-bit value.
    #[inline(always)]
    pub fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub fn val(&self) -> u32 {
        self.0
    }

    /// Returns `true` when the address lies in the direct-mapped window
    /// (kseg0 or kseg1), where translation is a fixed bit mask rather than
    /// a TLB probe.
    #[inline(always)]
    pub fn is_direct_mapped(&self) -> bool {
        (self.0 & DIRECT_MAP_MASK) == DIRECT_MAP_PATTERN
    }

    /// Translates a direct-mapped address to its physical image.
    ///
    /// Only meaningful when [`VirtAddr::is_direct_mapped`] holds; callers
    /// outside that window must probe the TLB instead.
    #[inline(always)]
    pub fn direct_phys(&self) -> PhysAddr {
        PhysAddr(self.0 & PHYS_ADDR_MASK)
    }

    /// Returns the page-aligned base of the address.
    pub fn page_base(&self) -> u32 {
        self.0 & PAGE_BASE_MASK
    }
}

impl PhysAddr {
    /// Creates a new physical address from a raw 32-bit value.
    #[inline(always)]
    pub fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub fn val(&self) -> u32 {
        self.0
    }

    /// Returns the page-aligned base of the address.
    pub fn page_base(&self) -> u32 {
        self.0 & PAGE_BASE_MASK
    }
}
