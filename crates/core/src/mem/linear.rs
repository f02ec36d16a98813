//! Physical window backing store.
//!
//! This module provides a safe wrapper around the raw host allocation that
//! backs the guest's 512 MiB physical address space. On Unix it uses an
//! anonymous `mmap`, so the window is reserved lazily: pages are only
//! materialized by the OS when touched, which keeps a mostly-empty physical
//! space cheap. The base pointer is exposed for the fast access path and for
//! classifying host access-violation addresses.

use crate::common::constants::PHYS_WORD_MASK;

/// A raw word-granular memory buffer spanning the guest physical window.
///
/// Storage is an array of host-order `u32` words indexed by physical word
/// address, matching how the memory gateway performs all accesses (aligned
/// words with per-byte-lane masks). Sub-word ordering inside a word is the
/// executor collaborator's concern.
pub struct LinearMemory {
    ptr: *mut u32,
    size_bytes: usize,
    is_mmap: bool,
}

// SAFETY: the buffer is plain memory with no interior pointers; all shared
// use is serialized by the single-threaded execution model (see the fault
// handler notes in `sim`).
unsafe impl Send for LinearMemory {}
unsafe impl Sync for LinearMemory {}

impl LinearMemory {
    /// Creates a new backing store of the given size in bytes.
    ///
    /// On Unix, uses `mmap` for lazy allocation; elsewhere, allocates a
    /// zeroed `Vec`. Panics if the host refuses the mapping, since the core
    /// cannot operate without its physical window.
    pub fn new(size_bytes: usize) -> Self {
        #[cfg(unix)]
        {
            use std::ptr;
            // SAFETY: anonymous private mapping with no address hint; the
            // result is checked against MAP_FAILED before use.
            let ptr = unsafe {
                libc::mmap(
                    ptr::null_mut(),
                    size_bytes,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                    -1,
                    0,
                )
            };

            if ptr == libc::MAP_FAILED {
                panic!("failed to mmap physical window of size {}", size_bytes);
            }

            Self {
                ptr: ptr as *mut u32,
                size_bytes,
                is_mmap: true,
            }
        }

        #[cfg(not(unix))]
        {
            let mut vec = vec![0u32; size_bytes / 4];
            let ptr = vec.as_mut_ptr();
            std::mem::forget(vec);
            Self {
                ptr,
                size_bytes,
                is_mmap: false,
            }
        }
    }

    /// Returns the size of the window in bytes.
    pub fn len_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Returns a raw pointer to the word containing `paddr`.
    ///
    /// `paddr` must already be masked into the physical window (the gateway
    /// applies [`PHYS_WORD_MASK`] before calling). The pointer stays valid
    /// for the lifetime of the buffer.
    #[inline(always)]
    pub fn word_ptr(&self, paddr: u32) -> *mut u32 {
        debug_assert!((paddr as usize) < self.size_bytes);
        debug_assert_eq!(paddr & !PHYS_WORD_MASK, 0);
        // SAFETY: paddr is word-aligned and inside the mapped window.
        unsafe { self.ptr.add((paddr >> 2) as usize) }
    }

    /// Reads the aligned word at `paddr`.
    #[inline(always)]
    pub fn read_u32(&self, paddr: u32) -> u32 {
        // SAFETY: see word_ptr; reads within the mapped window are always
        // valid (the OS zero-fills untouched pages).
        unsafe { self.word_ptr(paddr).read() }
    }

    /// Writes the aligned word at `paddr`, changing only the bits selected
    /// by `mask`.
    #[inline(always)]
    pub fn write_u32(&self, paddr: u32, value: u32, mask: u32) {
        let ptr = self.word_ptr(paddr);
        // SAFETY: see word_ptr.
        unsafe {
            let old = ptr.read();
            ptr.write((old & !mask) | (value & mask));
        }
    }

    /// Maps a host pointer back into the physical window.
    ///
    /// Returns the physical offset when `host_addr` falls inside this
    /// buffer's mapping, `None` otherwise. Used to decide whether a host
    /// access violation names guest memory at all.
    pub fn host_offset(&self, host_addr: usize) -> Option<u32> {
        let base = self.ptr as usize;
        if host_addr >= base && host_addr < base + self.size_bytes {
            Some((host_addr - base) as u32)
        } else {
            None
        }
    }

    /// Returns the host base address of the mapping.
    pub fn host_base(&self) -> usize {
        self.ptr as usize
    }
}

impl Drop for LinearMemory {
    fn drop(&mut self) {
        if self.is_mmap {
            #[cfg(unix)]
            // SAFETY: the pointer and length are exactly what mmap returned.
            unsafe {
                libc::munmap(self.ptr as *mut _, self.size_bytes);
            }
        } else {
            #[cfg(not(unix))]
            // SAFETY: reconstructs the Vec forgotten in new() to free it.
            unsafe {
                let _ = Vec::from_raw_parts(self.ptr, self.size_bytes / 4, self.size_bytes / 4);
            }
        }
    }
}
