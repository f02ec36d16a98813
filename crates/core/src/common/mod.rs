//! Common utilities and types used throughout the execution core.
//!
//! This module provides fundamental building blocks shared across all
//! components. It includes:
//! 1. **Address Types:** Strong types for virtual and physical addresses.
//! 2. **Constants:** Address-space geometry (segments, window, pages).
//! 3. **Error Handling:** The memory-gateway fault taxonomy.

/// Address type definitions (physical and virtual addresses).
pub mod addr;

/// Fixed address-space geometry constants.
pub mod constants;

/// Access kinds and gateway fault types.
pub mod error;

pub use addr::{PhysAddr, VirtAddr};
pub use constants::{BOOT_VECTOR, PAGE_SIZE, PHYS_WINDOW_SIZE};
pub use error::{AccessFault, AccessKind};
