//! Memory handler trait for physically-mapped peripherals.
//!
//! This module defines the `MemHandler` trait implemented by every component
//! reachable through physical address dispatch. It provides:
//! 1. **Identification:** `name` for diagnostics.
//! 2. **Access:** Aligned word read and masked word write at handler-relative
//!    offsets. All wider and narrower guest accesses are composed from these
//!    by the memory gateway, so handlers only ever see 32-bit lanes.

/// Trait for memory-mapped peripherals attached to the physical address map.
///
/// Handlers receive offsets relative to their registered base. Writes carry a
/// byte-lane mask so partial-register stores compose without read-modify-write
/// logic in the caller.
pub trait MemHandler: Send {
    /// Returns a short name for this handler (e.g. `"MI"`).
    fn name(&self) -> &str;

    /// Reads the aligned word at the given handler-relative offset.
    fn read_u32(&mut self, offset: u32) -> u32;

    /// Writes the aligned word at the given offset, changing only the bits
    /// selected by `mask`.
    fn write_u32(&mut self, offset: u32, value: u32, mask: u32);
}

/// Physical base of the interrupt controller register block.
pub const MI_BASE: u32 = 0x0430_0000;

/// Size in bytes of the interrupt controller register block.
pub const MI_SIZE: u32 = 0x10;

/// Hardware version reported by the interrupt controller.
const MI_VERSION: u32 = 0x0202_0102;

/// Interrupt controller register file.
///
/// The interrupt controller proper is an external collaborator; this handler
/// holds just the register state the execution core must keep addressable so
/// guest reads and writes of the block behave. Interrupt delivery policy
/// lives outside the core.
#[derive(Debug, Default)]
pub struct MiRegs {
    init_mode: u32,
    intr: u32,
    intr_mask: u32,
}

impl MiRegs {
    /// Creates the register file in its power-on state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently asserted interrupt lines.
    pub fn intr(&self) -> u32 {
        self.intr
    }

    /// Currently enabled interrupt lines.
    pub fn intr_mask(&self) -> u32 {
        self.intr_mask
    }
}

impl MemHandler for MiRegs {
    fn name(&self) -> &str {
        "MI"
    }

    fn read_u32(&mut self, offset: u32) -> u32 {
        match offset & 0xc {
            0x0 => self.init_mode,
            0x4 => MI_VERSION,
            0x8 => self.intr,
            _ => self.intr_mask,
        }
    }

    fn write_u32(&mut self, offset: u32, value: u32, mask: u32) {
        let value = value & mask;
        match offset & 0xc {
            0x0 => self.init_mode = value,
            0x4 => {} // version register is read-only
            0x8 => {} // interrupt lines are driven by the devices themselves
            _ => self.intr_mask = value,
        }
    }
}
