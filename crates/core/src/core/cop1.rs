//! Floating-point coprocessor register state.
//!
//! Arithmetic is the executor collaborator's job; the core owns the storage
//! so state capture and restore cover the full architectural file. The
//! register file is held as raw 64-bit bit patterns because the FR mode bit
//! changes how the 32 logical registers alias onto it, and that aliasing is
//! an execution-time concern.

/// Floating-point register file and control registers.
#[derive(Debug)]
pub struct Cp1 {
    /// Raw register storage, bit patterns only.
    regs: [u64; 32],
    /// Implementation/revision register (read-only on hardware).
    fcr0: u32,
    /// Control/status register.
    fcr31: u32,
}

impl Cp1 {
    /// Creates the register file; call [`Cp1::poweron`] before use.
    pub fn new() -> Self {
        Self {
            regs: [0; 32],
            fcr0: 0,
            fcr31: 0,
        }
    }

    /// Resets the file to its hardware power-on state.
    pub fn poweron(&mut self) {
        self.regs = [0; 32];
        self.fcr0 = 0x511;
        self.fcr31 = 0;
    }

    /// Reads a register's raw bits.
    #[inline(always)]
    pub fn reg(&self, idx: usize) -> u64 {
        self.regs[idx]
    }

    /// Writes a register's raw bits.
    #[inline(always)]
    pub fn set_reg(&mut self, idx: usize, val: u64) {
        self.regs[idx] = val;
    }

    /// Direct access to the whole file (state capture).
    pub fn regs(&self) -> &[u64; 32] {
        &self.regs
    }

    /// Mutable access to the whole file (state restore).
    pub fn regs_mut(&mut self) -> &mut [u64; 32] {
        &mut self.regs
    }

    /// Implementation/revision register.
    pub fn fcr0(&self) -> u32 {
        self.fcr0
    }

    /// Control/status register.
    pub fn fcr31(&self) -> u32 {
        self.fcr31
    }

    /// Sets the control/status register.
    pub fn set_fcr31(&mut self, val: u32) {
        self.fcr31 = val;
    }
}

impl Default for Cp1 {
    fn default() -> Self {
        Self::new()
    }
}
