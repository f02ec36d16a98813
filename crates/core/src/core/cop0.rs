//! System control coprocessor register state.
//!
//! The exception, TLB, and timing machinery that drives these registers lives
//! in external collaborators; the execution core owns the storage because the
//! count register advances as a side effect of instruction retirement, and
//! because state capture must include every architectural register.

/// Index of the `Index` register.
pub const CP0_INDEX: usize = 0;
/// Index of the `Random` register.
pub const CP0_RANDOM: usize = 1;
/// Index of the `Context` register.
pub const CP0_CONTEXT: usize = 4;
/// Index of the `BadVAddr` register.
pub const CP0_BADVADDR: usize = 8;
/// Index of the `Count` register.
pub const CP0_COUNT: usize = 9;
/// Index of the `Compare` register.
pub const CP0_COMPARE: usize = 11;
/// Index of the `Status` register.
pub const CP0_STATUS: usize = 12;
/// Index of the `Cause` register.
pub const CP0_CAUSE: usize = 13;
/// Index of the `EPC` register.
pub const CP0_EPC: usize = 14;
/// Index of the `PRevID` register.
pub const CP0_PREVID: usize = 15;
/// Index of the `Config` register.
pub const CP0_CONFIG: usize = 16;
/// Index of the `ErrorEPC` register.
pub const CP0_ERROREPC: usize = 30;

/// System control coprocessor register file.
#[derive(Debug)]
pub struct Cp0 {
    regs: [u32; 32],
    /// Count increment applied per retired instruction.
    count_per_op: u32,
}

impl Cp0 {
    /// Creates the register file; call [`Cp0::poweron`] before use.
    pub fn new(count_per_op: u32) -> Self {
        Self {
            regs: [0; 32],
            count_per_op,
        }
    }

    /// Resets every register to its hardware power-on value.
    pub fn poweron(&mut self) {
        self.regs = [0; 32];
        self.regs[CP0_RANDOM] = 31;
        self.regs[CP0_STATUS] = 0x3400_0000;
        self.regs[CP0_CONFIG] = 0x0006_e463;
        self.regs[CP0_PREVID] = 0x0000_0b00;
        self.regs[CP0_COUNT] = 0x5000;
        self.regs[CP0_CAUSE] = 0x5c;
        self.regs[CP0_CONTEXT] = 0x007f_fff0;
        self.regs[CP0_EPC] = 0xffff_ffff;
        self.regs[CP0_BADVADDR] = 0xffff_ffff;
        self.regs[CP0_ERROREPC] = 0xffff_ffff;
    }

    /// Reads a register by index.
    #[inline(always)]
    pub fn reg(&self, idx: usize) -> u32 {
        self.regs[idx]
    }

    /// Writes a register by index.
    #[inline(always)]
    pub fn set_reg(&mut self, idx: usize, val: u32) {
        self.regs[idx] = val;
    }

    /// Direct access to the whole file (state capture).
    pub fn regs(&self) -> &[u32; 32] {
        &self.regs
    }

    /// Mutable access to the whole file (state restore).
    pub fn regs_mut(&mut self) -> &mut [u32; 32] {
        &mut self.regs
    }

    /// Advances the count register for `retired` retired instructions.
    ///
    /// The scale factor is fixed at construction from configuration; timing
    /// collaborators compare the result against `Compare` externally.
    #[inline(always)]
    pub fn advance_count(&mut self, retired: u32) {
        self.regs[CP0_COUNT] = self.regs[CP0_COUNT].wrapping_add(retired.wrapping_mul(self.count_per_op));
    }

    /// The configured count increment per retired instruction.
    pub fn count_per_op(&self) -> u32 {
        self.count_per_op
    }
}
