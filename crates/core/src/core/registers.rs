//! Register file with engine-dependent storage layout.
//!
//! The canonical CPU state lives in one of two mutually exclusive layouts:
//! the standard layout used by the interpreters, or the recompiler hot-state
//! block that generated code addresses directly. The layout is selected once
//! at initialization from the emulation mode; every accessor resolves through
//! a single variant dispatch rather than scattered conditionals.
//!
//! Register 0 is hard-wired to zero: `set_reg` ignores writes to it, and
//! power-on zeroes the whole file, so it is never persisted nonzero.

use crate::engine::EmulationMode;

/// Program counter representation.
///
/// The raw-address form is what external callers see; the node form is the
/// cached interpreter's pointer into a translated block. The node carries its
/// own address, keeping the two representations convertible at every
/// observation point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PcRepr {
    /// Plain virtual address.
    Raw(u32),
    /// Position inside a translated block.
    Node {
        /// Page-aligned virtual start of the owning block.
        page: u32,
        /// Node index within the block.
        index: usize,
        /// Virtual address of the node (always equals `page + 4 * index`).
        addr: u32,
    },
}

/// Standard register layout (interpreters).
#[derive(Debug)]
pub struct StandardState {
    /// General-purpose registers; index 0 is hard-wired zero.
    pub regs: [i64; 32],
    /// Multiply-high accumulator.
    pub hi: i64,
    /// Multiply-low accumulator.
    pub lo: i64,
    /// Load-linked bit.
    pub llbit: bool,
    /// Set while the next instruction occupies a branch delay slot.
    pub delay_slot: bool,
    /// Loop-termination request flag.
    pub stop: bool,
    /// Program counter.
    pub pc: PcRepr,
}

/// Recompiler hot-state layout.
///
/// Generated code addresses these fields directly, so redirection from
/// outside cannot take effect immediately: callers write `pcaddr` and raise
/// `pending_redirect`, which the dynarec loop honors at its next
/// synchronization point.
#[derive(Debug)]
pub struct HotState {
    /// General-purpose registers; index 0 is hard-wired zero.
    pub regs: [i64; 32],
    /// Multiply-high accumulator.
    pub hi: i64,
    /// Multiply-low accumulator.
    pub lo: i64,
    /// Load-linked bit.
    pub llbit: bool,
    /// Set while the next instruction occupies a branch delay slot.
    pub delay_slot: bool,
    /// Loop-termination request flag.
    pub stop: bool,
    /// Raw program counter.
    pub pcaddr: u32,
    /// Deferred-redirect flag checked at synchronization points.
    pub pending_redirect: bool,
}

/// The live register storage, selected once at initialization.
#[derive(Debug)]
pub enum Backing {
    /// Standard layout (pure and cached interpreters).
    Standard(StandardState),
    /// Recompiler hot-state layout.
    HotState(Box<HotState>),
}

impl Backing {
    /// Selects the layout for the given emulation mode.
    pub fn for_mode(mode: EmulationMode) -> Self {
        match mode {
            EmulationMode::Dynarec => Self::HotState(Box::new(HotState {
                regs: [0; 32],
                hi: 0,
                lo: 0,
                llbit: false,
                delay_slot: false,
                stop: false,
                pcaddr: 0,
                pending_redirect: false,
            })),
            _ => Self::Standard(StandardState {
                regs: [0; 32],
                hi: 0,
                lo: 0,
                llbit: false,
                delay_slot: false,
                stop: false,
                pc: PcRepr::Raw(0),
            }),
        }
    }

    /// Zeroes every field (power-on).
    pub fn poweron(&mut self) {
        match self {
            Self::Standard(s) => {
                s.regs = [0; 32];
                s.hi = 0;
                s.lo = 0;
                s.llbit = false;
                s.delay_slot = false;
                s.stop = false;
                s.pc = PcRepr::Raw(0);
            }
            Self::HotState(h) => {
                h.regs = [0; 32];
                h.hi = 0;
                h.lo = 0;
                h.llbit = false;
                h.delay_slot = false;
                h.stop = false;
                h.pcaddr = 0;
                h.pending_redirect = false;
            }
        }
    }

    /// Read access to the general-purpose registers.
    #[inline(always)]
    pub fn regs(&self) -> &[i64; 32] {
        match self {
            Self::Standard(s) => &s.regs,
            Self::HotState(h) => &h.regs,
        }
    }

    /// Mutable access to the general-purpose registers.
    ///
    /// Bulk accessor; prefer [`Backing::set_reg`] for single writes so the
    /// register-0 convention is preserved.
    #[inline(always)]
    pub fn regs_mut(&mut self) -> &mut [i64; 32] {
        match self {
            Self::Standard(s) => &mut s.regs,
            Self::HotState(h) => &mut h.regs,
        }
    }

    /// Writes a general-purpose register; writes to register 0 are ignored.
    #[inline(always)]
    pub fn set_reg(&mut self, idx: usize, val: i64) {
        if idx != 0 {
            self.regs_mut()[idx] = val;
        }
    }

    /// Multiply-high accumulator.
    #[inline(always)]
    pub fn mult_hi(&self) -> i64 {
        match self {
            Self::Standard(s) => s.hi,
            Self::HotState(h) => h.hi,
        }
    }

    /// Sets the multiply-high accumulator.
    #[inline(always)]
    pub fn set_mult_hi(&mut self, val: i64) {
        match self {
            Self::Standard(s) => s.hi = val,
            Self::HotState(h) => h.hi = val,
        }
    }

    /// Multiply-low accumulator.
    #[inline(always)]
    pub fn mult_lo(&self) -> i64 {
        match self {
            Self::Standard(s) => s.lo,
            Self::HotState(h) => h.lo,
        }
    }

    /// Sets the multiply-low accumulator.
    #[inline(always)]
    pub fn set_mult_lo(&mut self, val: i64) {
        match self {
            Self::Standard(s) => s.lo = val,
            Self::HotState(h) => h.lo = val,
        }
    }

    /// Load-linked bit.
    #[inline(always)]
    pub fn llbit(&self) -> bool {
        match self {
            Self::Standard(s) => s.llbit,
            Self::HotState(h) => h.llbit,
        }
    }

    /// Sets the load-linked bit.
    #[inline(always)]
    pub fn set_llbit(&mut self, val: bool) {
        match self {
            Self::Standard(s) => s.llbit = val,
            Self::HotState(h) => h.llbit = val,
        }
    }

    /// Delay-slot flag.
    ///
    /// While set, the instruction about to execute sits in the delay slot of
    /// an unresolved control transfer. The executor collaborator raises and
    /// clears it around branch resolution.
    #[inline(always)]
    pub fn delay_slot(&self) -> bool {
        match self {
            Self::Standard(s) => s.delay_slot,
            Self::HotState(h) => h.delay_slot,
        }
    }

    /// Sets the delay-slot flag.
    #[inline(always)]
    pub fn set_delay_slot(&mut self, val: bool) {
        match self {
            Self::Standard(s) => s.delay_slot = val,
            Self::HotState(h) => h.delay_slot = val,
        }
    }

    /// Loop-termination flag.
    #[inline(always)]
    pub fn stop(&self) -> bool {
        match self {
            Self::Standard(s) => s.stop,
            Self::HotState(h) => h.stop,
        }
    }

    /// Sets the loop-termination flag.
    #[inline(always)]
    pub fn set_stop(&mut self, val: bool) {
        match self {
            Self::Standard(s) => s.stop = val,
            Self::HotState(h) => h.stop = val,
        }
    }

    /// Program counter as a raw virtual address, whichever representation is
    /// live.
    #[inline(always)]
    pub fn pc_raw(&self) -> u32 {
        match self {
            Self::Standard(s) => match s.pc {
                PcRepr::Raw(a) => a,
                PcRepr::Node { addr, .. } => addr,
            },
            Self::HotState(h) => h.pcaddr,
        }
    }

    /// Program counter in node form, when the standard layout holds one.
    #[inline(always)]
    pub fn pc_node(&self) -> Option<(u32, usize, u32)> {
        match self {
            Self::Standard(s) => match s.pc {
                PcRepr::Node { page, index, addr } => Some((page, index, addr)),
                PcRepr::Raw(_) => None,
            },
            Self::HotState(_) => None,
        }
    }

    /// Sets the program counter as a raw address.
    #[inline(always)]
    pub fn set_pc_raw(&mut self, addr: u32) {
        match self {
            Self::Standard(s) => s.pc = PcRepr::Raw(addr),
            Self::HotState(h) => h.pcaddr = addr,
        }
    }

    /// Sets the program counter to a block node.
    ///
    /// The hot-state layout has no node representation; it records the raw
    /// address instead, keeping both forms consistent.
    #[inline(always)]
    pub fn set_pc_node(&mut self, page: u32, index: usize, addr: u32) {
        match self {
            Self::Standard(s) => s.pc = PcRepr::Node { page, index, addr },
            Self::HotState(h) => h.pcaddr = addr,
        }
    }

    /// Requests a redirect, deferred for the hot-state layout.
    pub fn raise_redirect(&mut self, addr: u32) {
        match self {
            Self::Standard(s) => s.pc = PcRepr::Raw(addr),
            Self::HotState(h) => {
                h.pcaddr = addr;
                h.pending_redirect = true;
            }
        }
    }

    /// Takes a pending deferred redirect, if one is raised.
    pub fn take_pending_redirect(&mut self) -> Option<u32> {
        match self {
            Self::HotState(h) if h.pending_redirect => {
                h.pending_redirect = false;
                Some(h.pcaddr)
            }
            _ => None,
        }
    }

    /// Returns `true` while a deferred redirect is raised but not yet
    /// honored.
    pub fn redirect_pending(&self) -> bool {
        matches!(self, Self::HotState(h) if h.pending_redirect)
    }
}
