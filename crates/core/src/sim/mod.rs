//! Top-level core handle.
//!
//! [`R4300`] ties the pieces together: the CPU state, the configured
//! execution engine, the executor collaborator, and the optional host-fault
//! trap. External callers (scheduler, debugger, state persistence) drive the
//! core exclusively through this handle so that every redirect and every
//! invalidation goes through the engine's bookkeeping.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::common::constants::{KSEG0_BASE, KSEG1_BASE, PAGE_BASE_MASK, PAGE_SIZE};
use crate::config::Config;
use crate::core::Cpu;
use crate::engine::dynarec::CodeGenerator;
use crate::engine::{EngineDispatch, InstructionSet};
use crate::fault::{FaultDisposition, HostFaultCapability};
use crate::stats::CoreStats;

/// Architectural state snapshot for persistence.
///
/// Covers every register the core owns; memory contents are persisted by the
/// surrounding system, which owns the full physical map.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CoreState {
    /// General-purpose registers.
    pub gpr: [i64; 32],
    /// Multiply-high accumulator.
    pub hi: i64,
    /// Multiply-low accumulator.
    pub lo: i64,
    /// Load-linked bit.
    pub llbit: bool,
    /// Delay-slot flag.
    pub delay_slot: bool,
    /// Program counter (raw virtual address).
    pub pc: u32,
    /// System control coprocessor registers.
    pub cp0: [u32; 32],
    /// Floating-point registers (raw bits).
    pub cp1: [u64; 32],
    /// Floating-point control/status register.
    pub fcr31: u32,
}

/// The execution core.
pub struct R4300 {
    cpu: Cpu,
    engine: EngineDispatch,
    iset: Box<dyn InstructionSet>,
    fault_capability: Option<Box<dyn HostFaultCapability>>,
    randomize_interrupt: bool,
}

impl R4300 {
    /// Builds a core from configuration and an executor.
    ///
    /// The engine and register layout are fixed here for the core's
    /// lifetime. Call [`R4300::poweron`] before the first run.
    pub fn new(config: &Config, iset: Box<dyn InstructionSet>) -> Self {
        Self {
            cpu: Cpu::new(config),
            engine: EngineDispatch::for_mode(
                config.general.emumode,
                config.general.no_compiled_jump,
            ),
            iset,
            fault_capability: None,
            randomize_interrupt: config.general.randomize_interrupt,
        }
    }

    /// Resets architectural state to power-on values and drops all cached
    /// translations. Memory contents are preserved.
    pub fn poweron(&mut self) {
        self.engine.free_blocks(&mut self.cpu);
        self.cpu.poweron();
    }

    /// Runs the engine until the stop flag is raised.
    ///
    /// The host-fault trap, when one is registered, is armed only for the
    /// duration of the loop. Cached translations are dropped on exit: blocks
    /// reference memory that external callers may rewrite between runs.
    pub fn run(&mut self) {
        self.cpu.backing.set_stop(false);
        if let Some(cap) = self.fault_capability.as_mut() {
            cap.install();
        }

        self.engine.run(&mut self.cpu, self.iset.as_mut());

        self.engine.free_blocks(&mut self.cpu);
        if let Some(cap) = self.fault_capability.as_mut() {
            cap.remove();
        }
    }

    /// Requests that the run loop stop after the current instruction.
    pub fn stop(&mut self) {
        self.cpu.backing.set_stop(true);
    }

    /// Redirects execution to `addr` through the engine.
    pub fn jump_to(&mut self, addr: u32) {
        self.engine.jump_to(&mut self.cpu, addr);
    }

    /// Invalidates cached translations whose source intersects
    /// `[addr, addr + size)`; `size == 0` invalidates everything.
    pub fn invalidate_cached_code(&mut self, addr: u32, size: u32) {
        self.engine.invalidate(&mut self.cpu, addr, size);
    }

    /// Redirects to a restored program counter.
    ///
    /// State restore rewrites memory wholesale behind the core's back, so
    /// every cached translation is suspect; the jump is paired with a full
    /// invalidation.
    pub fn restore_pc(&mut self, addr: u32) {
        self.jump_to(addr);
        self.invalidate_cached_code(0, 0);
    }

    /// Classifies and handles a host access violation at `host_addr`.
    ///
    /// When the address falls inside the guest physical window, the
    /// translations for the containing page are invalidated through both
    /// direct-map aliases and the faulting access can be replayed. Any other
    /// address is not ours.
    pub fn handle_host_fault(&mut self, host_addr: usize) -> FaultDisposition {
        let Some(offset) = self.cpu.mem.base().host_offset(host_addr) else {
            return FaultDisposition::Reraise;
        };
        let page = offset & PAGE_BASE_MASK;
        tracing::debug!("host fault in guest window, invalidating page {page:#010x}");
        self.invalidate_cached_code(KSEG0_BASE + page, PAGE_SIZE);
        self.invalidate_cached_code(KSEG1_BASE + page, PAGE_SIZE);
        FaultDisposition::Resume
    }

    /// Registers the platform host-fault trap.
    pub fn set_fault_capability(&mut self, cap: Box<dyn HostFaultCapability>) {
        self.fault_capability = Some(cap);
    }

    /// Installs a code generator; only meaningful for the recompiler engine.
    ///
    /// Returns `false` (and drops the generator) when another engine is
    /// configured.
    pub fn install_code_generator(&mut self, generator: Box<dyn CodeGenerator>) -> bool {
        match &mut self.engine {
            EngineDispatch::Dynarec(d) => {
                d.install_generator(generator);
                true
            }
            _ => {
                tracing::warn!("code generator ignored, engine is not the recompiler");
                false
            }
        }
    }

    /// Captures the architectural register state.
    pub fn capture_state(&self) -> CoreState {
        CoreState {
            gpr: *self.cpu.backing.regs(),
            hi: self.cpu.backing.mult_hi(),
            lo: self.cpu.backing.mult_lo(),
            llbit: self.cpu.backing.llbit(),
            delay_slot: self.cpu.backing.delay_slot(),
            pc: self.cpu.backing.pc_raw(),
            cp0: *self.cpu.cp0.regs(),
            cp1: *self.cpu.cp1.regs(),
            fcr31: self.cpu.cp1.fcr31(),
        }
    }

    /// Restores a previously captured register state.
    ///
    /// Ends with [`R4300::restore_pc`], so cached translations never survive
    /// a restore.
    pub fn restore_state(&mut self, state: &CoreState) {
        *self.cpu.backing.regs_mut() = state.gpr;
        // The bulk copy bypasses set_reg, so re-zero register 0 directly.
        self.cpu.backing.regs_mut()[0] = 0;
        self.cpu.backing.set_mult_hi(state.hi);
        self.cpu.backing.set_mult_lo(state.lo);
        self.cpu.backing.set_llbit(state.llbit);
        self.cpu.backing.set_delay_slot(state.delay_slot);
        *self.cpu.cp0.regs_mut() = state.cp0;
        *self.cpu.cp1.regs_mut() = state.cp1;
        self.cpu.cp1.set_fcr31(state.fcr31);
        self.restore_pc(state.pc);
    }

    /// Writes a human-readable dump of the register state to `w`.
    ///
    /// Debugger aid; the format is line-oriented and not stable.
    pub fn write_state<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let backing = &self.cpu.backing;
        writeln!(
            w,
            "pc={:#010x} delay_slot={} llbit={}",
            backing.pc_raw(),
            backing.delay_slot(),
            backing.llbit()
        )?;
        writeln!(w, "hi={:#018x} lo={:#018x}", backing.mult_hi(), backing.mult_lo())?;
        for (idx, reg) in backing.regs().iter().enumerate() {
            writeln!(w, "r{idx:02}={reg:#018x}")?;
        }
        for (idx, reg) in self.cpu.cp0.regs().iter().enumerate() {
            writeln!(w, "cp0[{idx:02}]={reg:#010x}")?;
        }
        writeln!(
            w,
            "fcr0={:#010x} fcr31={:#010x}",
            self.cpu.cp1.fcr0(),
            self.cpu.cp1.fcr31()
        )
    }

    /// Whether interrupt timing jitter was requested in configuration.
    ///
    /// The core stores the flag; the interrupt scheduler collaborator applies
    /// it.
    pub fn randomize_interrupt(&self) -> bool {
        self.randomize_interrupt
    }

    /// Run counters.
    pub fn stats(&self) -> &CoreStats {
        &self.cpu.stats
    }

    /// The CPU state.
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Mutable CPU state (boot code injection, register setup, tests).
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// Returns `true` when a cached translation exists for the page
    /// containing `addr`.
    pub fn has_cached_block(&self, addr: u32) -> bool {
        self.engine.has_block(addr)
    }
}
