//! # Core Handle Tests
//!
//! Tests for the top-level lifecycle: power-on, state capture and restore,
//! and the configuration surface the handle exposes.

use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;
use crate::common::mocks::iset::MockOp;
use r4300_core::core::cop0::{CP0_COUNT, CP0_STATUS};
use r4300_core::{Config, CoreState, EmulationMode, BOOT_VECTOR};

#[test]
fn poweron_restores_the_architectural_image() {
    let mut ctx = TestContext::new(
        EmulationMode::CachedInterpreter,
        &[
            (BOOT_VECTOR, MockOp::SetReg { idx: 4, value: 99 }),
            (BOOT_VECTOR + 4, MockOp::Stop),
        ],
    );
    ctx.core.run();
    assert_eq!(ctx.core.cpu().backing.regs()[4], 99);

    ctx.core.poweron();
    assert_eq!(ctx.core.cpu().backing.regs()[4], 0);
    assert_eq!(ctx.core.cpu().backing.pc_raw(), 0);
    assert_eq!(ctx.core.cpu().cp0.reg(CP0_COUNT), 0x5000);
    assert_eq!(ctx.core.cpu().cp1.fcr0(), 0x511);
}

/// Memory contents survive power-on; only registers reset.
#[test]
fn poweron_preserves_memory_contents() {
    let mut ctx = TestContext::new(EmulationMode::CachedInterpreter, &[]);
    ctx.core
        .cpu_mut()
        .mem
        .load_words(0x0010_0000, &[0xabcd_ef01]);

    ctx.core.poweron();
    assert_eq!(ctx.core.cpu_mut().mem.read_u32(0x0010_0000), 0xabcd_ef01);
}

#[test]
fn capture_and_restore_round_trip() {
    let mut ctx = TestContext::new(EmulationMode::CachedInterpreter, &[]);
    let cpu = ctx.core.cpu_mut();
    cpu.backing.set_reg(5, -42);
    cpu.backing.set_mult_hi(0x1111);
    cpu.backing.set_mult_lo(0x2222);
    cpu.backing.set_pc_raw(0x8000_0180);
    cpu.cp0.set_reg(CP0_STATUS, 0x2400_0000);
    cpu.cp1.set_reg(3, 0x3ff0_0000_0000_0000);
    cpu.cp1.set_fcr31(0x0100_0000);

    let state = ctx.core.capture_state();

    ctx.core.poweron();
    assert_eq!(ctx.core.cpu().backing.regs()[5], 0);

    ctx.core.restore_state(&state);
    let cpu = ctx.core.cpu();
    assert_eq!(cpu.backing.regs()[5], -42);
    assert_eq!(cpu.backing.mult_hi(), 0x1111);
    assert_eq!(cpu.backing.mult_lo(), 0x2222);
    assert_eq!(cpu.backing.pc_raw(), 0x8000_0180);
    assert_eq!(cpu.cp0.reg(CP0_STATUS), 0x2400_0000);
    assert_eq!(cpu.cp1.reg(3), 0x3ff0_0000_0000_0000);
    assert_eq!(cpu.cp1.fcr31(), 0x0100_0000);
}

/// A snapshot with a nonzero register 0 cannot corrupt the hard-wired zero.
#[test]
fn restore_keeps_register_zero_at_zero() {
    let mut ctx = TestContext::new(EmulationMode::CachedInterpreter, &[]);
    let mut state = ctx.core.capture_state();
    state.gpr[0] = 0x1234;

    ctx.core.restore_state(&state);
    assert_eq!(ctx.core.cpu().backing.regs()[0], 0);
}

/// Restore works identically into the hot-state layout.
#[test]
fn restore_into_the_recompiler_layout() {
    let mut ctx = TestContext::new(EmulationMode::Dynarec, &[]);
    let mut state = ctx.core.capture_state();
    state.gpr[7] = 1234;
    state.pc = 0x8000_4000;

    ctx.core.restore_state(&state);
    assert_eq!(ctx.core.cpu().backing.regs()[7], 1234);
    assert_eq!(ctx.core.cpu().backing.pc_raw(), 0x8000_4000);
    // The redirect goes through the deferred protocol.
    assert!(ctx.core.cpu().backing.redirect_pending());
}

#[test]
fn delay_slot_survives_capture_and_restore() {
    let mut ctx = TestContext::new(EmulationMode::CachedInterpreter, &[]);
    ctx.core.cpu_mut().backing.set_delay_slot(true);
    let state = ctx.core.capture_state();

    ctx.core.poweron();
    assert!(!ctx.core.cpu().backing.delay_slot());

    ctx.core.restore_state(&state);
    assert!(ctx.core.cpu().backing.delay_slot());
}

#[test]
fn state_dump_reports_the_register_surface() {
    let mut ctx = TestContext::new(EmulationMode::CachedInterpreter, &[]);
    ctx.core.cpu_mut().backing.set_pc_raw(0xa400_0040);
    ctx.core.cpu_mut().backing.set_reg(2, 0x55);

    let mut out = Vec::new();
    ctx.core.write_state(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("pc=0xa4000040"));
    assert!(text.contains("r02=0x0000000000000055"));
    assert!(text.contains("fcr0=0x00000511"));
}

#[test]
fn core_state_serializes_round_trip() {
    let mut ctx = TestContext::new(EmulationMode::CachedInterpreter, &[]);
    ctx.core.cpu_mut().backing.set_reg(9, 77);
    let state = ctx.core.capture_state();

    let json = serde_json::to_string(&state).unwrap();
    let back: CoreState = serde_json::from_str(&json).unwrap();
    assert_eq!(back.gpr, state.gpr);
    assert_eq!(back.cp0, state.cp0);
    assert_eq!(back.pc, state.pc);
}

#[test]
fn stop_request_halts_a_fresh_run_immediately() {
    let mut ctx = TestContext::new(
        EmulationMode::CachedInterpreter,
        &[(BOOT_VECTOR, MockOp::Stop)],
    );
    ctx.core.run();
    // Stop state does not leak into the next run.
    ctx.core.run();
    assert_eq!(ctx.trace().len(), 2);
}

#[test]
fn randomize_interrupt_flag_is_exposed() {
    let mut config = Config::default();
    config.general.randomize_interrupt = true;
    let ctx = TestContext::with_config(config, &[]);
    assert!(ctx.core.randomize_interrupt());

    let ctx = TestContext::new(EmulationMode::CachedInterpreter, &[]);
    assert!(!ctx.core.randomize_interrupt());
}

#[test]
fn cached_blocks_do_not_outlive_a_run() {
    let mut ctx = TestContext::new(
        EmulationMode::CachedInterpreter,
        &[(BOOT_VECTOR, MockOp::Stop)],
    );
    ctx.core.run();
    assert!(!ctx.core.has_cached_block(BOOT_VECTOR));
    assert_eq!(ctx.core.stats().blocks_translated, 1);
}
