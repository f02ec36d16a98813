//! # Cold Start Tests
//!
//! All three engines must enter at the boot vector when the program counter
//! still holds its power-on zero, and must account retirement identically.

use crate::common::harness::TestContext;
use crate::common::mocks::iset::MockOp;
use r4300_core::core::cop0::CP0_COUNT;
use r4300_core::{EmulationMode, BOOT_VECTOR};

#[test]
fn every_engine_enters_at_the_boot_vector() {
    for mode in [
        EmulationMode::PureInterpreter,
        EmulationMode::CachedInterpreter,
        EmulationMode::Dynarec,
    ] {
        let mut ctx = TestContext::new(mode, &[(BOOT_VECTOR, MockOp::Stop)]);
        ctx.core.run();
        assert_eq!(ctx.trace(), vec![BOOT_VECTOR], "mode {mode:?}");
    }
}

#[test]
fn sequential_execution_falls_through_word_by_word() {
    for mode in [
        EmulationMode::PureInterpreter,
        EmulationMode::CachedInterpreter,
        EmulationMode::Dynarec,
    ] {
        let mut ctx = TestContext::new(mode, &[(BOOT_VECTOR + 0x10, MockOp::Stop)]);
        ctx.core.run();
        let expected: Vec<u32> = (0..=4).map(|i| BOOT_VECTOR + i * 4).collect();
        assert_eq!(ctx.trace(), expected, "mode {mode:?}");
        assert_eq!(ctx.core.stats().instructions_retired, 5, "mode {mode:?}");
    }
}

/// Retirement drives the count register at the configured scale.
#[test]
fn count_register_advances_per_retired_instruction() {
    let mut ctx = TestContext::new(
        EmulationMode::CachedInterpreter,
        &[(BOOT_VECTOR + 0x8, MockOp::Stop)],
    );
    ctx.core.run();
    // Power-on image plus three instructions at two counts each.
    assert_eq!(ctx.core.cpu().cp0.reg(CP0_COUNT), 0x5000 + 6);
}

/// A redirect before the run replaces the boot entry entirely.
#[test]
fn explicit_entry_point_overrides_the_boot_vector() {
    let mut ctx = TestContext::new(
        EmulationMode::CachedInterpreter,
        &[(0x8000_0200, MockOp::Stop)],
    );
    ctx.core.jump_to(0x8000_0200);
    ctx.core.run();
    assert_eq!(ctx.trace(), vec![0x8000_0200]);
}

/// Translation happens once per page for block engines.
#[test]
fn block_engines_translate_each_page_once() {
    let mut ctx = TestContext::new(
        EmulationMode::CachedInterpreter,
        &[(BOOT_VECTOR + 0x20, MockOp::Stop)],
    );
    ctx.core.run();
    assert_eq!(ctx.core.stats().blocks_translated, 1);
}

/// The pure interpreter never builds blocks.
#[test]
fn pure_interpreter_translates_nothing() {
    let mut ctx = TestContext::new(
        EmulationMode::PureInterpreter,
        &[(BOOT_VECTOR + 0x20, MockOp::Stop)],
    );
    ctx.core.run();
    assert_eq!(ctx.core.stats().blocks_translated, 0);
}
