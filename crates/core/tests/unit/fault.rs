//! # Host Fault Classification Tests
//!
//! The core decides whether a host access violation names guest memory and
//! answers with a disposition the platform trap acts on.

use crate::common::harness::TestContext;
use crate::common::mocks::iset::MockOp;
use r4300_core::fault::HostFaultCapability;
use r4300_core::{EmulationMode, FaultDisposition, BOOT_VECTOR};

#[test]
fn fault_inside_the_guest_window_resumes() {
    let mut ctx = TestContext::new(EmulationMode::CachedInterpreter, &[]);
    let base = ctx.core.cpu().mem.base().host_base();

    assert_eq!(
        ctx.core.handle_host_fault(base + 0x1000),
        FaultDisposition::Resume
    );
    assert_eq!(ctx.core.handle_host_fault(base), FaultDisposition::Resume);
}

#[test]
fn fault_outside_the_guest_window_reraises() {
    let mut ctx = TestContext::new(EmulationMode::CachedInterpreter, &[]);
    let base = ctx.core.cpu().mem.base().host_base();
    let len = ctx.core.cpu().mem.base().len_bytes();

    assert_eq!(
        ctx.core.handle_host_fault(base + len),
        FaultDisposition::Reraise
    );
    assert_eq!(
        ctx.core.handle_host_fault(base.wrapping_sub(0x10)),
        FaultDisposition::Reraise
    );
}

/// The trap is armed exactly for the duration of a run.
#[test]
fn capability_is_installed_around_the_run_loop() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct RecordingCap {
        installs: Arc<AtomicUsize>,
        removes: Arc<AtomicUsize>,
    }

    impl HostFaultCapability for RecordingCap {
        fn install(&mut self) {
            self.installs.fetch_add(1, Ordering::SeqCst);
        }

        fn remove(&mut self) {
            self.removes.fetch_add(1, Ordering::SeqCst);
        }
    }

    let installs = Arc::new(AtomicUsize::new(0));
    let removes = Arc::new(AtomicUsize::new(0));

    let mut ctx = TestContext::new(
        EmulationMode::CachedInterpreter,
        &[(BOOT_VECTOR, MockOp::Stop)],
    );
    ctx.core.set_fault_capability(Box::new(RecordingCap {
        installs: Arc::clone(&installs),
        removes: Arc::clone(&removes),
    }));

    ctx.core.run();
    assert_eq!(installs.load(Ordering::SeqCst), 1);
    assert_eq!(removes.load(Ordering::SeqCst), 1);

    ctx.core.run();
    assert_eq!(installs.load(Ordering::SeqCst), 2);
    assert_eq!(removes.load(Ordering::SeqCst), 2);
}
