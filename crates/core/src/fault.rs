//! Host access-violation recovery.
//!
//! Recompiled code may write guest memory through the raw backing pointer
//! after the host has write-protected a page that holds translated code. The
//! platform layer owns the actual trap (signal handler, vectored exception
//! handler); the core owns the policy: decide whether a faulting host address
//! names guest memory and, if so, throw away the translations for that page
//! so the write can be replayed safely.

/// What the platform trap should do after the core has examined a fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultDisposition {
    /// The fault named guest memory and has been handled; re-execute the
    /// faulting access.
    Resume,
    /// The fault is not ours; let the host's default handling proceed.
    Reraise,
}

/// Platform hook that traps host access violations during a run.
///
/// Installed when the run loop starts and removed when it returns, so faults
/// outside guest execution never reach the core's handler.
pub trait HostFaultCapability: Send {
    /// Arms the platform trap.
    fn install(&mut self);

    /// Disarms the platform trap.
    fn remove(&mut self);
}
