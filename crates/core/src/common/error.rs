//! Memory access fault definitions.
//!
//! This module defines the error taxonomy of the memory access gateway. It
//! provides:
//! 1. **Access Classification:** Fetch, read, and write access kinds.
//! 2. **Fault Representation:** The typed sentinel returned when a virtual
//!    address has no translation.
//!
//! A translation failure is recovered locally: the gateway aborts the memory
//! operation and the caller lets the guest exception machinery (outside this
//! core) take over. Nothing here terminates execution.

use std::fmt;

use thiserror::Error;

/// The kind of memory access being translated.
///
/// The TLB probe distinguishes the three so the external exception machinery
/// can raise the architecturally correct fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessKind {
    /// Instruction fetch.
    Fetch,
    /// Data load.
    Read,
    /// Data store.
    Write,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessKind::Fetch => write!(f, "fetch"),
            AccessKind::Read => write!(f, "read"),
            AccessKind::Write => write!(f, "write"),
        }
    }
}

/// Faults raised by the memory access gateway.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AccessFault {
    /// The virtual address lies outside the direct-mapped window and the TLB
    /// holds no mapping for it.
    #[error("TLB miss on {kind} access at {addr:#010x}")]
    TlbMiss {
        /// The untranslatable virtual address.
        addr: u32,
        /// The kind of access that missed.
        kind: AccessKind,
    },
}
