//! Execution core of a 64-bit MIPS R4300 CPU emulator.
//!
//! This crate owns the pieces of the emulated CPU that every other component
//! orbits around:
//! 1. **CPU State:** General-purpose and coprocessor registers, with the
//!    storage layout selected by the configured engine.
//! 2. **Memory Gateway:** The single funnel for guest reads, writes, and
//!    fetches, splitting traffic between the direct-mapped window, registered
//!    peripherals, and the mapped-space fault path.
//! 3. **Execution Engines:** A pure interpreter, a page-block cached
//!    interpreter, and a dynamic recompiler with a pluggable code generator,
//!    all behind one dispatch type.
//! 4. **Invalidation Contract:** Writes into pages holding translated code
//!    queue invalidations that the engines honor before dispatching again, so
//!    self-modifying guest code always executes its newest bytes.
//!
//! Instruction semantics, TLB translation, exception delivery, and interrupt
//! scheduling are collaborator seams ([`engine::InstructionSet`],
//! [`engine::dynarec::CodeGenerator`], [`fault::HostFaultCapability`]); the
//! core is the machinery those collaborators plug into.

/// Cached-code data structures and the invalidation predicate.
pub mod cache;

/// Shared address types, constants, and error definitions.
pub mod common;

/// Deserializable configuration.
pub mod config;

/// CPU state: registers, coprocessors, and the memory gateway.
pub mod core;

/// Execution engines and their dispatch.
pub mod engine;

/// Host access-violation recovery policy.
pub mod fault;

/// Physical memory map and backing store.
pub mod mem;

/// The top-level core handle.
pub mod sim;

/// Run counters.
pub mod stats;

pub use crate::common::{AccessFault, AccessKind, PhysAddr, VirtAddr, BOOT_VECTOR};
pub use crate::config::Config;
pub use crate::engine::{EmulationMode, InstructionSet, StepOutcome};
pub use crate::fault::FaultDisposition;
pub use crate::sim::{CoreState, R4300};
