//! # Unit Tests
//!
//! This module organizes the fine-grained tests for the execution core's
//! building blocks, grouped to mirror the crate's module tree.

/// Tests for cached-code bookkeeping (block table, overlap predicate, code
/// page map).
pub mod cache;


/// Tests for configuration defaults and deserialization.
pub mod config;



/// Tests for host access-violation classification.
pub mod fault;


/// Tests for the top-level core handle (state capture, run lifecycle).
pub mod sim;
