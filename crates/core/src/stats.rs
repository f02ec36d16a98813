//! Execution statistics collection.
//!
//! Lightweight counters updated on the hot paths of the core. They exist for
//! diagnostics and tests; nothing in the execution contract depends on them.

/// Counters accumulated over one or more runs.
#[derive(Debug, Default, Clone)]
pub struct CoreStats {
    /// Guest instructions retired across all engines.
    pub instructions_retired: u64,
    /// Code blocks translated or compiled.
    pub blocks_translated: u64,
    /// Code blocks removed by invalidation.
    pub blocks_invalidated: u64,
    /// Translation probes that found no TLB mapping.
    pub tlb_misses: u64,
}

impl CoreStats {
    /// Resets every counter to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
