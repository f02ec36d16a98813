//! Configuration system for the execution core.
//!
//! This module defines the configuration structures used to parameterize the
//! core at initialization. It provides:
//! 1. **Defaults:** Baseline constants (timing divider, RDRAM size).
//! 2. **Structures:** Hierarchical config for general and system sections.
//!
//! Configuration is supplied by the embedding emulator, either programmatically
//! through `Config::default()` or deserialized from JSON.

use serde::Deserialize;

use crate::engine::EmulationMode;

/// Default configuration constants for the execution core.
mod defaults {
    /// Count register increment per retired instruction.
    ///
    /// The hardware Count register ticks at half the pipeline clock; two
    /// counts per operation is the timing most guest software calibrates
    /// against.
    pub const COUNT_PER_OP: u32 = 2;

    /// Installed RDRAM size in bytes (8 MiB, expansion pak fitted).
    pub const RDRAM_SIZE: usize = 8 * 1024 * 1024;
}

/// General execution parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Which execution engine drives the run. Immutable once `run` starts.
    pub emumode: EmulationMode,
    /// Count register increment applied per retired instruction.
    pub count_per_op: u32,
    /// Disables the compiled-jump optimization in generated code.
    ///
    /// The core itself never branches on this; it is forwarded to the code
    /// generator collaborator, which decides whether block exits may link
    /// directly to other compiled blocks.
    pub no_compiled_jump: bool,
    /// Randomizes interrupt timing for compatibility testing.
    pub randomize_interrupt: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            emumode: EmulationMode::default(),
            count_per_op: defaults::COUNT_PER_OP,
            no_compiled_jump: false,
            randomize_interrupt: false,
        }
    }
}

/// Physical memory parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Installed RDRAM size in bytes (4 MiB stock, 8 MiB with expansion).
    pub rdram_size: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            rdram_size: defaults::RDRAM_SIZE,
        }
    }
}

/// Root configuration type; use `Config::default()` or deserialize from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General execution parameters.
    pub general: GeneralConfig,
    /// Physical memory parameters.
    pub system: SystemConfig,
}
