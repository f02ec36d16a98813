//! # Configuration Tests
//!
//! Tests for configuration structures, deserialization, and defaults.

use r4300_core::config::{Config, GeneralConfig, SystemConfig};
use r4300_core::EmulationMode;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.general.emumode, EmulationMode::CachedInterpreter);
    assert_eq!(config.general.count_per_op, 2);
    assert!(!config.general.no_compiled_jump);
    assert!(!config.general.randomize_interrupt);
    assert_eq!(config.system.rdram_size, 8 * 1024 * 1024);
}

#[test]
fn test_general_config_defaults() {
    let general = GeneralConfig::default();
    assert_eq!(general.emumode, EmulationMode::CachedInterpreter);
    assert_eq!(general.count_per_op, 2);
}

#[test]
fn test_system_config_defaults() {
    let system = SystemConfig::default();
    assert_eq!(system.rdram_size, 8 * 1024 * 1024);
}

#[test]
fn test_json_deserialization_empty_object_yields_defaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.general.emumode, EmulationMode::CachedInterpreter);
    assert_eq!(config.system.rdram_size, 8 * 1024 * 1024);
}

#[test]
fn test_json_deserialization_full() {
    let json = r#"{
        "general": {
            "emumode": "Dynarec",
            "count_per_op": 1,
            "no_compiled_jump": true,
            "randomize_interrupt": true
        },
        "system": {
            "rdram_size": 4194304
        }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.general.emumode, EmulationMode::Dynarec);
    assert_eq!(config.general.count_per_op, 1);
    assert!(config.general.no_compiled_jump);
    assert!(config.general.randomize_interrupt);
    assert_eq!(config.system.rdram_size, 4 * 1024 * 1024);
}

#[test]
fn test_json_partial_section_keeps_other_defaults() {
    let json = r#"{ "general": { "emumode": "PureInterpreter" } }"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.general.emumode, EmulationMode::PureInterpreter);
    assert_eq!(config.general.count_per_op, 2);
    assert_eq!(config.system.rdram_size, 8 * 1024 * 1024);
}

#[test]
fn test_json_all_emulation_modes() {
    for (name, mode) in [
        ("PureInterpreter", EmulationMode::PureInterpreter),
        ("CachedInterpreter", EmulationMode::CachedInterpreter),
        ("Dynarec", EmulationMode::Dynarec),
    ] {
        let json = format!(r#"{{ "general": {{ "emumode": "{name}" }} }}"#);
        let config: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.general.emumode, mode);
    }
}

#[test]
fn test_json_unknown_emulation_mode_is_rejected() {
    let json = r#"{ "general": { "emumode": "Jit" } }"#;
    assert!(serde_json::from_str::<Config>(json).is_err());
}
