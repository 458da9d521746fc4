//! Unit tests for TOML configuration parsing.

use std::io::Write;

use sheet_transport::config::{load_config, parse_config, BackendKind, InterruptPolicy, PinAssignment};
use sheet_transport::error::{ConfigError, Error};
use sheet_transport::{MetersPerSecond, Millimeters};

/// Test that an empty document yields the simulated defaults.
#[test]
fn test_parse_empty_config() {
    let config = parse_config("").expect("empty config is valid");

    assert_eq!(config.backend, BackendKind::Simulated);
    assert_eq!(config.pins, PinAssignment::default());
    assert_eq!(config.motor.steps_per_revolution, 200);
    assert!(!config.motor.invert_direction);
    assert_eq!(config.motor.on_interrupt, InterruptPolicy::Propagate);
    assert!(config.transport.is_none());
}

/// Test parsing a physical configuration with a custom pin map.
#[test]
fn test_parse_physical_config() {
    let toml_str = r#"
backend = "physical"

[pins]
light = 40
step = 12
dir = 38
n_enable = 36
n_sleep = 33
n_reset = 35

[motor]
steps_per_revolution = 3200
invert_direction = true
"#;

    let config = parse_config(toml_str).expect("valid physical config");

    assert_eq!(config.backend, BackendKind::Physical);
    assert_eq!(config.pins.step, 12);
    assert_eq!(config.pins.light, 40);
    assert_eq!(config.motor.steps_per_revolution, 3200);
    assert!(config.motor.invert_direction);
}

/// Test that omitted pins keep their header defaults.
#[test]
fn test_partial_pin_table() {
    let config = parse_config("[pins]\nlight = 32\n").unwrap();

    assert_eq!(config.pins.light, 32);
    assert_eq!(config.pins.step, 37);
    assert_eq!(config.pins.n_reset, 35);
}

/// Test transport defaults for gear ratio and velocity.
#[test]
fn test_transport_defaults() {
    let config = parse_config("[transport]\nwheel_radius_mm = 25.0\n").unwrap();
    let transport = config.transport.expect("transport table present");

    assert_eq!(transport.wheel_radius_mm, Millimeters(25.0));
    assert_eq!(transport.gear_ratio, 1.0);
    assert_eq!(transport.velocity, MetersPerSecond(0.1));
}

/// Test that the transport table requires a wheel radius.
#[test]
fn test_transport_requires_radius() {
    let result = parse_config("[transport]\ngear_ratio = 6.0\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Test that an unknown interrupt policy is rejected.
#[test]
fn test_unknown_interrupt_policy() {
    let result = parse_config("[motor]\non_interrupt = \"ignore\"\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Test loading from a file on disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("sheet-transport-{}.toml", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[motor]\nsteps_per_revolution = 1600").unwrap();
    }

    let config = load_config(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.unwrap().motor.steps_per_revolution, 1600);
}

/// Test that a missing file is an I/O error.
#[test]
fn test_load_missing_file() {
    let result = load_config("/nonexistent/sheet-transport.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
}
