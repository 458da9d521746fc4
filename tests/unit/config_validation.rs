//! Unit tests for configuration validation.

use sheet_transport::config::{validate_config, HardwareConfig, PinAssignment, TransportConfig};
use sheet_transport::error::{ConfigError, Error};
use sheet_transport::{BackendKind, MetersPerSecond, Millimeters};

fn transport(radius_mm: f64, gear_ratio: f64, velocity: f64) -> HardwareConfig {
    HardwareConfig {
        transport: Some(TransportConfig {
            wheel_radius_mm: Millimeters(radius_mm),
            gear_ratio,
            velocity: MetersPerSecond(velocity),
        }),
        ..HardwareConfig::default()
    }
}

/// Test that the reference configuration validates for both backends.
#[test]
fn test_reference_config_is_valid() {
    assert!(validate_config(&HardwareConfig::reference(BackendKind::Simulated)).is_ok());
    assert!(validate_config(&HardwareConfig::reference(BackendKind::Physical)).is_ok());
}

/// Test that zero steps per revolution is rejected.
#[test]
fn test_zero_steps_per_revolution() {
    let mut config = HardwareConfig::default();
    config.motor.steps_per_revolution = 0;

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)))
    ));
}

/// Test that transport parameters must be positive.
#[test]
fn test_transport_must_be_positive() {
    assert!(matches!(
        validate_config(&transport(0.0, 6.0, 0.04)),
        Err(Error::Config(ConfigError::InvalidWheelRadius(_)))
    ));
    assert!(matches!(
        validate_config(&transport(30.0, -1.0, 0.04)),
        Err(Error::Config(ConfigError::InvalidGearRatio(_)))
    ));
    assert!(matches!(
        validate_config(&transport(30.0, 6.0, 0.0)),
        Err(Error::Config(ConfigError::InvalidVelocity(_)))
    ));
}

/// Test that NaN parameters do not slip through.
#[test]
fn test_nan_rejected() {
    assert!(validate_config(&transport(f64::NAN, 6.0, 0.04)).is_err());
    assert!(validate_config(&transport(30.0, f64::NAN, 0.04)).is_err());
    assert!(validate_config(&transport(30.0, 6.0, f64::NAN)).is_err());
}

/// Test that power and ground pins cannot be assigned.
#[test]
fn test_non_gpio_pin_rejected() {
    let config = HardwareConfig {
        pins: PinAssignment {
            n_reset: 39,
            ..PinAssignment::default()
        },
        ..HardwareConfig::default()
    };

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidPin { line: "n_reset", pin: 39 }))
    ));
}

/// Test that two lines cannot share a pin.
#[test]
fn test_duplicate_pin_rejected() {
    let config = HardwareConfig {
        pins: PinAssignment {
            dir: 40,
            ..PinAssignment::default()
        },
        ..HardwareConfig::default()
    };

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::DuplicatePin(40)))
    ));
}
