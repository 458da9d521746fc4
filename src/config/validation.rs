//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::pins::{board_to_bcm, PinAssignment};
use super::{HardwareConfig, MotorConfig, TransportConfig};

/// Validate a hardware configuration.
///
/// Checks:
/// - Steps per revolution is positive
/// - Transport radius, gear ratio and velocity are positive
/// - Every pin is a GPIO header pin and no pin is used twice
pub fn validate_config(config: &HardwareConfig) -> Result<()> {
    validate_motor(&config.motor)?;

    if let Some(ref transport) = config.transport {
        validate_transport(transport)?;
    }

    validate_pins(&config.pins)?;

    Ok(())
}

fn validate_motor(config: &MotorConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            config.steps_per_revolution,
        )));
    }

    Ok(())
}

fn validate_transport(config: &TransportConfig) -> Result<()> {
    // NaN fails these comparisons too
    if !(config.wheel_radius_mm.0 > 0.0) {
        return Err(Error::Config(ConfigError::InvalidWheelRadius(
            config.wheel_radius_mm.0,
        )));
    }

    if !(config.gear_ratio > 0.0) {
        return Err(Error::Config(ConfigError::InvalidGearRatio(config.gear_ratio)));
    }

    if !(config.velocity.0 > 0.0) {
        return Err(Error::Config(ConfigError::InvalidVelocity(config.velocity.0)));
    }

    Ok(())
}

fn validate_pins(pins: &PinAssignment) -> Result<()> {
    let lines = pins.lines();

    for (i, &(line, pin)) in lines.iter().enumerate() {
        if board_to_bcm(pin).is_none() {
            return Err(Error::Config(ConfigError::InvalidPin { line, pin }));
        }

        if lines[..i].iter().any(|&(_, other)| other == pin) {
            return Err(Error::Config(ConfigError::DuplicatePin(pin)));
        }
    }

    Ok(())
}
