//! Raspberry Pi GPIO lines through rppal.

use core::fmt;

use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin};
use rppal::gpio::{self, Gpio};

use crate::config::{board_to_bcm, HardwareConfig};
use crate::error::{ConfigError, HardwareError, Result};

use super::delay::StdDelay;
use super::physical::{DriverPins, PhysicalBackend};
use super::pulse::PulseTrain;

/// GPIO backend on a Raspberry Pi header.
pub type RpiBackend = PhysicalBackend<RpiLine, RpiLine, StdDelay>;

/// rppal failure on a line.
#[derive(Debug)]
pub struct RpiLineError(pub gpio::Error);

impl fmt::Display for RpiLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl digital::Error for RpiLineError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// One output line. The step line also drives software PWM.
pub struct RpiLine(gpio::OutputPin);

impl ErrorType for RpiLine {
    type Error = RpiLineError;
}

impl OutputPin for RpiLine {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.0.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.0.set_high();
        Ok(())
    }
}

impl PulseTrain for RpiLine {
    fn start_pulses(
        &mut self,
        frequency_hz: f64,
        duty_cycle: f64,
    ) -> core::result::Result<(), Self::Error> {
        self.0.set_pwm_frequency(frequency_hz, duty_cycle).map_err(RpiLineError)
    }

    fn stop_pulses(&mut self) -> core::result::Result<(), Self::Error> {
        self.0.clear_pwm().map_err(RpiLineError)
    }
}

fn claim(gpio: &Gpio, line: &'static str, board: u8, high: bool) -> Result<RpiLine> {
    let bcm = board_to_bcm(board).ok_or(ConfigError::InvalidPin { line, pin: board })?;
    let pin = gpio.get(bcm).map_err(|e| {
        tracing::error!(line, board, bcm, error = %e, "cannot claim GPIO line");
        HardwareError::unavailable(&format!("{} (pin {}): {}", line, board, e))
    })?;

    let output = if high {
        pin.into_output_high()
    } else {
        pin.into_output_low()
    };
    Ok(RpiLine(output))
}

/// Claim the configured header pins and build the backend.
///
/// # Errors
///
/// `HardwareError::Unavailable` if `/dev/gpiomem` cannot be opened (the user is
/// usually missing from the `gpio` group) or a pin is already in use.
pub(super) fn open(config: &HardwareConfig) -> Result<RpiBackend> {
    let gpio = Gpio::new().map_err(|e| {
        HardwareError::unavailable(&format!("{}; is the user in the gpio group?", e))
    })?;

    let pins = &config.pins;
    let driver_pins = DriverPins {
        light: claim(&gpio, "light", pins.light, false)?,
        n_enable: claim(&gpio, "n_enable", pins.n_enable, true)?,
        n_reset: claim(&gpio, "n_reset", pins.n_reset, true)?,
        n_sleep: claim(&gpio, "n_sleep", pins.n_sleep, false)?,
        dir: claim(&gpio, "dir", pins.dir, false)?,
        step: claim(&gpio, "step", pins.step, false)?,
    };

    PhysicalBackend::new(driver_pins, StdDelay, &config.motor)
}
