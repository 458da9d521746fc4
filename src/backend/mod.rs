//! Hardware backends: the capability set the controller drives, plus simulated and
//! GPIO implementations.

use std::sync::Arc;

use crate::config::{validate_config, BackendKind, HardwareConfig};
use crate::error::Result;
use crate::motion::MotorPrimitive;

mod cancel;
mod delay;
mod physical;
mod pulse;
#[cfg(feature = "rpi")]
mod rpi;
mod simulated;

pub use cancel::CancelToken;
pub use delay::{StdDelay, Timer, HOLD_SLICE};
pub use physical::{DriverPins, DriverTiming, LineLevels, PhysicalBackend, SETTLE_TIME, WAKE_TIME};
pub use pulse::{PulseTrain, STEP_DUTY_CYCLE};
#[cfg(feature = "rpi")]
pub use rpi::{RpiBackend, RpiLine, RpiLineError};
pub use simulated::SimulatedBackend;

/// Motor driver status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorStatus {
    /// Driver outputs enabled.
    pub enabled: bool,
    /// Pulse train running.
    pub stepping: bool,
    /// Direction line level.
    pub direction: bool,
}

/// Capabilities every backend provides.
///
/// Methods take `&self`; implementations synchronize internally so a backend can be
/// shared between the caller and a background motion.
pub trait HardwareBackend: Send + Sync {
    /// Motor steps per output revolution.
    fn steps_per_revolution(&self) -> u32;

    /// Switch the light on or off. Idempotent.
    fn set_light(&self, on: bool) -> Result<()>;

    /// Last commanded light level.
    fn light(&self) -> Result<bool>;

    /// Run `primitive` to completion, blocking the calling thread.
    ///
    /// Returns `MotionError::Interrupted` if `cancel` fires first. The driver is
    /// disabled again on every exit path.
    fn run_stepper(&self, primitive: &MotorPrimitive, cancel: &CancelToken) -> Result<()>;

    /// Current driver status.
    fn motor_status(&self) -> MotorStatus;
}

/// Open the backend selected by `config`.
///
/// # Errors
///
/// Configuration errors from validation, `HardwareError::Unavailable` when the
/// physical backend is requested but GPIO cannot be reached or the crate was built
/// without the `rpi` feature.
pub fn open(config: &HardwareConfig) -> Result<Arc<dyn HardwareBackend>> {
    validate_config(config)?;

    match config.backend {
        BackendKind::Simulated => {
            tracing::info!(
                steps_per_revolution = config.motor.steps_per_revolution,
                "using simulated hardware"
            );
            Ok(Arc::new(SimulatedBackend::from_config(&config.motor)?))
        }
        BackendKind::Physical => open_physical(config),
    }
}

#[cfg(feature = "rpi")]
fn open_physical(config: &HardwareConfig) -> Result<Arc<dyn HardwareBackend>> {
    let backend = rpi::open(config)?;
    tracing::info!(pins = ?config.pins, "using GPIO hardware");
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "rpi"))]
fn open_physical(_config: &HardwareConfig) -> Result<Arc<dyn HardwareBackend>> {
    Err(crate::error::HardwareError::unavailable("built without the `rpi` feature").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, Error, HardwareError};

    #[test]
    fn test_open_simulated() {
        let backend = open(&HardwareConfig::default()).unwrap();
        assert_eq!(backend.steps_per_revolution(), 200);
        assert_eq!(
            backend.motor_status(),
            MotorStatus {
                enabled: false,
                stepping: false,
                direction: true,
            }
        );
    }

    #[test]
    fn test_open_validates() {
        let mut config = HardwareConfig::default();
        config.motor.steps_per_revolution = 0;
        assert!(matches!(
            open(&config),
            Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)))
        ));
    }

    #[cfg(not(feature = "rpi"))]
    #[test]
    fn test_physical_unavailable_without_gpio_support() {
        let config = HardwareConfig::default().with_backend(BackendKind::Physical);
        assert!(matches!(
            open(&config),
            Err(Error::Hardware(HardwareError::Unavailable(_)))
        ));
    }
}
