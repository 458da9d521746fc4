//! In-memory backend for machines without GPIO access.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::MotorConfig;
use crate::error::{DomainError, Result};
use crate::motion::MotorPrimitive;

use super::delay::{hold, StdDelay, HOLD_SLICE};
use super::{CancelToken, HardwareBackend, MotorStatus};

/// Stand-in backend: keeps the light level in memory and sleeps for the length of
/// each motion.
#[derive(Debug)]
pub struct SimulatedBackend {
    light: AtomicBool,
    stepping: AtomicBool,
    steps_per_revolution: u32,
}

impl SimulatedBackend {
    /// Create a simulated backend.
    ///
    /// # Errors
    ///
    /// `DomainError::ZeroStepsPerRevolution` if `steps_per_revolution` is zero.
    pub fn new(steps_per_revolution: u32) -> Result<Self> {
        if steps_per_revolution == 0 {
            return Err(DomainError::ZeroStepsPerRevolution.into());
        }
        Ok(Self {
            light: AtomicBool::new(false),
            stepping: AtomicBool::new(false),
            steps_per_revolution,
        })
    }

    /// Create from motor configuration.
    pub fn from_config(config: &MotorConfig) -> Result<Self> {
        Self::new(config.steps_per_revolution)
    }
}

/// Clears the stepping flag however the motion ends.
struct SteppingFlag<'a>(&'a AtomicBool);

impl<'a> SteppingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for SteppingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl HardwareBackend for SimulatedBackend {
    fn steps_per_revolution(&self) -> u32 {
        self.steps_per_revolution
    }

    fn set_light(&self, on: bool) -> Result<()> {
        self.light.store(on, Ordering::SeqCst);
        Ok(())
    }

    fn light(&self) -> Result<bool> {
        Ok(self.light.load(Ordering::SeqCst))
    }

    fn run_stepper(&self, primitive: &MotorPrimitive, cancel: &CancelToken) -> Result<()> {
        tracing::debug!(
            steps = primitive.steps(),
            duration = ?primitive.duration(),
            "simulated stepper run"
        );

        let _stepping = SteppingFlag::raise(&self.stepping);
        hold(&mut StdDelay, primitive.duration(), HOLD_SLICE, cancel)
    }

    /// `enabled` and `stepping` both mirror the stepping flag; `direction` is always
    /// `true`. Note `stepping` is the flag too, not a constant `true`, so an idle
    /// backend reports `stepping: false`.
    fn motor_status(&self) -> MotorStatus {
        let stepping = self.stepping.load(Ordering::SeqCst);
        MotorStatus {
            enabled: stepping,
            stepping,
            direction: true,
        }
    }
}
