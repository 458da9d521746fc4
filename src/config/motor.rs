//! Motor configuration from TOML.

use serde::Deserialize;

/// Steps per revolution of a generic 1.8° stepper.
pub const DEFAULT_STEPS_PER_REVOLUTION: u32 = 200;

/// What a blocking move does with a cancellation once the driver is disabled again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptPolicy {
    /// Return `MotionError::Interrupted` to the caller.
    #[default]
    Propagate,
    /// Log the interruption and report success.
    Swallow,
}

/// Motor configuration from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MotorConfig {
    /// Steps per revolution including microstepping (e.g. 200 × 16 = 3200).
    #[serde(default = "default_steps_per_revolution")]
    pub steps_per_revolution: u32,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,

    /// Cancellation handling for blocking moves.
    #[serde(default)]
    pub on_interrupt: InterruptPolicy,
}

fn default_steps_per_revolution() -> u32 {
    DEFAULT_STEPS_PER_REVOLUTION
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            steps_per_revolution: DEFAULT_STEPS_PER_REVOLUTION,
            invert_direction: false,
            on_interrupt: InterruptPolicy::default(),
        }
    }
}

impl MotorConfig {
    /// Motor with the given steps per revolution and default everything else.
    pub fn with_steps_per_revolution(steps_per_revolution: u32) -> Self {
        Self {
            steps_per_revolution,
            ..Self::default()
        }
    }
}
