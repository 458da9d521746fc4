//! System configuration - root configuration structure.

use serde::Deserialize;

use super::motor::MotorConfig;
use super::pins::PinAssignment;
use super::transport::TransportConfig;
use super::units::{MetersPerSecond, Millimeters};

/// Which hardware backend to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BackendKind {
    /// In-memory stand-in, sleeps for the motion duration.
    #[default]
    Simulated,
    /// Real GPIO lines and a pulse-train generator.
    Physical,
}

/// Root configuration structure from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HardwareConfig {
    /// Backend variant.
    #[serde(default)]
    pub backend: BackendKind,

    /// GPIO assignment (physical backend only).
    #[serde(default)]
    pub pins: PinAssignment,

    /// Motor parameters.
    #[serde(default)]
    pub motor: MotorConfig,

    /// Optional transport geometry.
    #[serde(default)]
    pub transport: Option<TransportConfig>,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Simulated,
            pins: PinAssignment::default(),
            motor: MotorConfig::default(),
            transport: None,
        }
    }
}

impl HardwareConfig {
    /// Configuration of the drop-sheet scanner rig: 3200 steps/rev, 30 mm wheel
    /// behind a 6:1 gear, 0.04 m/s.
    pub fn reference(backend: BackendKind) -> Self {
        Self {
            backend,
            pins: PinAssignment::default(),
            motor: MotorConfig::with_steps_per_revolution(3200),
            transport: Some(TransportConfig {
                wheel_radius_mm: Millimeters(30.0),
                gear_ratio: 6.0,
                velocity: MetersPerSecond(0.04),
            }),
        }
    }

    /// Same configuration with a different backend.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }
}
