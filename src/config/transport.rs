//! Sheet transport geometry from TOML.

use serde::Deserialize;

use super::units::{Meters, MetersPerSecond, Millimeters};
use crate::motion::{MotionRequest, TransportGeometry};

/// Default sheet velocity when a request does not name one.
pub const DEFAULT_VELOCITY: MetersPerSecond = MetersPerSecond(0.1);

/// Transport wheel and gearing, in caller units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransportConfig {
    /// Transport wheel radius.
    pub wheel_radius_mm: Millimeters,

    /// Gear ratio of motor to sheet (e.g. 6.0 means 6:1).
    #[serde(default = "default_gear_ratio")]
    pub gear_ratio: f64,

    /// Velocity used when a move does not specify one.
    #[serde(default = "default_velocity", rename = "velocity_m_per_sec")]
    pub velocity: MetersPerSecond,
}

fn default_gear_ratio() -> f64 {
    1.0
}

fn default_velocity() -> MetersPerSecond {
    DEFAULT_VELOCITY
}

impl TransportConfig {
    /// Wheel radius converted to meters.
    #[inline]
    pub fn wheel_radius(&self) -> Meters {
        self.wheel_radius_mm.to_meters()
    }

    /// Geometry for motion requests.
    pub fn geometry(&self) -> TransportGeometry {
        TransportGeometry::new(self.wheel_radius(), self.gear_ratio)
    }

    /// Request to move the sheet by `distance` at the configured velocity.
    pub fn request(&self, distance: Millimeters) -> MotionRequest {
        MotionRequest::from_millimeters(self.geometry(), distance).with_velocity(self.velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_is_in_meters() {
        let config = TransportConfig {
            wheel_radius_mm: Millimeters(30.0),
            gear_ratio: 6.0,
            velocity: DEFAULT_VELOCITY,
        };

        let geometry = config.geometry();
        assert_eq!(geometry.wheel_radius, Meters(0.030));
        assert!((geometry.effective_radius().unwrap().value() - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_request_uses_configured_velocity() {
        let config = TransportConfig {
            wheel_radius_mm: Millimeters(30.0),
            gear_ratio: 6.0,
            velocity: MetersPerSecond(0.04),
        };

        let request = config.request(Millimeters(50.0));
        assert_eq!(request.velocity, MetersPerSecond(0.04));
        assert_eq!(request.distance, Meters(0.05));
    }
}
