//! Motion requests and the motor primitives they resolve to.

use core::time::Duration;

use crate::config::units::{Meters, MetersPerSecond, Millimeters};
use crate::config::DEFAULT_VELOCITY;
use crate::error::{DomainError, Result};

use super::math::{sleep_time_for_velocity, steps_for_distance, velocity_scaling_compensation};

/// Shortest step spacing the driver reliably resolves.
pub const MIN_PULSE_WIDTH: Duration = Duration::from_micros(5);

/// Direction of sheet travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive distance.
    #[default]
    Forward,
    /// Negative distance.
    Reverse,
}

impl Direction {
    /// Get direction from a signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }
}

/// Resolved step count and spacing handed to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorPrimitive {
    steps: u64,
    inter_step_delay: Duration,
    direction: Direction,
}

impl MotorPrimitive {
    /// Create a primitive, raising the delay to [`MIN_PULSE_WIDTH`] if shorter.
    pub fn new(steps: u64, inter_step_delay: Duration, direction: Direction) -> Self {
        Self {
            steps,
            inter_step_delay: inter_step_delay.max(MIN_PULSE_WIDTH),
            direction,
        }
    }

    /// Number of step pulses.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Time between the starts of consecutive pulses.
    #[inline]
    pub fn inter_step_delay(&self) -> Duration {
        self.inter_step_delay
    }

    /// Direction of travel.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether there is nothing to move.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }

    /// Pulse train frequency in Hz.
    #[inline]
    pub fn frequency_hz(&self) -> f64 {
        1.0 / self.inter_step_delay.as_secs_f64()
    }

    /// Time the pulse train runs: `steps × inter_step_delay`.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.inter_step_delay.as_secs_f64() * self.steps as f64)
            .unwrap_or(Duration::MAX)
    }
}

/// Transport wheel and transmission, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportGeometry {
    /// Radius of the transport wheel.
    pub wheel_radius: Meters,
    /// Motor-to-wheel transmission ratio.
    pub transmission: f64,
}

impl TransportGeometry {
    /// Create a geometry.
    pub fn new(wheel_radius: Meters, transmission: f64) -> Self {
        Self {
            wheel_radius,
            transmission,
        }
    }

    /// Wheel radius seen by the motor shaft: `wheel_radius / transmission`.
    ///
    /// # Errors
    ///
    /// `DomainError::NonPositiveTransmission` for a zero, negative or non-finite ratio.
    pub fn effective_radius(&self) -> Result<Meters> {
        if !(self.transmission > 0.0) || !self.transmission.is_finite() {
            return Err(DomainError::NonPositiveTransmission(self.transmission).into());
        }
        Ok(self.wheel_radius / self.transmission)
    }
}

/// A sheet move in physical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionRequest {
    /// Signed distance; negative runs the transport in reverse.
    pub distance: Meters,
    /// Linear sheet velocity.
    pub velocity: MetersPerSecond,
    /// Wheel and transmission.
    pub geometry: TransportGeometry,
}

impl MotionRequest {
    /// Move `distance` at the default velocity of 0.1 m/s.
    pub fn new(geometry: TransportGeometry, distance: Meters) -> Self {
        Self {
            distance,
            velocity: DEFAULT_VELOCITY,
            geometry,
        }
    }

    /// Move a distance given in millimeters.
    pub fn from_millimeters(geometry: TransportGeometry, distance: Millimeters) -> Self {
        Self::new(geometry, distance.to_meters())
    }

    /// Set the velocity.
    pub fn with_velocity(mut self, velocity: MetersPerSecond) -> Self {
        self.velocity = velocity;
        self
    }

    /// Resolve into a motor primitive for a motor with `steps_per_rev` steps.
    ///
    /// The step count is `trunc(steps_for_distance × compensation(velocity))`; the
    /// delay comes from [`sleep_time_for_velocity`] without compensation.
    ///
    /// # Errors
    ///
    /// Any `DomainError` from the geometry or the math.
    pub fn resolve(&self, steps_per_rev: u32) -> Result<MotorPrimitive> {
        let radius = self.geometry.effective_radius()?;

        let raw_steps = steps_for_distance(self.distance, radius, steps_per_rev)?;
        let factor = velocity_scaling_compensation(self.velocity)?;
        let ts = sleep_time_for_velocity(self.velocity, radius, steps_per_rev)?;

        let scaled = libm::trunc(raw_steps as f64 * factor);
        if libm::fabs(scaled) >= u64::MAX as f64 {
            return Err(DomainError::StepOverflow(scaled).into());
        }

        let delay = Duration::try_from_secs_f64(ts)
            .map_err(|_| DomainError::NonPositiveVelocity(self.velocity.0))?;

        let direction = Direction::from_steps(scaled as i64);
        Ok(MotorPrimitive::new(libm::fabs(scaled) as u64, delay, direction))
    }
}
