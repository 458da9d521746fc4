//! Motion math and motor primitives.
//!
//! Converts sheet distances and velocities into step counts and step spacing.

pub mod math;
mod primitive;

pub use math::{sleep_time_for_velocity, steps_for_distance, velocity_scaling_compensation};
pub use primitive::{Direction, MotionRequest, MotorPrimitive, TransportGeometry, MIN_PULSE_WIDTH};
