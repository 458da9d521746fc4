//! Kinematic conversions between sheet units and stepper primitives.
//!
//! All lengths are meters and velocities meters per second. `radius` is always the
//! effective radius, i.e. the wheel radius already divided by the transmission ratio.

use core::f64::consts::PI;

use crate::config::units::{Meters, MetersPerSecond};
use crate::error::{DomainError, Result};

/// Quadratic coefficient of the step-rate compensation fit.
const COMPENSATION_A: f64 = -6.686362;
/// Linear coefficient of the step-rate compensation fit.
const COMPENSATION_B: f64 = 0.955385;
/// Constant term of the step-rate compensation fit.
const COMPENSATION_C: f64 = 0.000352;

/// Denominators at or below this are treated as singular.
pub const COMPENSATION_EPSILON: f64 = 1e-6;

/// Arc length travelled per motor step.
#[inline]
fn step_length(radius: f64, steps_per_rev: u32) -> f64 {
    (2.0 * PI * radius) / steps_per_rev as f64
}

fn check_radius(radius: Meters, steps_per_rev: u32) -> Result<()> {
    if !(radius.0 > 0.0) || !radius.0.is_finite() {
        return Err(DomainError::NonPositiveRadius(radius.0).into());
    }
    if steps_per_rev == 0 {
        return Err(DomainError::ZeroStepsPerRevolution.into());
    }
    Ok(())
}

/// Number of whole steps needed to move `distance` along the wheel circumference.
///
/// Truncates toward zero, so a negative distance yields a negative count of the same
/// magnitude a positive one would.
///
/// # Errors
///
/// `DomainError` if the radius or steps per revolution is not positive, or the
/// distance is not finite.
pub fn steps_for_distance(distance: Meters, radius: Meters, steps_per_rev: u32) -> Result<i64> {
    check_radius(radius, steps_per_rev)?;
    if !distance.0.is_finite() {
        return Err(DomainError::NonFiniteDistance(distance.0).into());
    }

    let steps = libm::trunc(distance.0 / step_length(radius.0, steps_per_rev));
    if libm::fabs(steps) >= i64::MAX as f64 {
        return Err(DomainError::StepOverflow(steps).into());
    }

    tracing::debug!(steps, "steps for distance");
    Ok(steps as i64)
}

/// Time between two steps, in seconds, to travel at `velocity`.
///
/// # Errors
///
/// `DomainError` if the velocity, radius or steps per revolution is not positive.
pub fn sleep_time_for_velocity(
    velocity: MetersPerSecond,
    radius: Meters,
    steps_per_rev: u32,
) -> Result<f64> {
    check_radius(radius, steps_per_rev)?;
    if !(velocity.0 > 0.0) || !velocity.0.is_finite() {
        return Err(DomainError::NonPositiveVelocity(velocity.0).into());
    }

    let ts = (2.0 * PI * radius.0) / (steps_per_rev as f64 * velocity.0);
    tracing::debug!(ts, "inter-step delay");
    Ok(ts)
}

/// Correction factor for the driver's nonlinear step-rate response.
///
/// `v / (-6.686362·v² + 0.955385·v + 0.000352)`, an empirical fit for the TMC2209.
/// Applied to the step count of a move, never to its inter-step delay.
///
/// # Errors
///
/// `DomainError::CompensationOutOfRange` when the denominator is at or below
/// [`COMPENSATION_EPSILON`] (above roughly 0.143 m/s the fit turns negative).
pub fn velocity_scaling_compensation(velocity: MetersPerSecond) -> Result<f64> {
    let v = velocity.0;
    if !(v > 0.0) || !v.is_finite() {
        return Err(DomainError::NonPositiveVelocity(v).into());
    }

    let denominator = COMPENSATION_A * v * v + COMPENSATION_B * v + COMPENSATION_C;
    if denominator <= COMPENSATION_EPSILON {
        return Err(DomainError::CompensationOutOfRange {
            velocity: v,
            denominator,
        }
        .into());
    }

    Ok(v / denominator)
}
