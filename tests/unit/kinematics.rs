//! Property tests for the motion math.

use proptest::prelude::*;

use sheet_transport::motion::math::{
    sleep_time_for_velocity, steps_for_distance, velocity_scaling_compensation,
};
use sheet_transport::{Meters, MetersPerSecond, Millimeters, MotionRequest, TransportGeometry};

const RADIUS: Meters = Meters(0.005);

#[test]
fn test_reference_values() {
    assert_eq!(steps_for_distance(Meters(0.010), RADIUS, 3200).unwrap(), 1018);
    assert_eq!(steps_for_distance(Meters(0.0), RADIUS, 3200).unwrap(), 0);

    let k = velocity_scaling_compensation(MetersPerSecond(0.04)).unwrap();
    assert!((k - 1.4353).abs() < 1e-3, "k = {}", k);
}

#[test]
fn test_millimeters_reach_math_as_meters() {
    let geometry = TransportGeometry::new(Millimeters(30.0).to_meters(), 6.0);
    let request = MotionRequest::from_millimeters(geometry, Millimeters(10.0));

    assert_eq!(request.distance, Meters(0.01));
    assert!((geometry.effective_radius().unwrap().value() - 0.005).abs() < 1e-12);
}

proptest! {
    #[test]
    fn prop_steps_monotonic_in_distance(a in 0.0f64..10.0, b in 0.0f64..10.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo_steps = steps_for_distance(Meters(lo), RADIUS, 3200).unwrap();
        let hi_steps = steps_for_distance(Meters(hi), RADIUS, 3200).unwrap();
        prop_assert!(lo_steps <= hi_steps);
        prop_assert!(lo_steps >= 0);
    }

    #[test]
    fn prop_steps_odd_in_distance(d in 0.0f64..10.0) {
        let forward = steps_for_distance(Meters(d), RADIUS, 3200).unwrap();
        let reverse = steps_for_distance(Meters(-d), RADIUS, 3200).unwrap();
        prop_assert_eq!(reverse, -forward);
    }

    #[test]
    fn prop_sleep_time_decreasing_in_velocity(a in 0.001f64..5.0, b in 0.001f64..5.0) {
        prop_assume!(b - a > 1e-6);
        let slow = sleep_time_for_velocity(MetersPerSecond(a), RADIUS, 3200).unwrap();
        let fast = sleep_time_for_velocity(MetersPerSecond(b), RADIUS, 3200).unwrap();
        prop_assert!(fast < slow);
        prop_assert!(fast > 0.0);
    }

    #[test]
    fn prop_non_positive_velocity_rejected(v in -5.0f64..=0.0) {
        prop_assert!(sleep_time_for_velocity(MetersPerSecond(v), RADIUS, 3200).is_err());
        prop_assert!(velocity_scaling_compensation(MetersPerSecond(v)).is_err());
    }

    #[test]
    fn prop_compensation_finite_or_error(v in -1.0f64..1.0) {
        if let Ok(k) = velocity_scaling_compensation(MetersPerSecond(v)) {
            prop_assert!(k.is_finite());
            prop_assert!(k > 0.0);
        }
    }
}
