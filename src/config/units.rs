//! Unit types for physical quantities.
//!
//! Callers speak millimeters, the motion math speaks meters. The only way across is
//! [`Millimeters::to_meters`] (or the equivalent `From` impl), so the conversion is a
//! named step instead of a stray division.

use core::ops::{Div, Mul, Neg};

use serde::Deserialize;

/// Millimeters per meter.
pub const MM_PER_METER: f64 = 1000.0;

/// Length in millimeters, as accepted from callers and configuration files.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl Millimeters {
    /// Create a new Millimeters value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Convert to meters.
    #[inline]
    pub fn to_meters(self) -> Meters {
        Meters(self.0 / MM_PER_METER)
    }
}

impl From<Millimeters> for Meters {
    #[inline]
    fn from(mm: Millimeters) -> Self {
        mm.to_meters()
    }
}

/// Length in meters, the unit used by the motion math.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl Meters {
    /// Create a new Meters value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Convert to millimeters.
    #[inline]
    pub fn to_millimeters(self) -> Millimeters {
        Millimeters(self.0 * MM_PER_METER)
    }
}

impl Neg for Meters {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Div<f64> for Meters {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

/// Linear velocity in meters per second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct MetersPerSecond(pub f64);

impl MetersPerSecond {
    /// Create a new MetersPerSecond value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Mul<f64> for MetersPerSecond {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Millimeters.
    fn mm(self) -> Millimeters;
    /// Convert to Meters.
    fn m(self) -> Meters;
    /// Convert to MetersPerSecond.
    fn m_per_s(self) -> MetersPerSecond;
}

impl UnitExt for f64 {
    #[inline]
    fn mm(self) -> Millimeters {
        Millimeters(self)
    }

    #[inline]
    fn m(self) -> Meters {
        Meters(self)
    }

    #[inline]
    fn m_per_s(self) -> MetersPerSecond {
        MetersPerSecond(self)
    }
}
