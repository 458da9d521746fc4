//! Configuration module for sheet-transport.
//!
//! Provides types for loading and validating backend, pin, motor and transport
//! configuration from TOML files (with `std` feature) or pre-built values.

mod motor;
mod pins;
mod system;
mod transport;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use motor::{InterruptPolicy, MotorConfig, DEFAULT_STEPS_PER_REVOLUTION};
pub use pins::{board_to_bcm, PinAssignment};
pub use system::{BackendKind, HardwareConfig};
pub use transport::{TransportConfig, DEFAULT_VELOCITY};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Meters, MetersPerSecond, Millimeters};
