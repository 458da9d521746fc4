//! # sheet-transport
//!
//! Hardware abstraction for a stepper-driven sheet transport and the light above it.
//!
//! ## Features
//!
//! - **Unit-aware moves**: distances in millimeters, velocities in m/s, converted to
//!   step counts and step spacing with an empirical velocity compensation
//! - **Two backends**: an in-memory simulation and a GPIO driver for step/dir drivers
//!   with active-low enable, sleep and reset
//! - **embedded-hal 1.0**: the GPIO backend is generic over `OutputPin` and `DelayNs`
//! - **Blocking or background moves**: background moves return a joinable, cancellable
//!   [`MotionTask`]
//! - **no_std math**: configuration, units and motion math build without `std`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheet_transport::{construct, HardwareConfig, BackendKind, Millimeters};
//!
//! let config = HardwareConfig::reference(BackendKind::Simulated);
//! let controller = construct(&config)?;
//!
//! controller.set_light(true)?;
//! let transport = config.transport.as_ref().unwrap();
//! controller.move_sheet(&transport.request(Millimeters(10.0)))?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): backends, controller, TOML loading
//! - `alloc`: heap allocation for no_std with allocator
//! - `rpi`: Raspberry Pi GPIO through rppal
//! - `defmt`: `defmt::Format` on status types for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod config;
pub mod error;
pub mod motion;

// Hardware access (std only)
#[cfg(feature = "std")]
pub mod backend;
#[cfg(feature = "std")]
pub mod controller;

// Re-exports for ergonomic API
pub use config::{validate_config, BackendKind, HardwareConfig, InterruptPolicy, MotorConfig, PinAssignment, TransportConfig};
pub use error::{Error, Result};
pub use motion::{Direction, MotionRequest, MotorPrimitive, TransportGeometry};

#[cfg(feature = "std")]
pub use backend::{CancelToken, HardwareBackend, MotorStatus, PhysicalBackend, SimulatedBackend};
#[cfg(feature = "std")]
pub use controller::{construct, instance, HardwareController, MotionTask};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Meters, MetersPerSecond, Millimeters, UnitExt};
