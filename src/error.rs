//! Error types for sheet-transport.
//!
//! Provides unified error handling across configuration, unit math, hardware access and
//! motion execution.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all sheet-transport operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Invalid physical parameter, raised before any hardware I/O
    Domain(DomainError),
    /// Hardware access error
    Hardware(HardwareError),
    /// Motion execution error
    Motion(MotionError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Steps per revolution must be > 0
    InvalidStepsPerRevolution(u32),
    /// Wheel radius must be > 0
    InvalidWheelRadius(f64),
    /// Gear ratio must be > 0
    InvalidGearRatio(f64),
    /// Default velocity must be > 0
    InvalidVelocity(f64),
    /// Header pin is not a GPIO line
    InvalidPin {
        /// Line the pin was assigned to
        line: &'static str,
        /// Board header pin number
        pin: u8,
    },
    /// Two lines share a header pin
    DuplicatePin(u8),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Invalid physical parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Velocity must be > 0
    NonPositiveVelocity(f64),
    /// Wheel radius must be > 0
    NonPositiveRadius(f64),
    /// Transmission ratio must be > 0
    NonPositiveTransmission(f64),
    /// Steps per revolution must be > 0
    ZeroStepsPerRevolution,
    /// Distance must be finite
    NonFiniteDistance(f64),
    /// Velocity lies outside the range the compensation curve was fitted for
    CompensationOutOfRange {
        /// Requested velocity in m/s
        velocity: f64,
        /// Value of the quadratic denominator at that velocity
        denominator: f64,
    },
    /// Step count does not fit the motor primitive
    StepOverflow(f64),
}

/// Hardware access errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HardwareError {
    /// GPIO access could not be obtained
    Unavailable(heapless::String<128>),
    /// GPIO pin operation failed
    PinError,
    /// Pulse train generator failed to start or stop
    PulseTrainError,
}

/// Motion execution errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Motion was cancelled before completion; the driver has been disabled
    Interrupted,
    /// Background motion worker panicked
    WorkerPanicked,
    /// Background motion worker could not be started
    SpawnFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Domain(e) => write!(f, "Domain error: {}", e),
            Error::Hardware(e) => write!(f, "Hardware error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidWheelRadius(v) => write!(f, "Invalid wheel radius: {} mm. Must be > 0", v),
            ConfigError::InvalidGearRatio(v) => write!(f, "Invalid gear ratio: {}. Must be > 0", v),
            ConfigError::InvalidVelocity(v) => write!(f, "Invalid velocity: {} m/s. Must be > 0", v),
            ConfigError::InvalidPin { line, pin } => {
                write!(f, "Header pin {} assigned to '{}' is not a GPIO line", pin, line)
            }
            ConfigError::DuplicatePin(pin) => write!(f, "Header pin {} assigned more than once", pin),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NonPositiveVelocity(v) => write!(f, "Velocity {} m/s must be > 0", v),
            DomainError::NonPositiveRadius(r) => write!(f, "Radius {} m must be > 0", r),
            DomainError::NonPositiveTransmission(t) => write!(f, "Transmission {} must be > 0", t),
            DomainError::ZeroStepsPerRevolution => write!(f, "Steps per revolution must be > 0"),
            DomainError::NonFiniteDistance(d) => write!(f, "Distance {} is not finite", d),
            DomainError::CompensationOutOfRange { velocity, denominator } => write!(
                f,
                "Velocity {} m/s outside compensation range (denominator {})",
                velocity, denominator
            ),
            DomainError::StepOverflow(steps) => write!(f, "Step count {} out of range", steps),
        }
    }
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareError::Unavailable(msg) => write!(f, "Hardware unavailable: {}", msg),
            HardwareError::PinError => write!(f, "GPIO pin operation failed"),
            HardwareError::PulseTrainError => write!(f, "Pulse train operation failed"),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::Interrupted => write!(f, "Motion interrupted, driver disabled"),
            MotionError::WorkerPanicked => write!(f, "Background motion worker panicked"),
            MotionError::SpawnFailed => write!(f, "Failed to start background motion worker"),
        }
    }
}

impl HardwareError {
    /// Build an `Unavailable` error, truncating the reason to fit.
    pub fn unavailable(reason: &str) -> Self {
        let mut msg: heapless::String<128> = heapless::String::new();
        for c in reason.chars() {
            if msg.push(c).is_err() {
                break;
            }
        }
        HardwareError::Unavailable(msg)
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DomainError> for Error {
    fn from(e: DomainError) -> Self {
        Error::Domain(e)
    }
}

impl From<HardwareError> for Error {
    fn from(e: HardwareError) -> Self {
        Error::Hardware(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for DomainError {}

#[cfg(feature = "std")]
impl std::error::Error for HardwareError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}
