//! Pulse-train output on the step line.

use embedded_hal::digital::ErrorType;

/// Duty cycle of the step pulse train.
pub const STEP_DUTY_CYCLE: f64 = 0.5;

/// A line that can emit a free-running square wave.
///
/// embedded-hal has no frequency-settable PWM trait, so the step line implements this
/// next to `OutputPin`, sharing its error type.
pub trait PulseTrain: ErrorType {
    /// Start emitting pulses at `frequency_hz` with `duty_cycle` in `0.0..=1.0`.
    fn start_pulses(&mut self, frequency_hz: f64, duty_cycle: f64) -> Result<(), Self::Error>;

    /// Stop emitting pulses.
    fn stop_pulses(&mut self) -> Result<(), Self::Error>;
}

impl<T: PulseTrain + ?Sized> PulseTrain for &mut T {
    #[inline]
    fn start_pulses(&mut self, frequency_hz: f64, duty_cycle: f64) -> Result<(), Self::Error> {
        T::start_pulses(self, frequency_hz, duty_cycle)
    }

    #[inline]
    fn stop_pulses(&mut self) -> Result<(), Self::Error> {
        T::stop_pulses(self)
    }
}
