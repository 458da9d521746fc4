//! Delay providers and the interruptible hold used while a motion runs.

use core::time::Duration;
use std::sync::OnceLock;
use std::time::Instant;

use embedded_hal::delay::DelayNs;

use crate::error::{MotionError, Result};

use super::CancelToken;

/// Longest single sleep while holding for a motion; cancellation is checked between
/// slices.
pub const HOLD_SLICE: Duration = Duration::from_millis(10);

/// A delay provider that can also read a monotonic clock.
///
/// Holds sleep against a deadline on this clock, so oversleeping one slice shortens
/// the next instead of adding up over a long motion.
pub trait Timer: DelayNs {
    /// Time elapsed since a fixed, arbitrary origin. Never decreases.
    fn now(&mut self) -> Duration;
}

impl<T: Timer + ?Sized> Timer for &mut T {
    #[inline]
    fn now(&mut self) -> Duration {
        T::now(self)
    }
}

/// `DelayNs` backed by `std::thread::sleep`, timed with `std::time::Instant`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

impl Timer for StdDelay {
    fn now(&mut self) -> Duration {
        static ORIGIN: OnceLock<Instant> = OnceLock::new();
        ORIGIN.get_or_init(Instant::now).elapsed()
    }
}

/// Sleep for `duration` on `delay`.
pub(crate) fn pause<D: DelayNs>(delay: &mut D, duration: Duration) {
    let mut remaining = duration;
    while !remaining.is_zero() {
        let chunk = remaining.min(HOLD_SLICE);
        delay.delay_ns(chunk.as_nanos() as u32);
        remaining -= chunk;
    }
}

/// Sleep until `duration` has elapsed on the clock of `delay`, in slices of at most
/// `slice`, stopping early on cancellation.
///
/// `slice` is capped at [`HOLD_SLICE`]; zero selects `HOLD_SLICE`.
///
/// # Errors
///
/// `MotionError::Interrupted` if `cancel` fires before the full duration elapsed.
pub(crate) fn hold<D: Timer>(
    delay: &mut D,
    duration: Duration,
    slice: Duration,
    cancel: &CancelToken,
) -> Result<()> {
    let slice = if slice.is_zero() { HOLD_SLICE } else { slice.min(HOLD_SLICE) };
    let start = delay.now();

    loop {
        if cancel.is_cancelled() {
            return Err(MotionError::Interrupted.into());
        }

        let elapsed = delay.now().saturating_sub(start);
        if elapsed >= duration {
            if elapsed > duration {
                tracing::trace!(overshoot = ?(elapsed - duration), "hold finished late");
            }
            return Ok(());
        }

        let chunk = (duration - elapsed).min(slice);
        delay.delay_ns(chunk.as_nanos() as u32);
    }
}
