//! GPIO backend for a step/direction driver with active-low enable, sleep and reset.
//!
//! Generic over embedded-hal 1.0 output pins, a step line that can also run a pulse
//! train, and a [`Timer`] (a `DelayNs` provider with a monotonic clock).

use core::time::Duration;
use std::sync::{Mutex, MutexGuard, PoisonError};

use embedded_hal::digital::OutputPin;

use crate::config::MotorConfig;
use crate::error::{DomainError, Error, HardwareError, Result};
use crate::motion::{Direction, MotorPrimitive};

use super::delay::{hold, pause, Timer, HOLD_SLICE};
use super::pulse::{PulseTrain, STEP_DUTY_CYCLE};
use super::{CancelToken, HardwareBackend, MotorStatus};

/// Pause after every line change.
pub const SETTLE_TIME: Duration = Duration::from_millis(5);

/// Pause between enabling the driver and the first pulse.
pub const WAKE_TIME: Duration = Duration::from_millis(100);

/// Driver sequencing delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverTiming {
    /// Pause after every line change.
    pub settle: Duration,
    /// Pause before the pulse train starts.
    pub wake: Duration,
    /// Cancellation granularity while pulsing. Values above [`HOLD_SLICE`] are capped
    /// to it and zero selects it.
    pub hold_slice: Duration,
}

impl Default for DriverTiming {
    fn default() -> Self {
        Self {
            settle: SETTLE_TIME,
            wake: WAKE_TIME,
            hold_slice: HOLD_SLICE,
        }
    }
}

/// The six lines the backend drives.
pub struct DriverPins<PIN, STEP> {
    /// Light on/off.
    pub light: PIN,
    /// Driver not-enable (high = outputs off).
    pub n_enable: PIN,
    /// Driver not-reset (high = running).
    pub n_reset: PIN,
    /// Driver not-sleep (low = asleep).
    pub n_sleep: PIN,
    /// Direction.
    pub dir: PIN,
    /// Step input, also the pulse-train output.
    pub step: STEP,
}

/// Last level driven on every line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineLevels {
    /// Light line.
    pub light: bool,
    /// Not-enable line.
    pub n_enable: bool,
    /// Not-reset line.
    pub n_reset: bool,
    /// Not-sleep line.
    pub n_sleep: bool,
    /// Direction line.
    pub dir: bool,
    /// Step line (static level).
    pub step: bool,
    /// Pulse train running on the step line.
    pub pulsing: bool,
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<()> {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.map_err(|_| Error::Hardware(HardwareError::PinError))
}

/// Keep the first error while still running every step.
fn keep_first(acc: &mut Result<()>, next: Result<()>) {
    if acc.is_ok() {
        *acc = next;
    }
}

struct Lines<PIN, STEP> {
    pins: DriverPins<PIN, STEP>,
    levels: LineLevels,
}

impl<PIN, STEP> Lines<PIN, STEP>
where
    PIN: OutputPin,
    STEP: OutputPin + PulseTrain,
{
    fn set_light(&mut self, high: bool) -> Result<()> {
        drive(&mut self.pins.light, high)?;
        self.levels.light = high;
        Ok(())
    }

    fn set_n_enable(&mut self, high: bool) -> Result<()> {
        tracing::debug!(level = high, "n_en");
        drive(&mut self.pins.n_enable, high)?;
        self.levels.n_enable = high;
        Ok(())
    }

    fn set_n_reset(&mut self, high: bool) -> Result<()> {
        drive(&mut self.pins.n_reset, high)?;
        self.levels.n_reset = high;
        Ok(())
    }

    fn set_n_sleep(&mut self, high: bool) -> Result<()> {
        tracing::debug!(level = high, "n_slp");
        drive(&mut self.pins.n_sleep, high)?;
        self.levels.n_sleep = high;
        Ok(())
    }

    fn set_dir(&mut self, high: bool) -> Result<()> {
        tracing::debug!(level = high, "dir");
        drive(&mut self.pins.dir, high)?;
        self.levels.dir = high;
        Ok(())
    }

    fn set_step(&mut self, high: bool) -> Result<()> {
        tracing::debug!(level = high, "stp");
        drive(&mut self.pins.step, high)?;
        self.levels.step = high;
        Ok(())
    }

    fn start_pulses(&mut self, frequency_hz: f64) -> Result<()> {
        tracing::debug!(frequency_hz, "pwm on");
        self.pins
            .step
            .start_pulses(frequency_hz, STEP_DUTY_CYCLE)
            .map_err(|_| Error::Hardware(HardwareError::PulseTrainError))?;
        self.levels.pulsing = true;
        Ok(())
    }

    fn stop_pulses(&mut self) -> Result<()> {
        tracing::debug!("pwm off");
        self.pins
            .step
            .stop_pulses()
            .map_err(|_| Error::Hardware(HardwareError::PulseTrainError))?;
        self.levels.pulsing = false;
        Ok(())
    }

    /// Disable outputs, put the driver to sleep and park the step line low.
    fn disable(&mut self) -> Result<()> {
        tracing::debug!("disable motor");
        let mut result = Ok(());
        if self.levels.pulsing {
            keep_first(&mut result, self.stop_pulses());
        }
        keep_first(&mut result, self.set_n_enable(true));
        keep_first(&mut result, self.set_n_sleep(false));
        keep_first(&mut result, self.set_step(false));
        result
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the driver-enabled state; disables the driver when released or dropped.
struct EnableGuard<'a, PIN, STEP>
where
    PIN: OutputPin,
    STEP: OutputPin + PulseTrain,
{
    lines: &'a Mutex<Lines<PIN, STEP>>,
    armed: bool,
}

impl<'a, PIN, STEP> EnableGuard<'a, PIN, STEP>
where
    PIN: OutputPin,
    STEP: OutputPin + PulseTrain,
{
    fn arm(lines: &'a Mutex<Lines<PIN, STEP>>) -> Self {
        Self { lines, armed: true }
    }

    /// Disable the driver, reporting pin failures.
    fn release(mut self) -> Result<()> {
        self.armed = false;
        lock(self.lines).disable()
    }
}

impl<PIN, STEP> Drop for EnableGuard<'_, PIN, STEP>
where
    PIN: OutputPin,
    STEP: OutputPin + PulseTrain,
{
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = lock(self.lines).disable() {
                tracing::error!(error = %e, "failed to disable motor driver");
            }
        }
    }
}

/// GPIO backend.
pub struct PhysicalBackend<PIN, STEP, DELAY> {
    lines: Mutex<Lines<PIN, STEP>>,
    delay: Mutex<DELAY>,
    steps_per_revolution: u32,
    invert_direction: bool,
    timing: DriverTiming,
}

impl<PIN, STEP, DELAY> PhysicalBackend<PIN, STEP, DELAY>
where
    PIN: OutputPin,
    STEP: OutputPin + PulseTrain,
    DELAY: Timer,
{
    /// Claim the lines and drive their rest levels: light, step, direction and
    /// not-sleep low; not-enable and not-reset high. The driver starts disabled and
    /// asleep.
    ///
    /// # Errors
    ///
    /// `DomainError::ZeroStepsPerRevolution` for a zero step count, or
    /// `HardwareError::PinError` if a line cannot be driven.
    pub fn new(pins: DriverPins<PIN, STEP>, delay: DELAY, motor: &MotorConfig) -> Result<Self> {
        if motor.steps_per_revolution == 0 {
            return Err(DomainError::ZeroStepsPerRevolution.into());
        }

        let mut lines = Lines {
            pins,
            levels: LineLevels::default(),
        };
        lines.set_dir(false)?;
        lines.set_step(false)?;
        lines.set_light(false)?;
        lines.set_n_sleep(false)?;
        lines.set_n_enable(true)?;
        lines.set_n_reset(true)?;

        Ok(Self {
            lines: Mutex::new(lines),
            delay: Mutex::new(delay),
            steps_per_revolution: motor.steps_per_revolution,
            invert_direction: motor.invert_direction,
            timing: DriverTiming::default(),
        })
    }

    /// Override the sequencing delays.
    pub fn with_timing(mut self, timing: DriverTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Levels last driven on every line.
    pub fn levels(&self) -> LineLevels {
        lock(&self.lines).levels
    }

    fn with_lines<R>(&self, f: impl FnOnce(&mut Lines<PIN, STEP>) -> Result<R>) -> Result<R> {
        f(&mut lock(&self.lines))
    }

    /// Wake, enable, pulse and hold. Cleanup belongs to the caller's guard.
    fn drive_motion(
        &self,
        delay: &mut DELAY,
        primitive: &MotorPrimitive,
        cancel: &CancelToken,
    ) -> Result<()> {
        let dir_high = (primitive.direction() == Direction::Reverse) != self.invert_direction;
        self.with_lines(|l| l.set_dir(dir_high))?;
        pause(delay, self.timing.settle);

        self.with_lines(|l| l.set_n_sleep(true))?;
        pause(delay, self.timing.settle);

        self.with_lines(|l| l.set_n_enable(false))?;
        pause(delay, self.timing.settle);

        pause(delay, self.timing.wake);

        self.with_lines(|l| l.start_pulses(primitive.frequency_hz()))?;
        hold(delay, primitive.duration(), self.timing.hold_slice, cancel)?;
        self.with_lines(|l| l.stop_pulses())
    }
}

impl<PIN, STEP, DELAY> HardwareBackend for PhysicalBackend<PIN, STEP, DELAY>
where
    PIN: OutputPin + Send,
    STEP: OutputPin + PulseTrain + Send,
    DELAY: Timer + Send,
{
    fn steps_per_revolution(&self) -> u32 {
        self.steps_per_revolution
    }

    fn set_light(&self, on: bool) -> Result<()> {
        self.with_lines(|l| l.set_light(on))
    }

    fn light(&self) -> Result<bool> {
        Ok(lock(&self.lines).levels.light)
    }

    fn run_stepper(&self, primitive: &MotorPrimitive, cancel: &CancelToken) -> Result<()> {
        if primitive.is_empty() {
            tracing::debug!("zero steps, driver left idle");
            return Ok(());
        }

        // One motion at a time per backend, even without a controller in front.
        let mut delay = lock(&self.delay);

        tracing::debug!(
            steps = primitive.steps(),
            inter_step_delay = ?primitive.inter_step_delay(),
            "run stepper"
        );

        let guard = EnableGuard::arm(&self.lines);
        let motion = self.drive_motion(&mut delay, primitive, cancel);
        let released = guard.release();

        motion.and(released)
    }

    fn motor_status(&self) -> MotorStatus {
        let levels = lock(&self.lines).levels;
        MotorStatus {
            enabled: !levels.n_enable,
            stepping: levels.pulsing,
            direction: levels.dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use std::sync::atomic::{AtomicU64, Ordering};

    use embedded_hal::delay::DelayNs;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};

    use crate::error::MotionError;

    /// Virtual clock advanced by every delay, plus a fixed oversleep per call.
    #[derive(Clone, Default)]
    struct VirtualDelay {
        now_ns: Arc<AtomicU64>,
        oversleep_ns: u64,
    }

    impl DelayNs for VirtualDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.now_ns
                .fetch_add(u64::from(ns) + self.oversleep_ns, Ordering::SeqCst);
        }
    }

    impl Timer for VirtualDelay {
        fn now(&mut self) -> Duration {
            Duration::from_nanos(self.now_ns.load(Ordering::SeqCst))
        }
    }

    /// Step line that records pulse-train calls and drives nothing.
    #[derive(Clone, Default)]
    struct FakeStep {
        events: Arc<Mutex<Vec<&'static str>>>,
        fail_start: bool,
        clock: Arc<AtomicU64>,
        pulse_times: Arc<Mutex<Vec<u64>>>,
    }

    impl FakeStep {
        fn events(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().clone()
        }

        fn pulse_times(&self) -> Vec<u64> {
            self.pulse_times.lock().unwrap().clone()
        }

        fn stamp(&self) {
            let now = self.clock.load(Ordering::SeqCst);
            self.pulse_times.lock().unwrap().push(now);
        }
    }

    impl ErrorType for FakeStep {
        type Error = ErrorKind;
    }

    impl OutputPin for FakeStep {
        fn set_low(&mut self) -> core::result::Result<(), ErrorKind> {
            self.events.lock().unwrap().push("low");
            Ok(())
        }

        fn set_high(&mut self) -> core::result::Result<(), ErrorKind> {
            self.events.lock().unwrap().push("high");
            Ok(())
        }
    }

    impl PulseTrain for FakeStep {
        fn start_pulses(&mut self, _hz: f64, _duty: f64) -> core::result::Result<(), ErrorKind> {
            if self.fail_start {
                return Err(ErrorKind::Other);
            }
            self.events.lock().unwrap().push("start");
            self.stamp();
            Ok(())
        }

        fn stop_pulses(&mut self) -> core::result::Result<(), ErrorKind> {
            self.events.lock().unwrap().push("stop");
            self.stamp();
            Ok(())
        }
    }

    fn set(state: State) -> PinTransaction {
        PinTransaction::set(state)
    }

    #[test]
    fn test_line_sequence_for_one_move() {
        let light = PinMock::new(&[set(State::Low)]);
        let n_enable = PinMock::new(&[set(State::High), set(State::Low), set(State::High)]);
        let n_reset = PinMock::new(&[set(State::High)]);
        let n_sleep = PinMock::new(&[set(State::Low), set(State::High), set(State::Low)]);
        let dir = PinMock::new(&[set(State::Low), set(State::Low)]);
        let step = FakeStep::default();

        let pins = DriverPins {
            light: light.clone(),
            n_enable: n_enable.clone(),
            n_reset: n_reset.clone(),
            n_sleep: n_sleep.clone(),
            dir: dir.clone(),
            step: step.clone(),
        };

        let backend = PhysicalBackend::new(pins, VirtualDelay::default(), &MotorConfig::default()).unwrap();
        let primitive = MotorPrimitive::new(100, Duration::from_micros(500), Direction::Forward);
        backend.run_stepper(&primitive, &CancelToken::new()).unwrap();

        assert_eq!(step.events(), vec!["low", "start", "stop", "low"]);
        assert!(!backend.motor_status().enabled);

        for mut pin in [light, n_enable, n_reset, n_sleep, dir] {
            pin.done();
        }
    }

    fn fake_pins(step: FakeStep) -> DriverPins<FakeStep, FakeStep> {
        DriverPins {
            light: FakeStep::default(),
            n_enable: FakeStep::default(),
            n_reset: FakeStep::default(),
            n_sleep: FakeStep::default(),
            dir: FakeStep::default(),
            step,
        }
    }

    #[test]
    fn test_initial_levels_disable_driver() {
        let backend =
            PhysicalBackend::new(fake_pins(FakeStep::default()), VirtualDelay::default(), &MotorConfig::default())
                .unwrap();

        let levels = backend.levels();
        assert!(levels.n_enable);
        assert!(levels.n_reset);
        assert!(!levels.n_sleep);
        assert!(!levels.step);
        assert!(!levels.light);
        assert_eq!(backend.motor_status(), MotorStatus::default());
    }

    #[test]
    fn test_interrupted_run_disables_driver() {
        let step = FakeStep::default();
        let backend =
            PhysicalBackend::new(fake_pins(step.clone()), VirtualDelay::default(), &MotorConfig::default())
                .unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();

        let primitive = MotorPrimitive::new(1_000, Duration::from_millis(1), Direction::Forward);
        let result = backend.run_stepper(&primitive, &cancel);

        assert!(matches!(result, Err(Error::Motion(MotionError::Interrupted))));
        // Pulse train was started, then stopped by cleanup
        assert_eq!(step.events(), vec!["low", "start", "stop", "low"]);

        let levels = backend.levels();
        assert!(levels.n_enable);
        assert!(!levels.n_sleep);
        assert!(!levels.pulsing);
        assert!(!backend.motor_status().enabled);
    }

    #[test]
    fn test_pulse_failure_still_disables_driver() {
        let step = FakeStep {
            fail_start: true,
            ..FakeStep::default()
        };
        let backend =
            PhysicalBackend::new(fake_pins(step), VirtualDelay::default(), &MotorConfig::default()).unwrap();

        let primitive = MotorPrimitive::new(10, Duration::from_millis(1), Direction::Forward);
        let result = backend.run_stepper(&primitive, &CancelToken::new());

        assert!(matches!(result, Err(Error::Hardware(HardwareError::PulseTrainError))));
        assert!(!backend.motor_status().enabled);
        assert!(!backend.levels().n_sleep);
    }

    #[test]
    fn test_pulse_train_runs_for_motion_duration() {
        // Every sleep runs 1 ms long; the pulse train may only carry the last overrun
        let delay = VirtualDelay {
            oversleep_ns: 1_000_000,
            ..VirtualDelay::default()
        };
        let step = FakeStep {
            clock: Arc::clone(&delay.now_ns),
            ..FakeStep::default()
        };
        let backend =
            PhysicalBackend::new(fake_pins(step.clone()), delay, &MotorConfig::default()).unwrap();

        // About 3 s at the reference step rate
        let primitive = MotorPrimitive::new(12_225, Duration::from_nanos(245_437), Direction::Forward);
        backend.run_stepper(&primitive, &CancelToken::new()).unwrap();

        let times = step.pulse_times();
        assert_eq!(times.len(), 2);
        let held = times[1] - times[0];
        let nominal = primitive.duration().as_nanos() as u64;
        assert!(held >= nominal);
        assert!(held - nominal <= 1_000_000, "pulse train overran by {} ns", held - nominal);
    }

    #[test]
    fn test_reverse_drives_direction_high() {
        let backend =
            PhysicalBackend::new(fake_pins(FakeStep::default()), VirtualDelay::default(), &MotorConfig::default())
                .unwrap();

        let primitive = MotorPrimitive::new(10, Duration::from_millis(1), Direction::Reverse);
        backend.run_stepper(&primitive, &CancelToken::new()).unwrap();
        assert!(backend.motor_status().direction);

        let primitive = MotorPrimitive::new(10, Duration::from_millis(1), Direction::Forward);
        backend.run_stepper(&primitive, &CancelToken::new()).unwrap();
        assert!(!backend.motor_status().direction);
    }

    #[test]
    fn test_inverted_direction() {
        let motor = MotorConfig {
            invert_direction: true,
            ..MotorConfig::default()
        };
        let backend = PhysicalBackend::new(fake_pins(FakeStep::default()), VirtualDelay::default(), &motor).unwrap();

        let primitive = MotorPrimitive::new(10, Duration::from_millis(1), Direction::Forward);
        backend.run_stepper(&primitive, &CancelToken::new()).unwrap();
        assert!(backend.motor_status().direction);
    }

    #[test]
    fn test_zero_steps_leaves_lines_untouched() {
        let step = FakeStep::default();
        let backend =
            PhysicalBackend::new(fake_pins(step.clone()), VirtualDelay::default(), &MotorConfig::default())
                .unwrap();

        let primitive = MotorPrimitive::new(0, Duration::from_millis(1), Direction::Forward);
        backend.run_stepper(&primitive, &CancelToken::new()).unwrap();
        assert_eq!(step.events(), vec!["low"]);
    }

    #[test]
    fn test_light_level_tracked() {
        let backend =
            PhysicalBackend::new(fake_pins(FakeStep::default()), VirtualDelay::default(), &MotorConfig::default())
                .unwrap();

        backend.set_light(true).unwrap();
        assert!(backend.light().unwrap());
        backend.set_light(false).unwrap();
        assert!(!backend.light().unwrap());
    }
}
