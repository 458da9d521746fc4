//! Cloneable controller handle.

use std::sync::{Arc, Mutex, PoisonError};

use crate::backend::{self, CancelToken, HardwareBackend, MotorStatus};
use crate::config::{HardwareConfig, InterruptPolicy};
use crate::error::{Error, MotionError, Result};
use crate::motion::{MotionRequest, MotorPrimitive};

use super::task::MotionTask;

/// Handle to one hardware session.
///
/// Clones share the backend and the motion lock, so moves issued through any clone are
/// serialized. Light and status calls never wait for a running move.
pub struct HardwareController<B: HardwareBackend + ?Sized = dyn HardwareBackend> {
    backend: Arc<B>,
    motion: Arc<Mutex<()>>,
    interrupt_policy: InterruptPolicy,
}

impl<B: HardwareBackend + ?Sized> Clone for HardwareController<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            motion: Arc::clone(&self.motion),
            interrupt_policy: self.interrupt_policy,
        }
    }
}

impl<B: HardwareBackend> HardwareController<B> {
    /// Take ownership of `backend`.
    pub fn new(backend: B) -> Self {
        Self::from_shared(Arc::new(backend))
    }
}

impl HardwareController {
    /// Open the backend named in `config` and apply its interrupt policy.
    ///
    /// # Errors
    ///
    /// See [`backend::open`].
    pub fn from_config(config: &HardwareConfig) -> Result<Self> {
        let backend = backend::open(config)?;
        Ok(Self::from_shared(backend).with_interrupt_policy(config.motor.on_interrupt))
    }
}

impl<B: HardwareBackend + ?Sized> HardwareController<B> {
    /// Wrap an already shared backend.
    pub fn from_shared(backend: Arc<B>) -> Self {
        Self {
            backend,
            motion: Arc::new(Mutex::new(())),
            interrupt_policy: InterruptPolicy::default(),
        }
    }

    /// Set how cancelled moves are reported.
    pub fn with_interrupt_policy(mut self, policy: InterruptPolicy) -> Self {
        self.interrupt_policy = policy;
        self
    }

    /// How cancelled moves are reported.
    pub fn interrupt_policy(&self) -> InterruptPolicy {
        self.interrupt_policy
    }

    /// The backend.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Motor steps per output revolution.
    pub fn steps_per_revolution(&self) -> u32 {
        self.backend.steps_per_revolution()
    }

    /// Whether `other` is a clone of this handle.
    pub fn same_session(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.motion, &other.motion)
    }

    /// Switch the light on or off.
    pub fn set_light(&self, on: bool) -> Result<()> {
        tracing::debug!(on, "set light");
        self.backend.set_light(on)
    }

    /// Last commanded light level.
    pub fn light(&self) -> Result<bool> {
        self.backend.light()
    }

    /// Driver status.
    pub fn motor_status(&self) -> MotorStatus {
        self.backend.motor_status()
    }

    /// Whether the driver is enabled, i.e. a move is in progress.
    pub fn sheet_moving(&self) -> bool {
        self.backend.motor_status().enabled
    }

    /// Resolve `request` for this motor without moving anything.
    ///
    /// # Errors
    ///
    /// Any `DomainError` from the geometry or the motion math.
    pub fn resolve(&self, request: &MotionRequest) -> Result<MotorPrimitive> {
        let primitive = request.resolve(self.steps_per_revolution())?;
        tracing::debug!(
            steps = primitive.steps(),
            direction = ?primitive.direction(),
            inter_step_delay = ?primitive.inter_step_delay(),
            "resolved sheet move"
        );
        Ok(primitive)
    }

    /// Move the sheet and block until done. Returns the executed primitive.
    ///
    /// # Errors
    ///
    /// Domain errors before any line is touched; hardware errors from the backend.
    pub fn move_sheet(&self, request: &MotionRequest) -> Result<MotorPrimitive> {
        self.move_sheet_cancellable(request, &CancelToken::new())
    }

    /// Like [`move_sheet`](Self::move_sheet), stopping early when `cancel` fires.
    ///
    /// # Errors
    ///
    /// As `move_sheet`, plus `MotionError::Interrupted` under
    /// [`InterruptPolicy::Propagate`].
    #[tracing::instrument(level = "debug", skip(self, cancel))]
    pub fn move_sheet_cancellable(
        &self,
        request: &MotionRequest,
        cancel: &CancelToken,
    ) -> Result<MotorPrimitive> {
        let primitive = self.resolve(request)?;
        run_serialized(&*self.backend, &self.motion, &primitive, cancel, self.interrupt_policy)?;
        Ok(primitive)
    }
}

impl<B: HardwareBackend + ?Sized + 'static> HardwareController<B> {
    /// Move the sheet on a background thread.
    ///
    /// The request is resolved first, so domain errors are returned here and nothing
    /// is spawned. The move waits for any move already running on this session.
    ///
    /// # Errors
    ///
    /// Domain errors, or `MotionError::SpawnFailed`.
    pub fn move_sheet_async(&self, request: &MotionRequest) -> Result<MotionTask> {
        let primitive = self.resolve(request)?;

        let cancel = CancelToken::new();
        let token = cancel.clone();
        let backend = Arc::clone(&self.backend);
        let motion = Arc::clone(&self.motion);
        let policy = self.interrupt_policy;

        MotionTask::spawn(primitive, cancel, move || {
            let result = run_serialized(&*backend, &motion, &primitive, &token, policy);
            if let Err(e) = &result {
                tracing::warn!(error = %e, "background sheet move failed");
            }
            result
        })
    }
}

/// Run `primitive` under the motion lock and apply the interrupt policy.
fn run_serialized<B: HardwareBackend + ?Sized>(
    backend: &B,
    motion: &Mutex<()>,
    primitive: &MotorPrimitive,
    cancel: &CancelToken,
    policy: InterruptPolicy,
) -> Result<()> {
    let _motion = motion.lock().unwrap_or_else(PoisonError::into_inner);

    let result = if cancel.is_cancelled() {
        Err(MotionError::Interrupted.into())
    } else {
        backend.run_stepper(primitive, cancel)
    };

    match (result, policy) {
        (Err(Error::Motion(MotionError::Interrupted)), InterruptPolicy::Swallow) => {
            tracing::warn!(steps = primitive.steps(), "sheet move interrupted");
            Ok(())
        }
        (result, _) => result,
    }
}
