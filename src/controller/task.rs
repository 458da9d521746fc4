//! Handle to a sheet move running on a background thread.

use std::thread::{self, JoinHandle};

use crate::backend::CancelToken;
use crate::error::{MotionError, Result};
use crate::motion::MotorPrimitive;

const WORKER_NAME: &str = "sheet-motion";

/// A background sheet move.
///
/// Dropping the task detaches it: the move still runs to completion but its result is
/// only visible in the log. Call [`join`](Self::join) to observe it.
#[derive(Debug)]
#[must_use = "the move keeps running unobserved; call `join` or `detach`"]
pub struct MotionTask {
    handle: JoinHandle<Result<()>>,
    cancel: CancelToken,
    primitive: MotorPrimitive,
}

impl MotionTask {
    pub(crate) fn spawn<F>(primitive: MotorPrimitive, cancel: CancelToken, work: F) -> Result<Self>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(WORKER_NAME.into())
            .spawn(work)
            .map_err(|e| {
                tracing::error!(error = %e, "failed to spawn motion worker");
                MotionError::SpawnFailed
            })?;

        Ok(Self {
            handle,
            cancel,
            primitive,
        })
    }

    /// The primitive being executed.
    pub fn primitive(&self) -> &MotorPrimitive {
        &self.primitive
    }

    /// Token that interrupts this move.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Ask the move to stop at its next hold slice. The driver is disabled before the
    /// worker exits.
    pub fn cancel(&self) {
        tracing::debug!("cancelling background move");
        self.cancel.cancel();
    }

    /// Whether the worker has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the move and return its result.
    ///
    /// # Errors
    ///
    /// Whatever the move returned, or `MotionError::WorkerPanicked`.
    pub fn join(self) -> Result<()> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("motion worker panicked");
                Err(MotionError::WorkerPanicked.into())
            }
        }
    }

    /// Let the move finish without observing it.
    pub fn detach(self) {
        drop(self.handle);
    }
}
