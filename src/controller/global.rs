//! Process-wide controller for applications that wire hardware up in one place.

use std::sync::{Mutex, PoisonError};

use crate::config::HardwareConfig;
use crate::error::Result;

use super::handle::HardwareController;

static INSTANCE: Mutex<Option<(HardwareConfig, HardwareController)>> = Mutex::new(None);

/// Get the process-wide controller, opening it on first use.
///
/// The first successful call decides the configuration. Later calls return a handle to
/// the same session whatever they pass; a differing configuration is logged and
/// ignored. A failed first call leaves nothing behind, so it can be retried.
///
/// # Errors
///
/// See [`HardwareController::from_config`].
pub fn construct(config: &HardwareConfig) -> Result<HardwareController> {
    let mut slot = INSTANCE.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some((first, controller)) = slot.as_ref() {
        if first != config {
            tracing::warn!(
                requested = ?config.backend,
                active = ?first.backend,
                "hardware controller already constructed; ignoring new configuration"
            );
        }
        return Ok(controller.clone());
    }

    let controller = HardwareController::from_config(config)?;
    *slot = Some((config.clone(), controller.clone()));
    tracing::info!(backend = ?config.backend, "hardware controller constructed");
    Ok(controller)
}

/// The process-wide controller, if [`construct`] has succeeded.
pub fn instance() -> Option<HardwareController> {
    INSTANCE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(|(_, controller)| controller.clone())
}
