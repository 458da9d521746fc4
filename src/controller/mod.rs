//! Unit-aware façade over a hardware backend.
//!
//! [`HardwareController`] resolves [`MotionRequest`](crate::motion::MotionRequest)s into
//! motor primitives, serializes moves, and runs them either blocking or on a background
//! [`MotionTask`].

mod global;
mod handle;
mod task;

pub use global::{construct, instance};
pub use handle::HardwareController;
pub use task::MotionTask;
