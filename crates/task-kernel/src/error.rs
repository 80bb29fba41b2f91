//! Error types raised by the kernel's public surface.

use thiserror::Error;

/// Misuse of a node's start/stop surface, or of a shared handle.
///
/// None of these are fatal: the offending call is logged and ignored, and the
/// node keeps whatever state it had before.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("start() called on a task which is already running")]
    AlreadyRunning,

    #[error("stop() called on a task which is already stopped")]
    AlreadyStopped,

    #[error("shared task lock was poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, KernelError>;
