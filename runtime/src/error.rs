//! Errors returned by the store

use thiserror::Error;

/// Why the store refused an action or stopped waiting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `shutdown` has been called; no more actions are accepted
    #[error("store is shutting down")]
    ShuttingDown,

    /// Effects were still running when the shutdown grace period ran out
    #[error("{0} effect(s) still running after the shutdown grace period")]
    EffectsStillRunning(usize),

    /// The caller's deadline passed first
    #[error("timed out waiting on the store")]
    Timeout,

    /// Every store handle is gone, so no further actions can arrive
    #[error("store closed before a matching action arrived")]
    Closed,
}
