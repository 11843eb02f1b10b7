//! Completion tracking for the effects one action started

use crate::StoreError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Waits for the effects started by one [`Store::send`](crate::Store::send)
///
/// An effect counts as finished once the action it produced has been reduced,
/// so after [`wait`](Self::wait) returns the store state already holds the
/// outcome of the request.
///
/// ```ignore
/// let mut handle = store.send(AppAction::request_tasks(list_id)).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // SET-TASKS (or REQUEST-FAILED) is in state now
/// ```
#[derive(Clone, Debug)]
pub struct EffectHandle {
    running: watch::Receiver<usize>,
}

impl EffectHandle {
    /// A handle with its own counter, and the counter to register effects on
    pub(crate) fn new() -> (Self, InFlight) {
        let (tx, rx) = watch::channel(0);
        (Self { running: rx }, InFlight(Arc::new(tx)))
    }

    /// A handle with nothing to wait for
    #[must_use]
    pub fn completed() -> Self {
        Self::new().0
    }

    /// Effects of this action still running
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.running.borrow()
    }

    /// Wait until every effect of this action has finished
    pub async fn wait(&mut self) {
        // Err means every counter is gone, and with it every effect
        let _ = self.running.wait_for(|running| *running == 0).await;
    }

    /// [`wait`](Self::wait) with a deadline
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running when
    /// `timeout` expires.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

/// Shared count of running effects
#[derive(Clone, Debug)]
pub(crate) struct InFlight(Arc<watch::Sender<usize>>);

impl InFlight {
    /// A counter nobody waits on yet
    pub(crate) fn detached() -> Self {
        Self(Arc::new(watch::channel(0).0))
    }

    /// Count one effect until the returned guard drops
    pub(crate) fn enter(&self) -> InFlightGuard {
        self.0.send_modify(|running| *running += 1);
        InFlightGuard(self.clone())
    }

    pub(crate) fn current(&self) -> usize {
        *self.0.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<usize> {
        self.0.subscribe()
    }
}

/// Releases its slot on drop, also when the effect panicked
#[derive(Debug)]
pub(crate) struct InFlightGuard(InFlight);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0
            .0
            .send_modify(|running| *running = running.saturating_sub(1));
    }
}
