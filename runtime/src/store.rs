//! The store: one state value, one reducer, and the effect feedback loop

use crate::handle::{EffectHandle, InFlight};
use crate::StoreError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use todoflow_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{broadcast, RwLock};

/// Store tuning
///
/// ```
/// use std::time::Duration;
/// use todoflow_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Effect-produced actions kept for observers that fall behind
    pub broadcast_capacity: usize,
    /// Grace period callers use for [`Store::shutdown`] unless they pick one
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Change how many actions a slow observer may lag behind
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Change the default shutdown grace period
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            default_shutdown_timeout: Duration::from_secs(5),
        }
    }
}

struct Shared<S, A, E, R> {
    state: RwLock<S>,
    reducer: R,
    env: E,
    config: StoreConfig,
    closing: AtomicBool,
    effects: InFlight,
    applied: broadcast::Sender<A>,
}

/// Single owner of the client state
///
/// Every write goes through [`send`](Self::send), which runs the reducer under
/// the state write lock, so actions are applied strictly one at a time. Reads
/// go through [`state`](Self::state). Clones share the same state.
pub struct Store<S, A, E, R> {
    shared: Arc<Shared<S, A, E, R>>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Store with the default [`StoreConfig`]
    #[must_use]
    pub fn new(state: S, reducer: R, env: E) -> Self {
        Self::with_config(state, reducer, env, StoreConfig::default())
    }

    /// Store with an explicit [`StoreConfig`]
    #[must_use]
    pub fn with_config(state: S, reducer: R, env: E, config: StoreConfig) -> Self {
        let (applied, _) = broadcast::channel(config.broadcast_capacity.max(1));
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(state),
                reducer,
                env,
                config,
                closing: AtomicBool::new(false),
                effects: InFlight::detached(),
                applied,
            }),
        }
    }

    /// Configuration the store was built with
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    /// Effects running across all actions
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.shared.effects.current()
    }

    /// Reduce `action` and start the effects it returns
    ///
    /// Returns as soon as the effects are spawned. Use the [`EffectHandle`] to
    /// wait for them. Effects of different actions finish in no particular
    /// order, and nothing is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShuttingDown`] after [`shutdown`](Self::shutdown).
    #[tracing::instrument(skip_all, name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.shared.closing.load(Ordering::Acquire) {
            tracing::warn!("Store is shutting down, action rejected");
            metrics::counter!("store_shutdown_rejected_actions_total").increment(1);
            return Err(StoreError::ShuttingDown);
        }
        metrics::counter!("store_actions_total").increment(1);

        let effects = {
            let mut state = self.shared.state.write().await;
            let started = Instant::now();
            let effects = self.shared.reducer.reduce(&mut *state, action, &self.shared.env);
            metrics::histogram!("store_reducer_duration_seconds")
                .record(started.elapsed().as_secs_f64());
            effects
        };

        #[allow(clippy::cast_precision_loss)]
        metrics::histogram!("store_effects_count").record(effects.len() as f64);
        tracing::trace!(effects = effects.len(), "Action reduced");

        let (handle, in_flight) = EffectHandle::new();
        for effect in effects {
            self.spawn_effect(effect, &in_flight);
        }
        Ok(handle)
    }

    /// Send `action` and wait for the first effect-produced action matching
    /// `predicate`
    ///
    /// The returned action has already been reduced, so [`state`](Self::state)
    /// reflects it.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ShuttingDown`]: the store no longer accepts actions
    /// - [`StoreError::Timeout`]: nothing matched within `timeout`
    /// - [`StoreError::Closed`]: the action channel closed
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        // Subscribe first so a fast effect cannot slip past
        let mut applied = self.subscribe_actions();
        self.send(action).await?;

        let matching = async {
            loop {
                match applied.recv().await {
                    Ok(action) if predicate(&action) => break Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Observer lagged behind the store");
                    },
                    Err(broadcast::error::RecvError::Closed) => break Err(StoreError::Closed),
                }
            }
        };
        tokio::time::timeout(timeout, matching)
            .await
            .map_err(|_| StoreError::Timeout)?
    }

    /// Receive every action an effect produced, after it has been reduced
    ///
    /// Actions passed to [`send`](Self::send) directly are not repeated here.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.shared.applied.subscribe()
    }

    /// Read the state through `f`
    ///
    /// ```ignore
    /// let lists = store.state(|s| s.todolists.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&*self.shared.state.read().await)
    }

    /// Stop accepting actions and wait for running effects to finish
    ///
    /// Running effects finish their request, but the actions they produce
    /// from now on are dropped instead of reduced.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EffectsStillRunning`] if effects outlive
    /// `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!(?timeout, "Store shutting down");
        metrics::counter!("store_shutdown_initiated_total").increment(1);
        self.shared.closing.store(true, Ordering::Release);

        let mut running = self.shared.effects.subscribe();
        let drained = tokio::time::timeout(timeout, running.wait_for(|n| *n == 0))
            .await
            .is_ok();

        if drained {
            tracing::info!("Store shut down cleanly");
            metrics::counter!("store_shutdown_completed_total").increment(1);
            return Ok(());
        }

        let left = self.pending_effects();
        tracing::error!(effects = left, "Store shutdown timed out");
        metrics::counter!("store_shutdown_timeout_total").increment(1);
        Err(StoreError::EffectsStillRunning(left))
    }

    fn spawn_effect(&self, effect: Effect<A>, in_flight: &InFlight) {
        let Some(fut) = effect.into_future() else {
            metrics::counter!("store_effects_executed_total", "type" => "none").increment(1);
            return;
        };
        metrics::counter!("store_effects_executed_total", "type" => "future").increment(1);

        // Held until the produced action is reduced
        let guards = (in_flight.enter(), self.shared.effects.enter());
        let store = self.clone();

        tokio::spawn(async move {
            let _guards = guards;
            let Some(action) = fut.await else {
                tracing::trace!("Effect finished without an action");
                return;
            };
            match store.send(action.clone()).await {
                Ok(_) => {
                    let _ = store.shared.applied.send(action);
                },
                Err(error) => tracing::warn!(%error, "Dropped action produced by effect"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoflow_core::{smallvec, SmallVec};

    #[derive(Debug, Clone, PartialEq)]
    enum ListAction {
        Create(String),
        Created(String),
        CreateNothing,
        CreateSlowly(String),
        Clear,
    }

    #[derive(Debug)]
    struct ListReducer;

    impl Reducer for ListReducer {
        type State = Vec<String>;
        type Action = ListAction;
        type Environment = ();

        fn reduce(
            &self,
            titles: &mut Vec<String>,
            action: ListAction,
            _env: &(),
        ) -> SmallVec<[Effect<ListAction>; 4]> {
            match action {
                ListAction::Create(title) => smallvec![Effect::Future(Box::pin(async move {
                    tokio::task::yield_now().await;
                    Some(ListAction::Created(title))
                }))],
                ListAction::CreateSlowly(title) => smallvec![Effect::Future(Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    Some(ListAction::Created(title))
                }))],
                ListAction::Created(title) => {
                    titles.push(title);
                    SmallVec::new()
                },
                ListAction::CreateNothing => smallvec![Effect::Future(Box::pin(async { None }))],
                ListAction::Clear => {
                    titles.clear();
                    smallvec![Effect::None]
                },
            }
        }
    }

    type ListStore = Store<Vec<String>, ListAction, (), ListReducer>;

    fn store() -> ListStore {
        Store::new(Vec::new(), ListReducer, ())
    }

    async fn titles(store: &ListStore) -> Vec<String> {
        store.state(Vec::clone).await
    }

    #[tokio::test]
    async fn events_apply_immediately() -> Result<(), StoreError> {
        let store = store();
        let _ = store.send(ListAction::Created("What to learn".into())).await?;

        assert_eq!(titles(&store).await, ["What to learn"]);
        Ok(())
    }

    #[tokio::test]
    async fn handle_covers_the_fed_back_action() -> Result<(), StoreError> {
        let store = store();
        let mut handle = store.send(ListAction::Create("What to buy".into())).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        assert_eq!(titles(&store).await, ["What to buy"]);
        assert_eq!(handle.pending(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_commands_all_land() -> Result<(), StoreError> {
        let store = store();
        let mut first = store.send(ListAction::Create("a".into())).await?;
        let mut second = store.send(ListAction::Create("b".into())).await?;
        first.wait_with_timeout(Duration::from_secs(1)).await?;
        second.wait_with_timeout(Duration::from_secs(1)).await?;

        let mut all = titles(&store).await;
        all.sort();
        assert_eq!(all, ["a", "b"]);
        assert_eq!(store.pending_effects(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn effect_without_action_completes() -> Result<(), StoreError> {
        let store = store();
        let mut handle = store.send(ListAction::CreateNothing).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        assert!(titles(&store).await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn matched_action_is_already_in_state() -> Result<(), StoreError> {
        let store = store();
        let action = store
            .send_and_wait_for(
                ListAction::Create("reply".into()),
                |a| matches!(a, ListAction::Created(_)),
                Duration::from_secs(1),
            )
            .await?;

        assert_eq!(action, ListAction::Created("reply".into()));
        assert_eq!(titles(&store).await, ["reply"]);
        Ok(())
    }

    #[tokio::test]
    async fn observers_only_see_effect_actions() -> Result<(), StoreError> {
        let store = store();
        let mut rx = store.subscribe_actions();

        let _ = store.send(ListAction::Clear).await?;
        let mut handle = store.send(ListAction::Create("seen".into())).await?;
        handle.wait().await;

        assert_eq!(rx.try_recv().ok(), Some(ListAction::Created("seen".into())));
        assert!(rx.try_recv().is_err());
        Ok(())
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() -> Result<(), StoreError> {
        let store = store();
        store.shutdown(Duration::from_secs(1)).await?;

        let result = store.send(ListAction::Clear).await;
        assert!(matches!(result, Err(StoreError::ShuttingDown)));
        Ok(())
    }

    #[tokio::test]
    async fn shutdown_reports_effects_that_outlive_the_grace_period() -> Result<(), StoreError> {
        let store = store();
        let _ = store.send(ListAction::CreateSlowly("late".into())).await?;

        let result = store.shutdown(Duration::from_millis(10)).await;
        assert_eq!(result, Err(StoreError::EffectsStillRunning(1)));
        Ok(())
    }

    #[test]
    fn config_builders() {
        let config = StoreConfig::default()
            .with_broadcast_capacity(4)
            .with_shutdown_timeout(Duration::from_secs(2));
        assert_eq!(config.default_shutdown_timeout, Duration::from_secs(2));

        let store = Store::with_config(Vec::new(), ListReducer, (), config);
        assert_eq!(store.config().broadcast_capacity, 4);
        assert_eq!(store.pending_effects(), 0);
    }
}
