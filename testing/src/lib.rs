//! # Todoflow Testing
//!
//! Testing utilities and helpers for todoflow reducers.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - Effect drivers that run a reducer to quiescence without a Store
//! - Property-based testing strategies
//! - Assertion helpers for reducers
//!
//! ## Example
//!
//! ```ignore
//! use todoflow_testing::{helpers, ReducerTest};
//!
//! #[tokio::test]
//! async fn fetch_populates_lists() {
//!     let env = test_environment();
//!     let mut state = AppState::default();
//!
//!     helpers::run_to_completion(&app_reducer(), &mut state, AppAction::FetchTodolists, &env)
//!         .await;
//!
//!     assert_eq!(state.todolists.len(), 2);
//! }
//! ```

use chrono::{DateTime, Utc};
use todoflow_core::environment::Clock;


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todoflow_testing::mocks::FixedClock;
    /// use todoflow_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2);
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Effect drivers for testing reducers without a Store.
pub mod helpers {
    use futures::future::BoxFuture;
    use todoflow_core::{effect::Effect, reducer::Reducer};

    /// Run effects one after another and collect the actions they produce
    pub fn collect_actions<A>(effects: Vec<Effect<A>>) -> BoxFuture<'static, Vec<A>>
    where
        A: Send + 'static,
    {
        Box::pin(async move {
            let mut actions = Vec::new();
            for fut in effects.into_iter().filter_map(Effect::into_future) {
                actions.extend(fut.await);
            }
            actions
        })
    }

    /// Reduce an action and keep feeding produced actions back until no
    /// effects remain
    ///
    /// Returns every action that was reduced, starting with `action`.
    pub async fn run_to_completion<R>(
        reducer: &R,
        state: &mut R::State,
        action: R::Action,
        env: &R::Environment,
    ) -> Vec<R::Action>
    where
        R: Reducer,
        R::Action: Clone + Send + 'static,
    {
        let mut reduced = Vec::new();
        let mut queue = std::collections::VecDeque::from([action]);

        while let Some(next) = queue.pop_front() {
            reduced.push(next.clone());
            let effects = reducer.reduce(state, next, env);
            queue.extend(collect_actions(effects.into_vec()).await);
        }

        reduced
    }

    /// Reduce a sequence of actions and discard their effects
    pub fn reduce_all<R, I>(reducer: &R, state: &mut R::State, actions: I, env: &R::Environment)
    where
        R: Reducer,
        I: IntoIterator<Item = R::Action>,
    {
        for action in actions {
            let _ = reducer.reduce(state, action, env);
        }
    }

    /// Install a test-friendly tracing subscriber
    ///
    /// Safe to call from every test; only the first call installs.
    pub fn init_tracing() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Titles as a user would type them: never blank after trimming
    pub fn arb_title() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ]{0,30}"
    }

    /// Server-style identifiers
    pub fn arb_id() -> impl Strategy<Value = String> {
        "[a-f0-9]{8}"
    }

    /// Strings that are empty or only whitespace
    pub fn arb_blank() -> impl Strategy<Value = String> {
        "[ \t\n]{0,8}"
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock};
