//! # Todoflow Core
//!
//! Core traits and types for the todoflow state architecture.
//!
//! This crate provides the abstractions a client-side state layer is built
//! from: reducers that own a slice of state, effects that describe the work a
//! reducer wants done, and the environment traits effects are allowed to use.
//!
//! A store owns one state value. Commands reach the reducer, which validates
//! them and returns an effect that calls the API. The effect resolves to an
//! event, the event is reduced into state, and the cycle ends there.
//!
//! ## Example
//!
//! ```ignore
//! use todoflow_core::*;
//!
//! #[derive(Clone, Debug, Default)]
//! struct ListState {
//!     titles: Vec<String>,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum ListAction {
//!     Add { title: String },
//! }
//!
//! impl Reducer for ListReducer {
//!     type State = ListState;
//!     type Action = ListAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut ListState,
//!         action: ListAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<ListAction>; 4]> {
//!         match action {
//!             ListAction::Add { title } => state.titles.push(title),
//!         }
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

pub use effect::Effect;
pub use reducer::Reducer;

/// Reducer composition utilities
pub mod composition;

/// Declarative macros for building effects
mod effect_macros;

/// The reducer contract
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// Applies one action to one slice of state
    ///
    /// A reducer is total over its action type: actions it has no business
    /// with leave the state as it was and return no effects. It never
    /// performs I/O itself. Work that has to leave the process (an API call)
    /// is returned as an [`Effect`] and run by the store.
    pub trait Reducer {
        /// The slice of state this reducer owns
        type State;

        /// Every input, commands and events alike
        type Action;

        /// Collaborators effects may use, such as the API client
        type Environment;

        /// Apply `action` to `state`, returning the effects to run next
        ///
        /// A command usually returns one effect and an event none.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// A reducer never performs I/O. A command's reducer returns one
/// [`Effect::Future`] that makes the API call and resolves to the event the
/// store feeds back; events return no effects at all.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Boxed future an effect runs to completion
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Async work whose `Some(action)` is fed back into the reducer
        Future(EffectFuture<Action>),
    }

    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Returns true for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// Take the future out of an [`Effect::Future`]
        #[must_use]
        pub fn into_future(self) -> Option<EffectFuture<Action>> {
            match self {
                Effect::None => None,
                Effect::Future(fut) => Some(fut),
            }
        }
    }
}

/// Collaborators shared by environments
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Source of timestamps, swapped for a fixed clock in tests
    ///
    /// ```
    /// use todoflow_core::environment::{Clock, SystemClock};
    ///
    /// let _now = SystemClock.now();
    /// ```
    pub trait Clock: Send + Sync {
        /// The current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
