//! Building one root reducer out of slice reducers
//!
//! An application state is a struct of independently owned slices. Each slice
//! gets its own reducer, [`scope_reducer`] points it at its field, and
//! [`combine_reducers`] runs them in a fixed order for every action:
//!
//! ```
//! use std::sync::Arc;
//! use todoflow_core::composition::{combine_reducers, scope_reducer, SharedReducer};
//! use todoflow_core::{Effect, Reducer, SmallVec};
//!
//! #[derive(Clone, Debug)]
//! enum Action {
//!     AddList(String),
//!     Fail(String),
//! }
//!
//! #[derive(Default)]
//! struct State {
//!     lists: Vec<String>,
//!     error: Option<String>,
//! }
//!
//! struct ListsReducer;
//! struct ErrorReducer;
//!
//! impl Reducer for ListsReducer {
//!     type State = Vec<String>;
//!     type Action = Action;
//!     type Environment = ();
//!
//!     fn reduce(&self, lists: &mut Vec<String>, action: Action, _env: &()) -> SmallVec<[Effect<Action>; 4]> {
//!         if let Action::AddList(title) = action {
//!             lists.push(title);
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! impl Reducer for ErrorReducer {
//!     type State = Option<String>;
//!     type Action = Action;
//!     type Environment = ();
//!
//!     fn reduce(&self, error: &mut Option<String>, action: Action, _env: &()) -> SmallVec<[Effect<Action>; 4]> {
//!         if let Action::Fail(message) = action {
//!             *error = Some(message);
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let reducers: Vec<SharedReducer<State, Action, ()>> = vec![
//!     Arc::new(scope_reducer(ListsReducer, |s: &mut State| &mut s.lists)),
//!     Arc::new(scope_reducer(ErrorReducer, |s: &mut State| &mut s.error)),
//! ];
//! let root = combine_reducers(reducers);
//!
//! let mut state = State::default();
//! let _ = root.reduce(&mut state, Action::AddList("What to learn".into()), &());
//! let _ = root.reduce(&mut state, Action::Fail("offline".into()), &());
//! assert_eq!(state.lists, ["What to learn"]);
//! assert_eq!(state.error.as_deref(), Some("offline"));
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::marker::PhantomData;
use std::sync::Arc;

/// A reducer behind an `Arc`, as [`CombinedReducer`] holds them
pub type SharedReducer<S, A, E> =
    Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Run `reducers` in order for every action
///
/// Each reducer gets its own clone of the action. Effects are returned in
/// reducer order.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<SharedReducer<S, A, E>>) -> CombinedReducer<S, A, E> {
    CombinedReducer { reducers }
}

/// Reducers applied one after another to the same state
///
/// Built by [`combine_reducers`]. Clones share the reducers.
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<SharedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E> {
    /// How many reducers run per action
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// True when nothing was combined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Clone for CombinedReducer<S, A, E> {
    fn clone(&self) -> Self {
        Self {
            reducers: self.reducers.clone(),
        }
    }
}

impl<S, A: Clone, E> Reducer for CombinedReducer<S, A, E> {
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(&self, state: &mut S, action: A, env: &E) -> SmallVec<[Effect<A>; 4]> {
        self.reducers
            .iter()
            .flat_map(|reducer| reducer.reduce(state, action.clone(), env))
            .collect()
    }
}

/// Point `reducer` at the field `slice` borrows out of the parent state
pub fn scope_reducer<S, R>(reducer: R, slice: fn(&mut S) -> &mut R::State) -> ScopedReducer<S, R>
where
    R: Reducer,
{
    ScopedReducer {
        reducer,
        slice,
        _parent: PhantomData,
    }
}

/// A slice reducer lifted onto its parent state
///
/// Built by [`scope_reducer`].
pub struct ScopedReducer<S, R: Reducer> {
    reducer: R,
    slice: fn(&mut S) -> &mut R::State,
    _parent: PhantomData<fn(&mut S)>,
}

impl<S, R: Reducer> Reducer for ScopedReducer<S, R> {
    type State = S;
    type Action = R::Action;
    type Environment = R::Environment;

    fn reduce(
        &self,
        state: &mut S,
        action: R::Action,
        env: &R::Environment,
    ) -> SmallVec<[Effect<R::Action>; 4]> {
        self.reducer.reduce((self.slice)(state), action, env)
    }
}
