//! Reducers for the todolist state.
//!
//! Each collection has its own reducer over its own slice of [`AppState`].
//! [`app_reducer`] scopes them onto the full state and runs them in a fixed
//! order for every action:
//!
//! 1. [`TodolistsReducer`] on `todolists`
//! 2. [`TasksReducer`] on `tasks`
//! 3. [`AppStatusReducer`] on `app`
//! 4. [`CommandReducer`] on the whole state, producing coordinator effects
//!
//! `ADD-TODOLIST` and `REMOVE-TODOLIST` are handled by the first two in the
//! same dispatch, so the task map never goes out of step with the list
//! collection.

mod commands;
mod status;
mod tasks;
mod todolists;

pub use commands::CommandReducer;
pub use status::AppStatusReducer;
pub use tasks::TasksReducer;
pub use todolists::TodolistsReducer;

use crate::environment::TodolistEnvironment;
use crate::types::{AppAction, AppState};
use std::sync::Arc;
use todoflow_core::composition::{
    combine_reducers, scope_reducer, CombinedReducer, SharedReducer,
};

/// The combined reducer driving an [`AppState`] store
pub type AppReducer = CombinedReducer<AppState, AppAction, TodolistEnvironment>;

/// Build the reducer for the whole application state
#[must_use]
pub fn app_reducer() -> AppReducer {
    let reducers: Vec<SharedReducer<AppState, AppAction, TodolistEnvironment>> = vec![
        Arc::new(scope_reducer(TodolistsReducer::new(), |s: &mut AppState| &mut s.todolists)),
        Arc::new(scope_reducer(TasksReducer::new(), |s: &mut AppState| &mut s.tasks)),
        Arc::new(scope_reducer(AppStatusReducer::new(), |s: &mut AppState| &mut s.app)),
        Arc::new(CommandReducer::new()),
    ];
    combine_reducers(reducers)
}
