//! Todolist state layer.
//!
//! Users keep several named todolists, each holding tasks. This crate owns the
//! client-side state for them and keeps it in sync with the todolist API:
//!
//! - Two normalized collections: the ordered todolists and a map from list id
//!   to that list's tasks
//! - A closed set of actions (`AppAction`) with pure constructors
//! - Reducers for each collection, plus request status tracking
//! - Coordinators that make one API call and dispatch one resulting action
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todolists::{app_reducer, AppAction, AppState, InMemoryTodolistApi, TodolistEnvironment};
//! use todoflow_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TodolistEnvironment::new(Arc::new(InMemoryTodolistApi::new()));
//! let store = Store::new(AppState::default(), app_reducer(), env);
//!
//! let mut handle = store.send(AppAction::create_todolist("What to learn")?).await?;
//! handle.wait().await;
//!
//! let titles = store
//!     .state(|s| s.todolists.iter().map(|l| l.title.clone()).collect::<Vec<_>>())
//!     .await;
//! assert_eq!(titles, vec!["What to learn".to_string()]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinators;
pub mod environment;
pub mod in_memory;
pub mod reducer;
pub mod selectors;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use coordinators::CoordinatorError;
pub use environment::TodolistEnvironment;
pub use in_memory::InMemoryTodolistApi;
pub use reducer::{
    app_reducer, AppReducer, AppStatusReducer, CommandReducer, TasksReducer, TodolistsReducer,
};
pub use types::{
    AppAction, AppState, AppStatus, FilterValue, RequestStatus, TasksState, TodolistDomain,
};
pub use validation::{validate_title, ValidationError};

pub use todoflow_api::{
    Task, TaskId, TaskPatch, TaskPriority, TaskStatus, Todolist, TodolistApi, TodolistId,
};
