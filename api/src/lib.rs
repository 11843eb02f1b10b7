//! # Todolist API
//!
//! Data shapes of the todolist REST API, the [`TodolistApi`] contract the
//! state layer's coordinators call, and [`HttpTodolistApi`], its `reqwest`
//! implementation.
//!
//! ## Example
//!
//! ```no_run
//! use todoflow_api::{HttpTodolistApi, TodolistApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = HttpTodolistApi::new(
//!         "https://social-network.samuraijs.com/api/1.1",
//!         "my-api-key",
//!     );
//!
//!     for list in api.get_todolists().await? {
//!         println!("{}: {}", list.id, list.title);
//!     }
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::pin::Pin;

pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use client::HttpTodolistApi;
pub use error::ApiError;
pub use types::{
    ApiResponse, GetTasksResponse, Task, TaskId, TaskPatch, TaskPriority, TaskStatus, Todolist,
    TodolistId, UpdateTaskModel,
};

/// Boxed future returned by [`TodolistApi`] methods
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Remote operations the state layer depends on
///
/// Every call is asynchronous and may fail. Implementations must be
/// `Send + Sync` so coordinators can share one client across spawned effects.
///
/// # Dyn Compatibility
///
/// Methods return [`ApiFuture`] instead of using `async fn` so the trait can be
/// used as `Arc<dyn TodolistApi>` inside effects.
pub trait TodolistApi: Send + Sync {
    /// `GET todo-lists`
    fn get_todolists(&self) -> ApiFuture<'_, Vec<Todolist>>;

    /// `POST todo-lists`, returning the created list
    fn create_todolist(&self, title: String) -> ApiFuture<'_, Todolist>;

    /// `DELETE todo-lists/{id}`
    fn delete_todolist(&self, todolist_id: TodolistId) -> ApiFuture<'_, ()>;

    /// `PUT todo-lists/{id}`
    fn update_todolist_title(&self, todolist_id: TodolistId, title: String)
    -> ApiFuture<'_, ()>;

    /// `GET todo-lists/{id}/tasks`
    fn get_tasks(&self, todolist_id: TodolistId) -> ApiFuture<'_, Vec<Task>>;

    /// `POST todo-lists/{id}/tasks`, returning the created task
    fn create_task(&self, todolist_id: TodolistId, title: String) -> ApiFuture<'_, Task>;

    /// `DELETE todo-lists/{id}/tasks/{taskId}`
    fn delete_task(&self, todolist_id: TodolistId, task_id: TaskId) -> ApiFuture<'_, ()>;

    /// `PUT todo-lists/{id}/tasks/{taskId}` with the full model
    fn update_task(
        &self,
        todolist_id: TodolistId,
        task_id: TaskId,
        model: UpdateTaskModel,
    ) -> ApiFuture<'_, ()>;
}
