//! Coordinators: one API call, then one resulting action.
//!
//! Each coordinator returns an [`Effect::Future`] for the store to run. A
//! successful call resolves to the event that applies the server's answer; a
//! failed call resolves to [`AppAction::RequestFailed`]. Nothing is retried
//! or rolled back, and concurrent coordinators are not ordered: whichever
//! response arrives last is applied last.

use crate::types::{AppAction, AppState};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use todoflow_api::{ApiError, TaskId, TaskPatch, TodolistApi, TodolistId, UpdateTaskModel};
use todoflow_core::{async_effect, effect::Effect};

/// A coordinator refused to start
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    /// The task to update is not in local state
    #[error("Task {task_id} is not found in todolist {todolist_id}")]
    TaskNotFound {
        /// List that was searched
        todolist_id: TodolistId,
        /// Missing task
        task_id: TaskId,
    },
}

/// Run an API call and turn its outcome into an action
///
/// Every coordinator goes through here so failures are logged and dispatched
/// the same way.
fn guarded<F>(operation: &'static str, call: F) -> Effect<AppAction>
where
    F: Future<Output = Result<AppAction, ApiError>> + Send + 'static,
{
    tracing::debug!(operation, "Starting coordinator");

    async_effect! {
        match call.await {
            Ok(action) => Some(action),
            Err(error) => {
                tracing::error!(operation, %error, "Coordinator failed");
                Some(AppAction::request_failed(operation, error.to_string()))
            },
        }
    }
}

/// Load every todolist, then `SET-TODOLISTS`
#[must_use]
pub fn fetch_todolists(api: Arc<dyn TodolistApi>) -> Effect<AppAction> {
    guarded("fetch_todolists", async move {
        let todolists = api.get_todolists().await?;
        Ok(AppAction::set_todolists(todolists))
    })
}

/// Create a todolist, then `ADD-TODOLIST` with the server record
#[must_use]
pub fn add_todolist(api: Arc<dyn TodolistApi>, title: String) -> Effect<AppAction> {
    guarded("add_todolist", async move {
        let todolist = api.create_todolist(title).await?;
        Ok(AppAction::add_todolist(todolist))
    })
}

/// Delete a todolist, then `REMOVE-TODOLIST`
#[must_use]
pub fn remove_todolist(api: Arc<dyn TodolistApi>, todolist_id: TodolistId) -> Effect<AppAction> {
    guarded("remove_todolist", async move {
        api.delete_todolist(todolist_id.clone()).await?;
        Ok(AppAction::remove_todolist(todolist_id))
    })
}

/// Rename a todolist, then `CHANGE-TODOLIST-TITLE`
#[must_use]
pub fn change_todolist_title(
    api: Arc<dyn TodolistApi>,
    todolist_id: TodolistId,
    title: String,
) -> Effect<AppAction> {
    guarded("change_todolist_title", async move {
        api.update_todolist_title(todolist_id.clone(), title.clone())
            .await?;
        Ok(AppAction::change_todolist_title(todolist_id, title))
    })
}

/// Load the tasks of a list, then `SET-TASKS`
#[must_use]
pub fn request_tasks(api: Arc<dyn TodolistApi>, todolist_id: TodolistId) -> Effect<AppAction> {
    guarded("request_tasks", async move {
        let tasks = api.get_tasks(todolist_id.clone()).await?;
        Ok(AppAction::set_tasks(todolist_id, tasks))
    })
}

/// Create a task, then `ADD-TASK` with the server record
#[must_use]
pub fn add_task(
    api: Arc<dyn TodolistApi>,
    todolist_id: TodolistId,
    title: String,
) -> Effect<AppAction> {
    guarded("add_task", async move {
        let task = api.create_task(todolist_id.clone(), title).await?;
        Ok(AppAction::add_task(todolist_id, task))
    })
}

/// Delete a task, then `REMOVE-TASK`
#[must_use]
pub fn delete_task(
    api: Arc<dyn TodolistApi>,
    todolist_id: TodolistId,
    task_id: TaskId,
) -> Effect<AppAction> {
    guarded("delete_task", async move {
        api.delete_task(todolist_id.clone(), task_id.clone()).await?;
        Ok(AppAction::remove_task(todolist_id, task_id))
    })
}

/// Send the full update model, then `UPDATE-TASK` with only the patch
///
/// The API needs every field, so the patch is laid over the task's current
/// values from `state`.
///
/// # Errors
///
/// Returns [`CoordinatorError::TaskNotFound`] without calling the API if the
/// task is not in `state`.
pub fn update_task(
    api: Arc<dyn TodolistApi>,
    state: &AppState,
    todolist_id: TodolistId,
    task_id: TaskId,
    patch: TaskPatch,
) -> Result<Effect<AppAction>, CoordinatorError> {
    let Some(task) = state.task(&todolist_id, &task_id) else {
        return Err(CoordinatorError::TaskNotFound {
            todolist_id,
            task_id,
        });
    };

    let model = UpdateTaskModel::from_task(task).with_patch(&patch);

    Ok(guarded("update_task", async move {
        api.update_task(todolist_id.clone(), task_id.clone(), model)
            .await?;
        Ok(AppAction::update_task(todolist_id, task_id, patch))
    }))
}
