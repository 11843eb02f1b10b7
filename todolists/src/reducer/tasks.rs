//! Reducer for the per-list task map.
//!
//! Reacts to todolist events too, so the map always has exactly one entry per
//! todolist. Task events naming a list that is not in the map are logged and
//! dropped; they never create an entry.

use crate::environment::TodolistEnvironment;
use crate::types::{AppAction, TasksState};
use todoflow_api::{Task, TodolistId};
use todoflow_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Applies task and todolist events to [`TasksState`]
#[derive(Clone, Debug, Default)]
pub struct TasksReducer;

impl TasksReducer {
    /// Creates a new `TasksReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn tasks_mut<'a>(
        state: &'a mut TasksState,
        todolist_id: &TodolistId,
        tag: &'static str,
    ) -> Option<&'a mut Vec<Task>> {
        let tasks = state.get_mut(todolist_id);
        if tasks.is_none() {
            tracing::warn!(%todolist_id, action = tag, "Todolist has no task entry, ignoring");
        }
        tasks
    }
}

impl Reducer for TasksReducer {
    type State = TasksState;
    type Action = AppAction;
    type Environment = TodolistEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::RemoveTask {
                todolist_id,
                task_id,
            } => {
                if let Some(tasks) = Self::tasks_mut(state, &todolist_id, "REMOVE-TASK") {
                    tasks.retain(|t| t.id != task_id);
                }
            },
            AppAction::AddTask { todolist_id, task } => {
                if let Some(tasks) = Self::tasks_mut(state, &todolist_id, "ADD-TASK") {
                    tasks.insert(0, task);
                }
            },
            AppAction::UpdateTask {
                todolist_id,
                task_id,
                patch,
            } => {
                if let Some(tasks) = Self::tasks_mut(state, &todolist_id, "UPDATE-TASK") {
                    if let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) {
                        task.apply_patch(&patch);
                    }
                }
            },
            AppAction::SetTasks { todolist_id, tasks } => {
                if let Some(existing) = Self::tasks_mut(state, &todolist_id, "SET-TASKS") {
                    *existing = tasks;
                }
            },
            AppAction::AddTodolist { todolist } => {
                state.insert(todolist.id, Vec::new());
            },
            AppAction::RemoveTodolist { todolist_id } => {
                state.remove(&todolist_id);
            },
            AppAction::SetTodolists { todolists } => {
                // A fresh list load starts every list empty
                *state = todolists.into_iter().map(|l| (l.id, Vec::new())).collect();
            },
            // Todolist-only events, status events and commands
            AppAction::ChangeTodolistTitle { .. }
            | AppAction::ChangeTodolistFilter { .. }
            | AppAction::RequestFailed { .. }
            | AppAction::SetAppError { .. }
            | AppAction::FetchTodolists
            | AppAction::CreateTodolist { .. }
            | AppAction::DeleteTodolist { .. }
            | AppAction::RenameTodolist { .. }
            | AppAction::RequestTasks { .. }
            | AppAction::CreateTask { .. }
            | AppAction::DeleteTask { .. }
            | AppAction::SaveTask { .. } => {},
        }

        SmallVec::new()
    }
}
