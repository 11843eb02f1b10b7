//! Read-only views over [`AppState`] for the presentation layer.

use crate::types::{AppState, FilterValue};
use todoflow_api::{Task, TaskStatus, TodolistId};

/// Whether `task` is shown under `filter`
#[must_use]
pub fn matches_filter(task: &Task, filter: FilterValue) -> bool {
    match filter {
        FilterValue::All => true,
        FilterValue::Active => task.status != TaskStatus::Completed,
        FilterValue::Completed => task.status == TaskStatus::Completed,
    }
}

/// Tasks of a list as its current filter shows them, most recent first
///
/// Empty when the list is unknown.
#[must_use]
pub fn visible_tasks<'a>(state: &'a AppState, todolist_id: &TodolistId) -> Vec<&'a Task> {
    let Some(list) = state.todolist(todolist_id) else {
        return Vec::new();
    };

    state
        .tasks
        .get(todolist_id)
        .map(|tasks| {
            tasks
                .iter()
                .filter(|t| matches_filter(t, list.filter))
                .collect()
        })
        .unwrap_or_default()
}

/// Task counts of one list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskCounts {
    /// Every task
    pub total: usize,
    /// Not completed
    pub active: usize,
    /// Completed
    pub completed: usize,
}

/// Count the tasks of a list
#[must_use]
pub fn task_counts(state: &AppState, todolist_id: &TodolistId) -> TaskCounts {
    let tasks = state.tasks.get(todolist_id).map_or(&[][..], Vec::as_slice);
    let completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();

    TaskCounts {
        total: tasks.len(),
        active: tasks.len() - completed,
        completed,
    }
}
