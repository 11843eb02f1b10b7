//! Domain types for todolists and tasks.
//!
//! State is kept normalized: an ordered vector of todolists and a map from
//! todolist id to that list's tasks. Every todolist id has exactly one entry in
//! the task map, possibly empty.

use crate::validation::{validate_title, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use todoflow_api::{Task, TaskId, TaskPatch, Todolist, TodolistId};
use todoflow_macros::Action;

/// Which tasks of a list are shown
///
/// Local to the client, never sent to the API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue {
    /// Every task
    #[default]
    All,
    /// Tasks not yet completed
    Active,
    /// Completed tasks only
    Completed,
}

/// A todolist as the client holds it: the server record plus its filter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodolistDomain {
    /// Server-issued id
    pub id: TodolistId,
    /// Display title
    pub title: String,
    /// Current task filter
    pub filter: FilterValue,
    /// Creation timestamp as sent by the server
    pub added_date: String,
    /// Server-side sort key, independent of display order
    pub order: i64,
}

impl From<Todolist> for TodolistDomain {
    fn from(list: Todolist) -> Self {
        Self {
            id: list.id,
            title: list.title,
            filter: FilterValue::All,
            added_date: list.added_date,
            order: list.order,
        }
    }
}

/// Tasks of every todolist, keyed by list id, most recent first
pub type TasksState = HashMap<TodolistId, Vec<Task>>;

/// Progress of the most recent API request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request succeeded
    Succeeded,
    /// The last request failed
    Failed,
}

/// Request status and the error to show, if any
///
/// Every command starts one request and settles it exactly once: with its
/// success event, with `REQUEST-FAILED`, or locally when it is refused before
/// any call. `status` only becomes `Succeeded` once no request is pending, and
/// a failure stays visible until the next request starts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStatus {
    /// Progress of the outstanding requests
    pub status: RequestStatus,
    /// Error message for the user, cleared by dismissing it
    pub error: Option<String>,
    /// Requests started and not yet settled
    #[serde(default)]
    pub pending: u32,
}

impl AppStatus {
    /// Mark a request as started
    pub fn start(&mut self) {
        self.pending = self.pending.saturating_add(1);
        self.status = RequestStatus::Loading;
    }

    /// Settle one request successfully
    pub fn succeed(&mut self) {
        self.pending = self.pending.saturating_sub(1);
        if self.status == RequestStatus::Loading && self.pending == 0 {
            self.status = RequestStatus::Succeeded;
        }
    }

    /// Settle one request with a failure and record its message
    pub fn fail(&mut self, error: impl Into<String>) {
        self.pending = self.pending.saturating_sub(1);
        self.status = RequestStatus::Failed;
        self.error = Some(error.into());
    }
}

/// Complete client state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Todolists in display order
    pub todolists: Vec<TodolistDomain>,
    /// Tasks per todolist
    pub tasks: TasksState,
    /// Request status
    pub app: AppStatus,
}

impl AppState {
    /// Find a todolist by id
    #[must_use]
    pub fn todolist(&self, todolist_id: &TodolistId) -> Option<&TodolistDomain> {
        self.todolists.iter().find(|l| &l.id == todolist_id)
    }

    /// Find a task within a todolist
    #[must_use]
    pub fn task(&self, todolist_id: &TodolistId, task_id: &TaskId) -> Option<&Task> {
        self.tasks
            .get(todolist_id)
            .and_then(|tasks| tasks.iter().find(|t| &t.id == task_id))
    }

    /// True when the task map has exactly one entry per todolist
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let list_ids: HashSet<&TodolistId> = self.todolists.iter().map(|l| &l.id).collect();
        let task_keys: HashSet<&TodolistId> = self.tasks.keys().collect();
        list_ids.len() == self.todolists.len() && list_ids == task_keys
    }
}

/// Every input to the state layer
///
/// Events describe state transitions and are applied by the reducers.
/// Commands start a coordinator: one API call followed by one event. On the
/// wire an action is `{"type": "<TAG>", "payload": {...}}` with the tag
/// returned by [`AppAction::tag`].
#[derive(Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING-KEBAB-CASE",
    rename_all_fields = "camelCase"
)]
pub enum AppAction {
    // ========== Commands ==========
    /// Command: Load all todolists
    #[command]
    FetchTodolists,

    /// Command: Create a todolist on the server
    #[command]
    CreateTodolist {
        /// Title of the new list
        title: String,
    },

    /// Command: Delete a todolist on the server
    #[command]
    DeleteTodolist {
        /// List to delete
        todolist_id: TodolistId,
    },

    /// Command: Rename a todolist on the server
    #[command]
    RenameTodolist {
        /// List to rename
        todolist_id: TodolistId,
        /// New title
        title: String,
    },

    /// Command: Load the tasks of a todolist
    #[command]
    RequestTasks {
        /// List whose tasks to load
        todolist_id: TodolistId,
    },

    /// Command: Create a task on the server
    #[command]
    CreateTask {
        /// Owning list
        todolist_id: TodolistId,
        /// Title of the new task
        title: String,
    },

    /// Command: Delete a task on the server
    #[command]
    DeleteTask {
        /// Owning list
        todolist_id: TodolistId,
        /// Task to delete
        task_id: TaskId,
    },

    /// Command: Send a partial task update to the server
    #[command]
    SaveTask {
        /// Owning list
        todolist_id: TodolistId,
        /// Task to update
        task_id: TaskId,
        /// Fields to change
        patch: TaskPatch,
    },

    // ========== Events ==========
    /// Event: A todolist was removed
    #[event]
    RemoveTodolist {
        /// Removed list
        todolist_id: TodolistId,
    },

    /// Event: A todolist was created
    #[event]
    AddTodolist {
        /// Server record of the new list
        todolist: Todolist,
    },

    /// Event: A todolist was renamed
    #[event]
    ChangeTodolistTitle {
        /// Renamed list
        todolist_id: TodolistId,
        /// New title
        title: String,
    },

    /// Event: The filter of a todolist changed
    #[event]
    ChangeTodolistFilter {
        /// Affected list
        todolist_id: TodolistId,
        /// New filter
        filter: FilterValue,
    },

    /// Event: All todolists were loaded
    #[event]
    SetTodolists {
        /// Server records, in display order
        todolists: Vec<Todolist>,
    },

    /// Event: A task was removed
    #[event]
    RemoveTask {
        /// Owning list
        todolist_id: TodolistId,
        /// Removed task
        task_id: TaskId,
    },

    /// Event: A task was created
    #[event]
    AddTask {
        /// Owning list
        todolist_id: TodolistId,
        /// Server record of the new task
        task: Task,
    },

    /// Event: Some fields of a task changed
    #[event]
    UpdateTask {
        /// Owning list
        todolist_id: TodolistId,
        /// Changed task
        task_id: TaskId,
        /// Fields that changed
        patch: TaskPatch,
    },

    /// Event: The tasks of a list were loaded
    #[event]
    SetTasks {
        /// Owning list
        todolist_id: TodolistId,
        /// Server records, most recent first
        tasks: Vec<Task>,
    },

    /// Event: An API call failed
    #[event]
    RequestFailed {
        /// Coordinator that made the call
        operation: String,
        /// Error message
        error: String,
    },

    /// Event: The displayed error was set or dismissed
    #[event]
    SetAppError {
        /// New error, `None` to dismiss
        error: Option<String>,
    },
}

impl AppAction {
    // ========== Event constructors ==========

    /// `REMOVE-TODOLIST`
    #[must_use]
    pub fn remove_todolist(todolist_id: impl Into<TodolistId>) -> Self {
        Self::RemoveTodolist {
            todolist_id: todolist_id.into(),
        }
    }

    /// `ADD-TODOLIST`
    #[must_use]
    pub const fn add_todolist(todolist: Todolist) -> Self {
        Self::AddTodolist { todolist }
    }

    /// `CHANGE-TODOLIST-TITLE`
    #[must_use]
    pub fn change_todolist_title(
        todolist_id: impl Into<TodolistId>,
        title: impl Into<String>,
    ) -> Self {
        Self::ChangeTodolistTitle {
            todolist_id: todolist_id.into(),
            title: title.into(),
        }
    }

    /// `CHANGE-TODOLIST-FILTER`
    #[must_use]
    pub fn change_todolist_filter(todolist_id: impl Into<TodolistId>, filter: FilterValue) -> Self {
        Self::ChangeTodolistFilter {
            todolist_id: todolist_id.into(),
            filter,
        }
    }

    /// `SET-TODOLISTS`
    #[must_use]
    pub const fn set_todolists(todolists: Vec<Todolist>) -> Self {
        Self::SetTodolists { todolists }
    }

    /// `REMOVE-TASK`
    #[must_use]
    pub fn remove_task(todolist_id: impl Into<TodolistId>, task_id: impl Into<TaskId>) -> Self {
        Self::RemoveTask {
            todolist_id: todolist_id.into(),
            task_id: task_id.into(),
        }
    }

    /// `ADD-TASK`
    #[must_use]
    pub fn add_task(todolist_id: impl Into<TodolistId>, task: Task) -> Self {
        Self::AddTask {
            todolist_id: todolist_id.into(),
            task,
        }
    }

    /// `UPDATE-TASK`
    #[must_use]
    pub fn update_task(
        todolist_id: impl Into<TodolistId>,
        task_id: impl Into<TaskId>,
        patch: TaskPatch,
    ) -> Self {
        Self::UpdateTask {
            todolist_id: todolist_id.into(),
            task_id: task_id.into(),
            patch,
        }
    }

    /// `SET-TASKS`
    #[must_use]
    pub fn set_tasks(todolist_id: impl Into<TodolistId>, tasks: Vec<Task>) -> Self {
        Self::SetTasks {
            todolist_id: todolist_id.into(),
            tasks,
        }
    }

    /// `REQUEST-FAILED`
    #[must_use]
    pub fn request_failed(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self::RequestFailed {
            operation: operation.into(),
            error: error.into(),
        }
    }

    /// `SET-APP-ERROR`
    #[must_use]
    pub const fn set_app_error(error: Option<String>) -> Self {
        Self::SetAppError { error }
    }

    // ========== Command constructors ==========

    /// Load all todolists
    #[must_use]
    pub const fn fetch_todolists() -> Self {
        Self::FetchTodolists
    }

    /// Create a todolist with a validated title
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the title is blank or too long.
    pub fn create_todolist(title: &str) -> Result<Self, ValidationError> {
        Ok(Self::CreateTodolist {
            title: validate_title(title)?,
        })
    }

    /// Delete a todolist
    #[must_use]
    pub fn delete_todolist(todolist_id: impl Into<TodolistId>) -> Self {
        Self::DeleteTodolist {
            todolist_id: todolist_id.into(),
        }
    }

    /// Rename a todolist with a validated title
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the title is blank or too long.
    pub fn rename_todolist(
        todolist_id: impl Into<TodolistId>,
        title: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self::RenameTodolist {
            todolist_id: todolist_id.into(),
            title: validate_title(title)?,
        })
    }

    /// Load the tasks of a todolist
    #[must_use]
    pub fn request_tasks(todolist_id: impl Into<TodolistId>) -> Self {
        Self::RequestTasks {
            todolist_id: todolist_id.into(),
        }
    }

    /// Create a task with a validated title
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the title is blank or too long.
    pub fn create_task(
        todolist_id: impl Into<TodolistId>,
        title: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self::CreateTask {
            todolist_id: todolist_id.into(),
            title: validate_title(title)?,
        })
    }

    /// Delete a task
    #[must_use]
    pub fn delete_task(todolist_id: impl Into<TodolistId>, task_id: impl Into<TaskId>) -> Self {
        Self::DeleteTask {
            todolist_id: todolist_id.into(),
            task_id: task_id.into(),
        }
    }

    /// Send a partial task update
    #[must_use]
    pub fn save_task(
        todolist_id: impl Into<TodolistId>,
        task_id: impl Into<TaskId>,
        patch: TaskPatch,
    ) -> Self {
        Self::SaveTask {
            todolist_id: todolist_id.into(),
            task_id: task_id.into(),
            patch,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(id: &str, title: &str) -> Todolist {
        Todolist {
            id: TodolistId::new(id),
            title: title.to_string(),
            added_date: String::new(),
            order: 0,
        }
    }

    #[test]
    fn domain_list_starts_unfiltered() {
        let domain = TodolistDomain::from(list("L1", "What to learn"));
        assert_eq!(domain.filter, FilterValue::All);
        assert_eq!(domain.title, "What to learn");
    }

    #[test]
    fn app_status_transitions() {
        let mut status = AppStatus::default();
        status.succeed();
        assert_eq!(status.status, RequestStatus::Idle);

        status.start();
        status.succeed();
        assert_eq!(status.status, RequestStatus::Succeeded);

        status.fail("offline");
        assert_eq!(status.status, RequestStatus::Failed);
        assert_eq!(status.error.as_deref(), Some("offline"));
        assert_eq!(status.pending, 0);
    }

    #[test]
    fn app_status_waits_for_every_pending_request() {
        let mut status = AppStatus::default();
        status.start();
        status.start();

        status.succeed();
        assert_eq!(status.status, RequestStatus::Loading);
        assert_eq!(status.pending, 1);

        status.succeed();
        assert_eq!(status.status, RequestStatus::Succeeded);
        assert_eq!(status.pending, 0);
    }

    #[test]
    fn consistency_compares_key_sets() {
        let mut state = AppState::default();
        assert!(state.is_consistent());

        state.todolists.push(list("L1", "a").into());
        assert!(!state.is_consistent());

        state.tasks.insert(TodolistId::new("L1"), Vec::new());
        assert!(state.is_consistent());

        state.tasks.insert(TodolistId::new("L2"), Vec::new());
        assert!(!state.is_consistent());
    }

    #[test]
    fn commands_and_events_are_classified() {
        assert!(AppAction::fetch_todolists().is_command());
        assert!(AppAction::delete_task("L1", "t1").is_command());
        assert!(AppAction::remove_task("L1", "t1").is_event());
        assert!(AppAction::set_app_error(None).is_event());
    }

    #[test]
    fn every_event_tag() {
        let tags = [
            (AppAction::remove_todolist("L1"), "REMOVE-TODOLIST"),
            (AppAction::add_todolist(list("L1", "a")), "ADD-TODOLIST"),
            (AppAction::change_todolist_title("L1", "b"), "CHANGE-TODOLIST-TITLE"),
            (
                AppAction::change_todolist_filter("L1", FilterValue::Active),
                "CHANGE-TODOLIST-FILTER",
            ),
            (AppAction::set_todolists(vec![]), "SET-TODOLISTS"),
            (AppAction::remove_task("L1", "t1"), "REMOVE-TASK"),
            (
                AppAction::update_task("L1", "t1", TaskPatch::default()),
                "UPDATE-TASK",
            ),
            (AppAction::set_tasks("L1", vec![]), "SET-TASKS"),
            (AppAction::request_failed("x", "y"), "REQUEST-FAILED"),
            (AppAction::set_app_error(None), "SET-APP-ERROR"),
        ];

        for (action, tag) in tags {
            assert_eq!(action.tag(), tag);
            let wire = serde_json::to_value(&action).unwrap();
            assert_eq!(wire["type"], tag);
            let back: AppAction = serde_json::from_value(wire).unwrap();
            assert_eq!(back, action);
        }
    }

    #[test]
    fn wire_payload_is_camel_case() {
        let wire = serde_json::to_value(AppAction::remove_task("L1", "t1")).unwrap();
        assert_eq!(
            wire,
            json!({"type": "REMOVE-TASK", "payload": {"todolistId": "L1", "taskId": "t1"}})
        );

        let wire = serde_json::to_value(AppAction::change_todolist_filter(
            "L1",
            FilterValue::Completed,
        ))
        .unwrap();
        assert_eq!(wire["payload"]["filter"], "completed");
    }

    #[test]
    fn validated_command_constructors() {
        assert_eq!(
            AppAction::create_todolist("  New Todolist ").unwrap(),
            AppAction::CreateTodolist {
                title: "New Todolist".to_string()
            }
        );
        assert_eq!(
            AppAction::create_task("L1", "   "),
            Err(ValidationError::TitleRequired)
        );
        assert!(AppAction::rename_todolist("L1", "").is_err());
    }
}
