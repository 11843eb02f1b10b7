//! Records and envelopes of the todolist API
//!
//! Field names follow the API's camelCase JSON. Enumerations are integers on
//! the wire.

use crate::error::{ApiError, UnknownVariant};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a server-issued identifier
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identifier of a todolist, unique across the account
    TodolistId
}

string_id! {
    /// Identifier of a task, unique only within its todolist
    TaskId
}

/// A todolist as the server stores it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todolist {
    /// Server-issued id
    pub id: TodolistId,
    /// Display title
    pub title: String,
    /// Creation timestamp as sent by the server
    #[serde(default, deserialize_with = "null_as_empty")]
    pub added_date: String,
    /// Server-side sort key (display order is vector position)
    #[serde(default)]
    pub order: i64,
}

/// Task workflow status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskStatus {
    /// Not started
    #[default]
    New = 0,
    /// Being worked on
    InProgress = 1,
    /// Done
    Completed = 2,
    /// Not yet committed to
    Draft = 3,
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> Self {
        status as Self
    }
}

impl TryFrom<u8> for TaskStatus {
    type Error = UnknownVariant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::New),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Draft),
            _ => Err(UnknownVariant {
                kind: "task status",
                value,
            }),
        }
    }
}

/// Task priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskPriority {
    /// Lowest
    #[default]
    Low = 0,
    /// Normal
    Middle = 1,
    /// Important
    High = 2,
    /// Drop everything
    Urgently = 3,
    /// Parked
    Later = 4,
}

impl From<TaskPriority> for u8 {
    fn from(priority: TaskPriority) -> Self {
        priority as Self
    }
}

impl TryFrom<u8> for TaskPriority {
    type Error = UnknownVariant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Middle),
            2 => Ok(Self::High),
            3 => Ok(Self::Urgently),
            4 => Ok(Self::Later),
            _ => Err(UnknownVariant {
                kind: "task priority",
                value,
            }),
        }
    }
}

/// A task as the server stores it
///
/// `description`, `startDate` and `deadline` arrive as `null` when unset and
/// are held as empty strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-issued id
    pub id: TaskId,
    /// Display title
    pub title: String,
    /// Free text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Workflow status
    #[serde(default)]
    pub status: TaskStatus,
    /// Priority
    #[serde(default)]
    pub priority: TaskPriority,
    /// Planned start
    #[serde(default, deserialize_with = "null_as_empty")]
    pub start_date: String,
    /// Due date
    #[serde(default, deserialize_with = "null_as_empty")]
    pub deadline: String,
    /// Owning todolist
    #[serde(rename = "todoListId")]
    pub todolist_id: TodolistId,
    /// Server-side sort key
    #[serde(default)]
    pub order: i64,
    /// Creation timestamp as sent by the server
    #[serde(default, deserialize_with = "null_as_empty")]
    pub added_date: String,
}

impl Task {
    /// Overwrite the fields the patch provides and keep the rest
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        let merged = UpdateTaskModel::from_task(self).with_patch(patch);
        self.title = merged.title;
        self.description = merged.description;
        self.status = merged.status;
        self.priority = merged.priority;
        self.start_date = merged.start_date;
        self.deadline = merged.deadline;
    }
}

/// The full update payload `PUT todo-lists/{id}/tasks/{taskId}` requires
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskModel {
    /// Title
    pub title: String,
    /// Free text
    pub description: String,
    /// Workflow status
    pub status: TaskStatus,
    /// Priority
    pub priority: TaskPriority,
    /// Planned start, `null` on the wire when empty
    #[serde(serialize_with = "empty_as_null", deserialize_with = "null_as_empty")]
    pub start_date: String,
    /// Due date, `null` on the wire when empty
    #[serde(serialize_with = "empty_as_null", deserialize_with = "null_as_empty")]
    pub deadline: String,
}

impl UpdateTaskModel {
    /// Copy the updatable fields of a task
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            start_date: task.start_date.clone(),
            deadline: task.deadline.clone(),
        }
    }

    /// Overlay the fields the patch provides
    #[must_use]
    pub fn with_patch(mut self, patch: &TaskPatch) -> Self {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(start_date) = &patch.start_date {
            self.start_date.clone_from(start_date);
        }
        if let Some(deadline) = &patch.deadline {
            self.deadline.clone_from(deadline);
        }
        self
    }
}

/// Partial task update: only the provided fields change
///
/// # Example
///
/// ```
/// use todoflow_api::{TaskPatch, TaskStatus};
///
/// let patch = TaskPatch::status(TaskStatus::Completed);
/// assert_eq!(patch.status, Some(TaskStatus::Completed));
/// assert!(patch.title.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// New priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// New start date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// New deadline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl TaskPatch {
    /// Patch that only changes the status
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Patch that only changes the title
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// True when the patch changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Standard response envelope for mutations
///
/// `data` stays untyped until `resultCode` is known: a rejected create
/// carries `"data": {}` with no `item` in it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T = serde_json::Value> {
    /// `0` on success
    pub result_code: i32,
    /// Human readable messages, usually set on failure
    #[serde(default)]
    pub messages: Vec<String>,
    /// Operation result
    #[serde(default)]
    pub data: T,
}

impl ApiResponse {
    /// Check the result code, then decode `data` as `U`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when `result_code != 0` and
    /// [`ApiError::Parse`] when an accepted payload does not match `U`.
    pub fn into_data<U>(self) -> Result<U, ApiError>
    where
        U: DeserializeOwned,
    {
        let data = self.into_result()?;
        serde_json::from_value(data).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, treating a non-zero result code as a rejection
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when `result_code != 0`.
    pub fn into_result(self) -> Result<T, ApiError> {
        if self.result_code == 0 {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected {
                messages: self.messages,
            })
        }
    }
}

/// `data` of create responses
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData<T> {
    /// The created record
    pub item: T,
}

/// Response of `GET todo-lists/{id}/tasks`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTasksResponse {
    /// Tasks of the list
    pub items: Vec<Task>,
    /// Total number of tasks on the server
    #[serde(default)]
    pub total_count: u32,
    /// Set when the server could not list the tasks
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of requests that only carry a title
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRequest {
    /// The title
    pub title: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[allow(clippy::ptr_arg)] // serde passes the field by reference
fn empty_as_null<S>(value: &String, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_empty() {
        serializer.serialize_none()
    } else {
        serializer.serialize_str(value)
    }
}
