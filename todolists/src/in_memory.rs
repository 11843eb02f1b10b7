//! In-process todolist API.
//!
//! Behaves like the remote API closely enough for the demo binary and for
//! store-level tests: server-issued uuid ids, newest tasks first, and
//! `resultCode`-style rejections for unknown ids.

use chrono::SecondsFormat;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use todoflow_api::{
    ApiError, ApiFuture, Task, TaskId, TaskPriority, TaskStatus, Todolist, TodolistApi,
    TodolistId, UpdateTaskModel,
};
use todoflow_core::environment::{Clock, SystemClock};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Server {
    todolists: Vec<Todolist>,
    tasks: HashMap<TodolistId, Vec<Task>>,
    fail_next: Option<ApiError>,
    calls: usize,
}

/// In-memory implementation of [`TodolistApi`]
#[derive(Clone)]
pub struct InMemoryTodolistApi {
    server: Arc<Mutex<Server>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTodolistApi {
    /// Create an empty API stamped by the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty API stamped by `clock`
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            server: Arc::new(Mutex::new(Server::default())),
            clock,
        }
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: ApiError) {
        if let Ok(mut server) = self.server.lock() {
            server.fail_next = Some(error);
        }
    }

    /// Number of calls made so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.server.lock().map(|s| s.calls).unwrap_or_default()
    }

    /// Snapshot of the stored todolists
    #[must_use]
    pub fn todolists(&self) -> Vec<Todolist> {
        self.server
            .lock()
            .map(|s| s.todolists.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the stored tasks of a list
    #[must_use]
    pub fn tasks(&self, todolist_id: &TodolistId) -> Vec<Task> {
        self.server
            .lock()
            .ok()
            .and_then(|s| s.tasks.get(todolist_id).cloned())
            .unwrap_or_default()
    }

    fn now(&self) -> String {
        self.clock.now().to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Count the call, consume an injected failure, then run `op`
    fn call<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Server) -> Result<T, ApiError>,
    {
        let mut server = self
            .server
            .lock()
            .map_err(|_| ApiError::Request("in-memory API lock poisoned".to_string()))?;

        server.calls += 1;
        if let Some(error) = server.fail_next.take() {
            return Err(error);
        }

        op(&mut *server)
    }
}

impl Default for InMemoryTodolistApi {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryTodolistApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTodolistApi")
            .field("server", &self.server)
            .finish_non_exhaustive()
    }
}

fn rejected(message: &str) -> ApiError {
    ApiError::Rejected {
        messages: vec![message.to_string()],
    }
}

fn tasks_of<'a>(
    server: &'a mut Server,
    todolist_id: &TodolistId,
) -> Result<&'a mut Vec<Task>, ApiError> {
    server
        .tasks
        .get_mut(todolist_id)
        .ok_or_else(|| rejected("Todolist not found"))
}

impl TodolistApi for InMemoryTodolistApi {
    fn get_todolists(&self) -> ApiFuture<'_, Vec<Todolist>> {
        let result = self.call(|server| Ok(server.todolists.clone()));
        Box::pin(async move { result })
    }

    fn create_todolist(&self, title: String) -> ApiFuture<'_, Todolist> {
        let added_date = self.now();
        let result = self.call(|server| {
            let order = server.todolists.iter().map(|l| l.order).min().unwrap_or(0) - 1;
            let todolist = Todolist {
                id: TodolistId::new(Uuid::new_v4().to_string()),
                title,
                added_date,
                order,
            };
            // New lists come first, as on the real server
            server.todolists.insert(0, todolist.clone());
            server.tasks.insert(todolist.id.clone(), Vec::new());
            Ok(todolist)
        });
        Box::pin(async move { result })
    }

    fn delete_todolist(&self, todolist_id: TodolistId) -> ApiFuture<'_, ()> {
        let result = self.call(|server| {
            let before = server.todolists.len();
            server.todolists.retain(|l| l.id != todolist_id);
            if server.todolists.len() == before {
                return Err(rejected("Todolist not found"));
            }
            server.tasks.remove(&todolist_id);
            Ok(())
        });
        Box::pin(async move { result })
    }

    fn update_todolist_title(&self, todolist_id: TodolistId, title: String) -> ApiFuture<'_, ()> {
        let result = self.call(|server| {
            let list = server
                .todolists
                .iter_mut()
                .find(|l| l.id == todolist_id)
                .ok_or_else(|| rejected("Todolist not found"))?;
            list.title = title;
            Ok(())
        });
        Box::pin(async move { result })
    }

    fn get_tasks(&self, todolist_id: TodolistId) -> ApiFuture<'_, Vec<Task>> {
        let result = self.call(|server| tasks_of(server, &todolist_id).map(|tasks| tasks.clone()));
        Box::pin(async move { result })
    }

    fn create_task(&self, todolist_id: TodolistId, title: String) -> ApiFuture<'_, Task> {
        let added_date = self.now();
        let result = self.call(|server| {
            let tasks = tasks_of(server, &todolist_id)?;
            let order = tasks.iter().map(|t| t.order).min().unwrap_or(0) - 1;
            let task = Task {
                id: TaskId::new(Uuid::new_v4().to_string()),
                title,
                description: String::new(),
                status: TaskStatus::New,
                priority: TaskPriority::Low,
                start_date: String::new(),
                deadline: String::new(),
                todolist_id: todolist_id.clone(),
                order,
                added_date,
            };
            tasks.insert(0, task.clone());
            Ok(task)
        });
        Box::pin(async move { result })
    }

    fn delete_task(&self, todolist_id: TodolistId, task_id: TaskId) -> ApiFuture<'_, ()> {
        let result = self.call(|server| {
            let tasks = tasks_of(server, &todolist_id)?;
            let before = tasks.len();
            tasks.retain(|t| t.id != task_id);
            if tasks.len() == before {
                return Err(rejected("Task not found"));
            }
            Ok(())
        });
        Box::pin(async move { result })
    }

    fn update_task(
        &self,
        todolist_id: TodolistId,
        task_id: TaskId,
        model: UpdateTaskModel,
    ) -> ApiFuture<'_, ()> {
        let result = self.call(|server| {
            let task = tasks_of(server, &todolist_id)?
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| rejected("Task not found"))?;

            task.title = model.title;
            task.description = model.description;
            task.status = model.status;
            task.priority = model.priority;
            task.start_date = model.start_date;
            task.deadline = model.deadline;
            Ok(())
        });
        Box::pin(async move { result })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use todoflow_testing::test_clock;

    fn api() -> InMemoryTodolistApi {
        InMemoryTodolistApi::with_clock(Arc::new(test_clock()))
    }

    #[tokio::test]
    async fn created_lists_come_first_with_empty_tasks() {
        let api = api();
        let first = api.create_todolist("What to learn".to_string()).await.unwrap();
        let second = api.create_todolist("What to buy".to_string()).await.unwrap();

        let lists = api.get_todolists().await.unwrap();
        assert_eq!(lists, vec![second.clone(), first]);
        assert!(second.order < 0);
        assert_eq!(second.added_date, "2025-01-01T00:00:00Z");
        assert!(api.get_tasks(second.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_ids_are_rejected() {
        let api = api();
        let error = api
            .delete_task(TodolistId::new("L1"), TaskId::new("t1"))
            .await
            .unwrap_err();
        assert_eq!(error, rejected("Todolist not found"));
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let api = api();
        api.fail_next(ApiError::Unauthorized);

        assert_eq!(api.get_todolists().await.unwrap_err(), ApiError::Unauthorized);
        assert!(api.get_todolists().await.is_ok());
        assert_eq!(api.call_count(), 2);
    }

    #[tokio::test]
    async fn update_replaces_all_model_fields() {
        let api = api();
        let list = api.create_todolist("L".to_string()).await.unwrap();
        let task = api
            .create_task(list.id.clone(), "CSS".to_string())
            .await
            .unwrap();

        let mut model = UpdateTaskModel::from_task(&task);
        model.priority = TaskPriority::Urgently;
        model.deadline = "2025-02-01".to_string();
        api.update_task(list.id.clone(), task.id.clone(), model)
            .await
            .unwrap();

        let stored = &api.tasks(&list.id)[0];
        assert_eq!(stored.priority, TaskPriority::Urgently);
        assert_eq!(stored.deadline, "2025-02-01");
        assert_eq!(stored.title, "CSS");
    }
}
