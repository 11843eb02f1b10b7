//! Todolist API client implementation

use crate::{
    error::ApiError,
    types::{
        ApiResponse, GetTasksResponse, ItemData, Task, TaskId, TitleRequest, Todolist,
        TodolistId, UpdateTaskModel,
    },
    ApiFuture, TodolistApi,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// Default base URL of the todolist API
pub const DEFAULT_BASE_URL: &str = "https://social-network.samuraijs.com/api/1.1";

/// HTTP client for the todolist API
///
/// Authenticates every request with the `API-KEY` header.
#[derive(Clone)]
pub struct HttpTodolistApi {
    client: Client,
    api_key: String,
    base_url: String,
}

impl HttpTodolistApi {
    /// Create a new client with an explicit base URL and API key
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, api_key)
    }

    /// Create a client whose requests give up after `timeout`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` if the HTTP client cannot be built.
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(Self::with_client(client, base_url, api_key))
    }

    /// Create a client on top of a preconfigured `reqwest::Client`
    #[must_use]
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Send a request and decode a successful body
    async fn execute<T>(&self, operation: &'static str, request: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let start = Instant::now();
        let result = self.execute_inner(request).await;

        metrics::counter!("api_requests_total", "operation" => operation).increment(1);
        metrics::histogram!("api_request_duration_seconds", "operation" => operation)
            .record(start.elapsed().as_secs_f64());

        match &result {
            Ok(_) => tracing::debug!(operation, "Todolist API call succeeded"),
            Err(error) => {
                metrics::counter!("api_failures_total", "operation" => operation).increment(1);
                tracing::warn!(operation, %error, "Todolist API call failed");
            },
        }

        result
    }

    async fn execute_inner<T>(&self, request: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = request
            .header("API-KEY", &self.api_key)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parse(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }

    /// Send a mutation and unwrap its envelope
    ///
    /// `resultCode` is checked before `data` is decoded as `T`.
    async fn mutate<T>(&self, operation: &'static str, request: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let envelope: ApiResponse = self.execute(operation, request).await?;
        let result = envelope.into_data();
        if let Err(error) = &result {
            metrics::counter!("api_failures_total", "operation" => operation).increment(1);
            tracing::warn!(operation, %error, "Todolist API rejected the request");
        }
        result
    }
}

impl std::fmt::Debug for HttpTodolistApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTodolistApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TodolistApi for HttpTodolistApi {
    fn get_todolists(&self) -> ApiFuture<'_, Vec<Todolist>> {
        Box::pin(async move {
            let request = self.client.get(self.url("todo-lists"));
            self.execute("get_todolists", request).await
        })
    }

    fn create_todolist(&self, title: String) -> ApiFuture<'_, Todolist> {
        Box::pin(async move {
            let request = self
                .client
                .post(self.url("todo-lists"))
                .json(&TitleRequest { title });
            let data: ItemData<Todolist> = self.mutate("create_todolist", request).await?;
            Ok(data.item)
        })
    }

    fn delete_todolist(&self, todolist_id: TodolistId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self
                .client
                .delete(self.url(&format!("todo-lists/{todolist_id}")));
            let _: serde_json::Value = self.mutate("delete_todolist", request).await?;
            Ok(())
        })
    }

    fn update_todolist_title(
        &self,
        todolist_id: TodolistId,
        title: String,
    ) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self
                .client
                .put(self.url(&format!("todo-lists/{todolist_id}")))
                .json(&TitleRequest { title });
            let _: serde_json::Value = self.mutate("update_todolist_title", request).await?;
            Ok(())
        })
    }

    fn get_tasks(&self, todolist_id: TodolistId) -> ApiFuture<'_, Vec<Task>> {
        Box::pin(async move {
            let request = self
                .client
                .get(self.url(&format!("todo-lists/{todolist_id}/tasks")));
            let response: GetTasksResponse = self.execute("get_tasks", request).await?;

            match response.error {
                Some(message) => Err(ApiError::Rejected {
                    messages: vec![message],
                }),
                None => Ok(response.items),
            }
        })
    }

    fn create_task(&self, todolist_id: TodolistId, title: String) -> ApiFuture<'_, Task> {
        Box::pin(async move {
            let request = self
                .client
                .post(self.url(&format!("todo-lists/{todolist_id}/tasks")))
                .json(&TitleRequest { title });
            let data: ItemData<Task> = self.mutate("create_task", request).await?;
            Ok(data.item)
        })
    }

    fn delete_task(&self, todolist_id: TodolistId, task_id: TaskId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self
                .client
                .delete(self.url(&format!("todo-lists/{todolist_id}/tasks/{task_id}")));
            let _: serde_json::Value = self.mutate("delete_task", request).await?;
            Ok(())
        })
    }

    fn update_task(
        &self,
        todolist_id: TodolistId,
        task_id: TaskId,
        model: UpdateTaskModel,
    ) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self
                .client
                .put(self.url(&format!("todo-lists/{todolist_id}/tasks/{task_id}")))
                .json(&model);
            // The server echoes the updated task; the caller already knows it.
            let _: serde_json::Value = self.mutate("update_task", request).await?;
            Ok(())
        })
    }
}
