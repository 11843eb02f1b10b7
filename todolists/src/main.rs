//! Todolist demo binary
//!
//! Drives the store through a short session: load lists, create a list and a
//! task, complete the task, then delete the list again. Talks to the remote
//! API when `TODOLIST_API_KEY` is set and to the in-memory API otherwise.

use anyhow::Context;
use std::sync::Arc;
use todoflow_api::{HttpTodolistApi, TaskPatch, TaskStatus, TodolistApi};
use todoflow_runtime::{metrics::MetricsRecorder, Store};
use todolists::{
    app_reducer, selectors, AppAction, AppReducer, AppState, Config, InMemoryTodolistApi,
    TodolistEnvironment,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type AppStore = Store<AppState, AppAction, TodolistEnvironment, AppReducer>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate().context("invalid configuration")?;
    tracing::info!(?config, "Configuration loaded");

    let mut recorder = MetricsRecorder::new();
    if config.metrics_enabled {
        recorder.install().context("failed to install metrics recorder")?;
    }

    let api: Arc<dyn TodolistApi> = match &config.api_key {
        Some(key) => {
            tracing::info!(url = %config.api_url, "Using remote todolist API");
            Arc::new(
                HttpTodolistApi::with_timeout(&config.api_url, key, config.request_timeout())
                    .context("failed to build HTTP client")?,
            )
        },
        None => {
            tracing::info!("TODOLIST_API_KEY not set, using in-memory API");
            Arc::new(InMemoryTodolistApi::new())
        },
    };

    let store = Store::new(
        AppState::default(),
        app_reducer(),
        TodolistEnvironment::new(api),
    );

    println!("=== Todolist Demo ===\n");

    dispatch(&store, AppAction::fetch_todolists()).await?;
    let count = store.state(|s| s.todolists.len()).await;
    println!("Loaded {count} todolist(s)");

    dispatch(&store, AppAction::create_todolist("What to learn")?).await?;
    let Some(list_id) = store
        .state(|s| {
            s.todolists
                .iter()
                .rev()
                .find(|l| l.title == "What to learn")
                .map(|l| l.id.clone())
        })
        .await
    else {
        return report_failure(&store).await;
    };
    println!("Created todolist {list_id}");

    dispatch(&store, AppAction::create_task(list_id.clone(), "CSS")?).await?;
    let Some(task_id) = store
        .state(|s| s.tasks.get(&list_id).and_then(|t| t.first()).map(|t| t.id.clone()))
        .await
    else {
        return report_failure(&store).await;
    };
    println!("Created task {task_id}");

    dispatch(
        &store,
        AppAction::save_task(
            list_id.clone(),
            task_id,
            TaskPatch::status(TaskStatus::Completed),
        ),
    )
    .await?;
    let counts = store.state(|s| selectors::task_counts(s, &list_id)).await;
    println!(
        "Tasks: {} total, {} active, {} completed",
        counts.total, counts.active, counts.completed
    );

    dispatch(&store, AppAction::delete_todolist(list_id)).await?;
    let (lists, consistent) = store
        .state(|s| (s.todolists.len(), s.is_consistent()))
        .await;
    println!("After delete: {lists} todolist(s), task map consistent: {consistent}");

    if let Some(error) = store.state(|s| s.app.error.clone()).await {
        println!("Last error: {error}");
    }

    store
        .shutdown(config.shutdown_timeout())
        .await
        .context("store did not shut down cleanly")?;

    if let Some(rendered) = recorder.render() {
        println!("\n=== Metrics ===\n{rendered}");
    }

    Ok(())
}

/// Send an action and wait for the API round trip it starts
async fn dispatch(store: &AppStore, action: AppAction) -> anyhow::Result<()> {
    tracing::debug!(action = action.tag(), "Dispatching");
    let mut handle = store.send(action).await?;
    handle.wait().await;
    Ok(())
}

async fn report_failure(store: &AppStore) -> anyhow::Result<()> {
    let error = store
        .state(|s| s.app.error.clone())
        .await
        .unwrap_or_else(|| "unknown error".to_string());
    anyhow::bail!("request failed: {error}")
}
