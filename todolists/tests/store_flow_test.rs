//! Store-level tests against the in-memory API
//!
//! Every test drives the full action → reducer → coordinator → event loop
//! through a real `Store`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use todoflow_api::ApiError;
use todoflow_runtime::Store;
use todoflow_testing::helpers::init_tracing;
use todolists::{
    app_reducer, AppAction, AppReducer, AppState, InMemoryTodolistApi, RequestStatus, TaskPatch,
    TaskPriority, TaskStatus, Todolist, TodolistDomain, TodolistEnvironment, TodolistId,
};

type AppStore = Store<AppState, AppAction, TodolistEnvironment, AppReducer>;

// ============================================================================
// Test Fixtures
// ============================================================================

fn store_with(api: &Arc<InMemoryTodolistApi>, state: AppState) -> AppStore {
    init_tracing();
    Store::new(state, app_reducer(), TodolistEnvironment::new(api.clone()))
}

fn new_store() -> (Arc<InMemoryTodolistApi>, AppStore) {
    let api = Arc::new(InMemoryTodolistApi::new());
    let store = store_with(&api, AppState::default());
    (api, store)
}

async fn dispatch(store: &AppStore, action: AppAction) {
    let mut handle = store.send(action).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(5)).await.unwrap();
}

async fn create_list(store: &AppStore, title: &str) -> TodolistId {
    dispatch(store, AppAction::create_todolist(title).unwrap()).await;
    store
        .state(|s| {
            s.todolists
                .iter()
                .find(|l| l.title == title)
                .map(|l| l.id.clone())
        })
        .await
        .expect("list should have been added")
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn removing_a_list_leaves_the_other() {
    let api = Arc::new(InMemoryTodolistApi::new());
    let state = AppState {
        todolists: vec![
            TodolistDomain::from(list("L1", "What to learn")),
            TodolistDomain::from(list("L2", "What to buy")),
        ],
        tasks: [
            (TodolistId::new("L1"), Vec::new()),
            (TodolistId::new("L2"), Vec::new()),
        ]
        .into(),
        ..AppState::default()
    };
    let store = store_with(&api, state);

    dispatch(&store, AppAction::remove_todolist("L1")).await;

    let ids = store
        .state(|s| s.todolists.iter().map(|l| l.id.clone()).collect::<Vec<_>>())
        .await;
    assert_eq!(ids, vec![TodolistId::new("L2")]);
    assert!(store.state(AppState::is_consistent).await);
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn fetch_creates_a_task_entry_per_list() {
    let api = Arc::new(InMemoryTodolistApi::new());
    let seed = store_with(&api, AppState::default());
    create_list(&seed, "What to learn").await;
    create_list(&seed, "What to buy").await;

    let store = store_with(&api, AppState::default());
    dispatch(&store, AppAction::fetch_todolists()).await;

    let (titles, consistent, status) = store
        .state(|s| {
            (
                s.todolists.iter().map(|l| l.title.clone()).collect::<Vec<_>>(),
                s.is_consistent(),
                s.app.status,
            )
        })
        .await;
    assert_eq!(titles, ["What to buy", "What to learn"]);
    assert!(consistent);
    assert_eq!(status, RequestStatus::Succeeded);
}

#[tokio::test]
async fn create_and_delete_keep_key_sets_equal() {
    let (api, store) = new_store();

    let learn = create_list(&store, "What to learn").await;
    let buy = create_list(&store, "What to buy").await;
    assert!(store.state(AppState::is_consistent).await);

    dispatch(&store, AppAction::delete_todolist(learn.clone())).await;

    let (ids, consistent) = store
        .state(|s| {
            (
                s.todolists.iter().map(|l| l.id.clone()).collect::<Vec<_>>(),
                s.is_consistent(),
            )
        })
        .await;
    assert_eq!(ids, vec![buy]);
    assert!(consistent);
    assert_eq!(api.todolists().len(), 1);
}

#[tokio::test]
async fn tasks_load_and_prepend() {
    let (api, store) = new_store();
    let list_id = create_list(&store, "What to learn").await;

    dispatch(&store, AppAction::create_task(list_id.clone(), "CSS").unwrap()).await;
    dispatch(&store, AppAction::create_task(list_id.clone(), "JS").unwrap()).await;

    let titles = store
        .state(|s| {
            s.tasks[&list_id]
                .iter()
                .map(|t| t.title.clone())
                .collect::<Vec<_>>()
        })
        .await;
    assert_eq!(titles, ["JS", "CSS"]);

    // A fresh client sees the same order from the server
    let fresh = store_with(&api, AppState::default());
    dispatch(&fresh, AppAction::fetch_todolists()).await;
    dispatch(&fresh, AppAction::request_tasks(list_id.clone())).await;
    let loaded = fresh.state(|s| s.tasks[&list_id].clone()).await;
    let local = store.state(|s| s.tasks[&list_id].clone()).await;
    assert_eq!(loaded, local);
}

#[tokio::test]
async fn save_task_sends_full_model_and_applies_patch() {
    let (api, store) = new_store();
    let list_id = create_list(&store, "What to learn").await;
    dispatch(&store, AppAction::create_task(list_id.clone(), "CSS").unwrap()).await;
    let task_id = store.state(|s| s.tasks[&list_id][0].id.clone()).await;

    let patch = TaskPatch {
        priority: Some(TaskPriority::High),
        status: Some(TaskStatus::InProgress),
        ..TaskPatch::default()
    };
    dispatch(&store, AppAction::save_task(list_id.clone(), task_id.clone(), patch)).await;

    let local = store
        .state(|s| s.task(&list_id, &task_id).cloned())
        .await
        .unwrap();
    assert_eq!(local.status, TaskStatus::InProgress);
    assert_eq!(local.priority, TaskPriority::High);
    assert_eq!(local.title, "CSS");

    let remote = api.tasks(&list_id).remove(0);
    assert_eq!(remote, local);
}

#[tokio::test]
async fn api_failure_is_recorded_and_state_kept() {
    let (api, store) = new_store();
    let list_id = create_list(&store, "What to learn").await;
    let before = store.state(AppState::clone).await;

    api.fail_next(ApiError::Status {
        status: 500,
        message: "boom".to_string(),
    });
    dispatch(&store, AppAction::create_task(list_id, "CSS").unwrap()).await;

    let after = store.state(AppState::clone).await;
    assert_eq!(after.todolists, before.todolists);
    assert_eq!(after.tasks, before.tasks);
    assert_eq!(after.app.status, RequestStatus::Failed);
    assert_eq!(
        after.app.error.as_deref(),
        Some("API error (status 500): boom")
    );

    dispatch(&store, AppAction::set_app_error(None)).await;
    assert_eq!(store.state(|s| s.app.error.clone()).await, None);
}

#[tokio::test]
async fn save_of_unknown_task_makes_no_call() {
    let (api, store) = new_store();
    let list_id = create_list(&store, "What to learn").await;
    let calls = api.call_count();

    dispatch(
        &store,
        AppAction::save_task(list_id, "missing", TaskPatch::title("x")),
    )
    .await;

    assert_eq!(api.call_count(), calls);
    let error = store.state(|s| s.app.error.clone()).await.unwrap();
    assert!(error.starts_with("Task missing is not found"));
}

#[tokio::test]
async fn observers_see_coordinator_events() {
    let (_api, store) = new_store();
    let list_id = create_list(&store, "What to learn").await;

    let event = store
        .send_and_wait_for(
            AppAction::create_task(list_id.clone(), "CSS").unwrap(),
            |a| matches!(a, AppAction::AddTask { .. }),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    let AppAction::AddTask { todolist_id, task } = event else {
        panic!("expected ADD-TASK");
    };
    assert_eq!(todolist_id, list_id);
    assert_eq!(task.title, "CSS");

    // The reported event is already applied
    let stored = store.state(|s| s.task(&list_id, &task.id).cloned()).await;
    assert_eq!(stored, Some(task));
}

#[tokio::test]
async fn shutdown_rejects_new_commands() {
    let (_api, store) = new_store();
    store.shutdown(Duration::from_secs(1)).await.unwrap();

    assert!(store.send(AppAction::fetch_todolists()).await.is_err());
}

fn list(id: &str, title: &str) -> Todolist {
    Todolist {
        id: TodolistId::new(id),
        title: title.to_string(),
        added_date: "2025-01-01T00:00:00Z".to_string(),
        order: 0,
    }
}

#[derive(Clone, Debug)]
enum Op {
    Create(String),
    DeleteNth(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[A-Z][a-z]{2,8}".prop_map(Op::Create),
        (0usize..5).prop_map(Op::DeleteNth),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn store_keeps_task_keys_in_step(ops in prop::collection::vec(arb_op(), 1..12)) {
        let consistent = tokio_test::block_on(async {
            let (api, store) = new_store();
            for op in ops {
                match op {
                    Op::Create(title) => {
                        dispatch(&store, AppAction::create_todolist(&title).unwrap()).await;
                    },
                    Op::DeleteNth(n) => {
                        let target = store
                            .state(|s| s.todolists.get(n).map(|l| l.id.clone()))
                            .await;
                        if let Some(id) = target {
                            dispatch(&store, AppAction::delete_todolist(id)).await;
                        }
                    },
                }
            }
            let local = store.state(|s| s.todolists.len()).await;
            store.state(AppState::is_consistent).await && local == api.todolists().len()
        });

        prop_assert!(consistent);
    }
}
