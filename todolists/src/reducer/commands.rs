//! Turns commands into coordinator effects.

use crate::coordinators;
use crate::environment::TodolistEnvironment;
use crate::types::{AppAction, AppState};
use crate::validation::validate_title;
use todoflow_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Starts one coordinator per command
///
/// Works on the whole [`AppState`] because `SAVE-TASK` needs the current task
/// to build the full update model. Titles are validated again here, so a
/// command built without its constructor still never reaches the API with a
/// blank title. Events pass through untouched.
#[derive(Clone, Debug, Default)]
pub struct CommandReducer;

impl CommandReducer {
    /// Creates a new `CommandReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validate `title`, recording the error in state when it is refused
    fn checked_title(state: &mut AppState, title: &str) -> Option<String> {
        match validate_title(title) {
            Ok(title) => Some(title),
            Err(error) => {
                tracing::warn!(%error, "Refusing command with invalid title");
                state.app.fail(error.to_string());
                None
            },
        }
    }
}

impl Reducer for CommandReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = TodolistEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let api = env.api.clone();

        let effect = match action {
            AppAction::FetchTodolists => coordinators::fetch_todolists(api),
            AppAction::CreateTodolist { title } => {
                let Some(title) = Self::checked_title(state, &title) else {
                    return SmallVec::new();
                };
                coordinators::add_todolist(api, title)
            },
            AppAction::DeleteTodolist { todolist_id } => {
                coordinators::remove_todolist(api, todolist_id)
            },
            AppAction::RenameTodolist { todolist_id, title } => {
                let Some(title) = Self::checked_title(state, &title) else {
                    return SmallVec::new();
                };
                coordinators::change_todolist_title(api, todolist_id, title)
            },
            AppAction::RequestTasks { todolist_id } => {
                coordinators::request_tasks(api, todolist_id)
            },
            AppAction::CreateTask { todolist_id, title } => {
                let Some(title) = Self::checked_title(state, &title) else {
                    return SmallVec::new();
                };
                coordinators::add_task(api, todolist_id, title)
            },
            AppAction::DeleteTask {
                todolist_id,
                task_id,
            } => coordinators::delete_task(api, todolist_id, task_id),
            AppAction::SaveTask {
                todolist_id,
                task_id,
                patch,
            } => match coordinators::update_task(api, state, todolist_id, task_id, patch) {
                Ok(effect) => effect,
                Err(error) => {
                    tracing::error!(%error, "Cannot save task");
                    state.app.fail(error.to_string());
                    return SmallVec::new();
                },
            },

            // Events are applied by the collection reducers
            AppAction::RemoveTodolist { .. }
            | AppAction::AddTodolist { .. }
            | AppAction::ChangeTodolistTitle { .. }
            | AppAction::ChangeTodolistFilter { .. }
            | AppAction::SetTodolists { .. }
            | AppAction::RemoveTask { .. }
            | AppAction::AddTask { .. }
            | AppAction::UpdateTask { .. }
            | AppAction::SetTasks { .. }
            | AppAction::RequestFailed { .. }
            | AppAction::SetAppError { .. } => return SmallVec::new(),
        };

        smallvec![effect]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::reducer::fixtures::{api_env, test_env};
    use crate::types::RequestStatus;
    use todoflow_api::{TaskPatch, TodolistApi};
    use todoflow_testing::helpers::collect_actions;
    use todoflow_testing::{assertions, ReducerTest};

    #[test]
    fn every_command_starts_one_coordinator() {
        let commands = [
            AppAction::fetch_todolists(),
            AppAction::create_todolist("What to learn").unwrap(),
            AppAction::delete_todolist("L1"),
            AppAction::rename_todolist("L1", "What to buy").unwrap(),
            AppAction::request_tasks("L1"),
            AppAction::create_task("L1", "CSS").unwrap(),
            AppAction::delete_task("L1", "t1"),
        ];

        for command in commands {
            ReducerTest::new(CommandReducer::new())
                .with_env(test_env())
                .given_state(AppState::default())
                .when_action(command)
                .then_state(|state| assert_eq!(*state, AppState::default()))
                .then_effects(assertions::assert_single_request)
                .run();
        }
    }

    #[test]
    fn blank_title_is_refused_without_effect() {
        let command = AppAction::CreateTask {
            todolist_id: "L1".into(),
            title: "   ".to_string(),
        };

        ReducerTest::new(CommandReducer::new())
            .with_env(test_env())
            .given_state(AppState::default())
            .when_action(command)
            .then_state(|state| {
                assert_eq!(state.app.status, RequestStatus::Failed);
                assert_eq!(state.app.error.as_deref(), Some("Title is required"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn save_missing_task_records_error_without_call() {
        let (api, env) = api_env();
        let mut state = AppState::default();

        let effects = CommandReducer::new().reduce(
            &mut state,
            AppAction::save_task("L1", "t1", TaskPatch::title("x")),
            &env,
        );

        assert!(effects.is_empty());
        assert_eq!(
            state.app.error.as_deref(),
            Some("Task t1 is not found in todolist L1")
        );
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn command_effect_reaches_api() {
        let (api, env) = api_env();
        let mut state = AppState::default();

        let effects = CommandReducer::new().reduce(
            &mut state,
            AppAction::create_todolist("What to learn").unwrap(),
            &env,
        );
        let actions = collect_actions(effects.into_vec()).await;

        let lists = api.get_todolists().await.unwrap();
        assert_eq!(actions, vec![AppAction::add_todolist(lists[0].clone())]);
    }

    #[test]
    fn events_pass_through() {
        ReducerTest::new(CommandReducer::new())
            .with_env(test_env())
            .given_state(AppState::default())
            .when_action(AppAction::remove_todolist("L1"))
            .then_state(|state| assert_eq!(*state, AppState::default()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
