//! Request status tracking.

use crate::environment::TodolistEnvironment;
use crate::types::{AppAction, AppStatus};
use todoflow_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Tracks the progress of API requests in [`AppStatus`]
///
/// Commands start a request, the event a coordinator dispatches on success
/// finishes it, and `REQUEST-FAILED` records the error for the user.
#[derive(Clone, Debug, Default)]
pub struct AppStatusReducer;

impl AppStatusReducer {
    /// Creates a new `AppStatusReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for AppStatusReducer {
    type State = AppStatus;
    type Action = AppAction;
    type Environment = TodolistEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::FetchTodolists
            | AppAction::CreateTodolist { .. }
            | AppAction::DeleteTodolist { .. }
            | AppAction::RenameTodolist { .. }
            | AppAction::RequestTasks { .. }
            | AppAction::CreateTask { .. }
            | AppAction::DeleteTask { .. }
            | AppAction::SaveTask { .. } => state.start(),

            AppAction::RemoveTodolist { .. }
            | AppAction::AddTodolist { .. }
            | AppAction::ChangeTodolistTitle { .. }
            | AppAction::SetTodolists { .. }
            | AppAction::RemoveTask { .. }
            | AppAction::AddTask { .. }
            | AppAction::UpdateTask { .. }
            | AppAction::SetTasks { .. } => state.succeed(),

            AppAction::RequestFailed { operation, error } => {
                tracing::debug!(%operation, "Recording failed request");
                state.fail(error);
            },
            AppAction::SetAppError { error } => state.error = error,

            // Local to the client, no request involved
            AppAction::ChangeTodolistFilter { .. } => {},
        }

        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::fixtures::{list, test_env};
    use crate::types::{FilterValue, RequestStatus};
    use todoflow_testing::{assertions, ReducerTest};

    #[test]
    fn command_then_event_succeeds() {
        ReducerTest::new(AppStatusReducer::new())
            .with_env(test_env())
            .given_state(AppStatus::default())
            .given_actions([AppAction::fetch_todolists()])
            .when_action(AppAction::set_todolists(vec![list("L1", "What to learn")]))
            .then_state(|status| {
                assert_eq!(status.status, RequestStatus::Succeeded);
                assert_eq!(status.error, None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn failure_records_message() {
        ReducerTest::new(AppStatusReducer::new())
            .with_env(test_env())
            .given_state(AppStatus::default())
            .given_actions([AppAction::request_tasks("L1")])
            .when_action(AppAction::request_failed("request_tasks", "Network error"))
            .then_state(|status| {
                assert_eq!(status.status, RequestStatus::Failed);
                assert_eq!(status.error.as_deref(), Some("Network error"));
            })
            .run();
    }

    #[test]
    fn dismissing_error_keeps_status() {
        ReducerTest::new(AppStatusReducer::new())
            .with_env(test_env())
            .given_state(AppStatus::default())
            .given_actions([AppAction::request_failed("add_task", "boom")])
            .when_action(AppAction::set_app_error(None))
            .then_state(|status| {
                assert_eq!(status.status, RequestStatus::Failed);
                assert_eq!(status.error, None);
            })
            .run();
    }

    #[test]
    fn overlapping_requests_stay_loading_until_the_last_settles() {
        ReducerTest::new(AppStatusReducer::new())
            .with_env(test_env())
            .given_state(AppStatus::default())
            .given_actions([
                AppAction::fetch_todolists(),
                AppAction::request_tasks("L1"),
                AppAction::set_todolists(vec![list("L1", "What to learn")]),
            ])
            .when_action(AppAction::set_tasks("L1", vec![]))
            .then_state(|status| {
                assert_eq!(status.status, RequestStatus::Succeeded);
                assert_eq!(status.pending, 0);
            })
            .run();
    }

    #[test]
    fn first_of_two_responses_keeps_loading() {
        ReducerTest::new(AppStatusReducer::new())
            .with_env(test_env())
            .given_state(AppStatus::default())
            .given_actions([AppAction::fetch_todolists(), AppAction::request_tasks("L1")])
            .when_action(AppAction::set_todolists(vec![list("L1", "What to learn")]))
            .then_state(|status| {
                assert_eq!(status.status, RequestStatus::Loading);
                assert_eq!(status.pending, 1);
            })
            .run();
    }

    #[test]
    fn filter_change_is_not_a_request() {
        ReducerTest::new(AppStatusReducer::new())
            .with_env(test_env())
            .given_state(AppStatus::default())
            .when_action(AppAction::change_todolist_filter("L1", FilterValue::Active))
            .then_state(|status| assert_eq!(*status, AppStatus::default()))
            .run();
    }
}
