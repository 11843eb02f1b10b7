//! Reducer for the ordered todolist collection.

use crate::environment::TodolistEnvironment;
use crate::types::{AppAction, TodolistDomain};
use todoflow_api::TodolistId;
use todoflow_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Applies todolist events to `Vec<TodolistDomain>`
///
/// Never produces effects. Targeted events naming an absent id are no-ops.
#[derive(Clone, Debug, Default)]
pub struct TodolistsReducer;

impl TodolistsReducer {
    /// Creates a new `TodolistsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn find_mut<'a>(
        todolists: &'a mut [TodolistDomain],
        todolist_id: &TodolistId,
    ) -> Option<&'a mut TodolistDomain> {
        todolists.iter_mut().find(|l| &l.id == todolist_id)
    }
}

impl Reducer for TodolistsReducer {
    type State = Vec<TodolistDomain>;
    type Action = AppAction;
    type Environment = TodolistEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::RemoveTodolist { todolist_id } => {
                state.retain(|l| l.id != todolist_id);
            },
            AppAction::AddTodolist { todolist } => {
                state.push(TodolistDomain::from(todolist));
            },
            AppAction::ChangeTodolistTitle { todolist_id, title } => {
                if let Some(list) = Self::find_mut(state, &todolist_id) {
                    list.title = title;
                }
            },
            AppAction::ChangeTodolistFilter {
                todolist_id,
                filter,
            } => {
                if let Some(list) = Self::find_mut(state, &todolist_id) {
                    list.filter = filter;
                }
            },
            AppAction::SetTodolists { todolists } => {
                *state = todolists.into_iter().map(TodolistDomain::from).collect();
            },
            // Task events, status events and commands
            AppAction::RemoveTask { .. }
            | AppAction::AddTask { .. }
            | AppAction::UpdateTask { .. }
            | AppAction::SetTasks { .. }
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
