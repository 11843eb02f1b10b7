//! Dependencies injected into the reducers.

use std::sync::Arc;
use todoflow_api::TodolistApi;

/// Environment for the todolist reducers
///
/// Coordinators clone the API handle into the effects they build.
#[derive(Clone)]
pub struct TodolistEnvironment {
    /// Remote todolist API
    pub api: Arc<dyn TodolistApi>,
}

impl TodolistEnvironment {
    /// Creates a new `TodolistEnvironment`
    #[must_use]
    pub fn new(api: Arc<dyn TodolistApi>) -> Self {
        Self { api }
    }
}

impl std::fmt::Debug for TodolistEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodolistEnvironment").finish_non_exhaustive()
    }
}
