//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// The block must evaluate to `Option<Action>`; `Some` is fed back into the store.
///
/// # Example
///
/// ```rust,ignore
/// use todoflow_core::async_effect;
///
/// async_effect! {
///     let tasks = api.get_tasks(&todolist_id).await.ok()?;
///     Some(AppAction::SetTasks { todolist_id, tasks: tasks.items })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
