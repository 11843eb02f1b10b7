//! # Todoflow Runtime
//!
//! The [`Store`] a presentation layer is handed at startup. It owns the
//! application state, applies actions one at a time through the reducer, runs
//! the request effects that commands return, and reduces the events those
//! requests resolve to. There is no global instance.
//!
//! ```ignore
//! use todoflow_runtime::Store;
//!
//! let store = Store::new(AppState::default(), app_reducer(), environment);
//!
//! // Send a command and wait for its request to come back
//! let mut handle = store.send(AppAction::fetch_todolists()).await?;
//! handle.wait().await;
//!
//! let lists = store.state(|s| s.todolists.len()).await;
//! ```

mod error;
mod handle;
mod store;

/// Metrics registration and the Prometheus recorder
pub mod metrics;

pub use error::StoreError;
pub use handle::EffectHandle;
pub use store::{Store, StoreConfig};
