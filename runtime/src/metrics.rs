//! Prometheus metrics for the store and the todolist API client.
//!
//! Metric collection is opt-in: until [`MetricsRecorder::install`] runs, the
//! `metrics` macros used throughout the workspace are no-ops.
//!
//! # Example
//!
//! ```rust,no_run
//! use todoflow_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), todoflow_runtime::metrics::MetricsError> {
//! let mut recorder = MetricsRecorder::new();
//! recorder.install()?;
//!
//! // ... run the store ...
//!
//! if let Some(text) = recorder.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Process-wide Prometheus recorder.
///
/// Rendering is in-process; the text can be logged or served by whatever
/// surface embeds the store.
#[derive(Default)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl MetricsRecorder {
    /// Create a recorder that has not been installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Describe all metrics and install the global Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// Only one recorder can be installed per process. A second call logs a
    /// warning and leaves this recorder without a handle.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Prometheus metrics recorder installed");
                Ok(())
            },
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            },
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns `None` if this recorder was never installed.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Store
    describe_counter!("store_actions_total", "Total number of actions sent to the store");
    describe_histogram!(
        "store_reducer_duration_seconds",
        "Time taken by the reducer for one action"
    );
    describe_histogram!("store_effects_count", "Number of effects returned per action");
    describe_counter!(
        "store_effects_executed_total",
        "Total number of effects executed, by type"
    );
    describe_counter!(
        "store_shutdown_rejected_actions_total",
        "Actions rejected because the store was shutting down"
    );
    describe_counter!("store_shutdown_initiated_total", "Shutdowns started");
    describe_counter!("store_shutdown_completed_total", "Shutdowns that drained all effects");
    describe_counter!(
        "store_shutdown_timeout_total",
        "Shutdowns that gave up with effects still running"
    );

    // Todolist API
    describe_counter!("api_requests_total", "Total number of todolist API requests");
    describe_counter!("api_failures_total", "Total number of failed todolist API requests");
    describe_histogram!(
        "api_request_duration_seconds",
        "Time taken by todolist API requests"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_starts_uninstalled() {
        let recorder = MetricsRecorder::new();
        assert!(recorder.handle().is_none());
        assert!(recorder.render().is_none());
    }

    #[test]
    fn test_install_and_render() {
        let mut recorder = MetricsRecorder::new();
        recorder.install().unwrap();

        counter!("api_requests_total", "operation" => "get_todolists").increment(1);
        counter!("api_failures_total", "operation" => "get_todolists").increment(1);

        // Another test may have installed the global recorder first.
        if let Some(rendered) = recorder.render() {
            assert!(rendered.contains("api_requests_total"));
            assert!(rendered.contains("api_failures_total"));
        }
    }
}
