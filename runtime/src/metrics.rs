//! Metrics for observability and monitoring.
//!
//! Every `ViewModel` records counters labelled with its configured name:
//! - Intents received and intents dropped by the initial-intent filter
//! - Actions dispatched to the interactor
//! - Results reduced
//! - States emitted and states suppressed as duplicates
//! - Actions currently in flight (gauge)
//!
//! Recording is a no-op until a recorder is installed.
//! [`install_prometheus_recorder`] installs the Prometheus exporter and
//! returns a handle that renders the text exposition format.
//!
//! # Example
//!
//! ```rust,no_run
//! use countries_mvi_runtime::metrics::install_prometheus_recorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handle = install_prometheus_recorder()?;
//! // ... run view models ...
//! println!("{}", handle.render());
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

/// Label key carrying the `ViewModel` name
pub const VIEW_MODEL_LABEL: &str = "view_model";

/// Intents submitted to a `ViewModel`
pub const INTENTS_RECEIVED: &str = "view_model_intents_received_total";
/// Repeated initial intents dropped by the filter
pub const INTENTS_FILTERED: &str = "view_model_intents_filtered_total";
/// Actions handed to the interactor
pub const ACTIONS_DISPATCHED: &str = "view_model_actions_dispatched_total";
/// Results folded by the reducer
pub const RESULTS_REDUCED: &str = "view_model_results_reduced_total";
/// Distinct states published
pub const STATES_EMITTED: &str = "view_model_states_emitted_total";
/// States equal to their predecessor and therefore not published
pub const STATES_DEDUPLICATED: &str = "view_model_states_deduplicated_total";
/// Actions whose effects are still running
pub const ACTIONS_IN_FLIGHT: &str = "view_model_actions_in_flight";

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to install metrics recorder
    #[error("Failed to install metrics recorder: {0}")]
    Install(String),
}

/// Install the Prometheus recorder and register metric descriptions.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if a global recorder is already
/// installed. Call this once, at process start.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    describe_metrics();
    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// Register all metric descriptions.
pub fn describe_metrics() {
    describe_counter!(INTENTS_RECEIVED, "Total number of intents submitted");
    describe_counter!(
        INTENTS_FILTERED,
        "Total number of repeated initial intents dropped"
    );
    describe_counter!(
        ACTIONS_DISPATCHED,
        "Total number of actions dispatched to interactors"
    );
    describe_counter!(RESULTS_REDUCED, "Total number of results folded by reducers");
    describe_counter!(STATES_EMITTED, "Total number of distinct states published");
    describe_counter!(
        STATES_DEDUPLICATED,
        "Total number of states suppressed because nothing changed"
    );
    describe_gauge!(ACTIONS_IN_FLIGHT, "Actions whose effects are still running");
}
