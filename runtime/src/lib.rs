//! # Countries MVI Runtime
//!
//! Runtime implementation for the Intent/Action/Result/State pipeline.
//!
//! This crate provides the [`ViewModel`] that owns one pipeline instance and
//! the executor that runs interactor effects.
//!
//! ## Core Components
//!
//! - **`ViewModel`**: accepts intents, serialises reduction, caches and
//!   publishes view states
//! - **Effect Executor**: runs [`Effect`](countries_mvi_core::Effect)
//!   descriptions on worker tasks and forwards their results
//! - **Config**: [`ViewModelConfig`] with environment overrides
//! - **Metrics**: counters and gauges for intents, actions, results, states
//!
//! ## Example
//!
//! ```ignore
//! use countries_mvi_runtime::ViewModel;
//!
//! let view_model = ViewModel::new(
//!     CountryListViewState::idle(),
//!     CountryListReducer,
//!     CountryListInteractor::new(repository, config),
//! );
//!
//! // Send an intent
//! view_model.send(CountryListIntent::Initial)?;
//!
//! // Observe states; the cached state arrives first
//! let mut states = view_model.states();
//! while let Some(state) = states.next().await {
//!     render(&state);
//! }
//! ```

/// Runtime configuration with environment overrides
pub mod config;

/// Execution of effect descriptions
pub mod executor;

/// Metrics for observability
pub mod metrics;

/// The pipeline owner
pub mod view_model;

/// Error types for the runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during `ViewModel` operations
    ///
    /// Repository failures never show up here: they are results, folded
    /// into view state by the reducer.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum ViewModelError {
        /// `ViewModel` is shutting down and not accepting new intents
        ///
        /// Returned by `send()` and `process_intents()` after `shutdown()`
        /// was called.
        #[error("ViewModel is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for in-flight actions
        ///
        /// The remaining actions were cancelled, including pending resets.
        #[error("Shutdown timed out with {0} actions still running")]
        ShutdownTimeout(usize),

        /// The intent channel closed unexpectedly
        ///
        /// The dispatcher task is gone (it was aborted or panicked).
        #[error("Intent channel closed")]
        ChannelClosed,

        /// The reducer task ended abnormally (it panicked)
        #[error("Reducer task failed: {0}")]
        ReducerFailed(String),
    }

    /// Errors raised while reading configuration
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum ConfigError {
        /// A configuration value could not be used
        #[error("Invalid value {value:?} for {key}: {reason}")]
        InvalidValue {
            /// Name of the setting (environment variable)
            key: String,
            /// Raw value as found
            value: String,
            /// Why it was rejected
            reason: String,
        },
    }
}

pub use config::ViewModelConfig;
pub use error::{ConfigError, ViewModelError};
pub use view_model::{StateStream, ViewModel};
