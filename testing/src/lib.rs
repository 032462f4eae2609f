//! # Countries MVI Testing
//!
//! Testing utilities and helpers for the Intent/Action/Result/State pipeline.
//!
//! This crate provides:
//! - `ReducerTest`, a Given-When-Then harness for reducers
//! - Helpers for draining effects and state streams with timeouts
//! - Assertions for the laws a state stream must satisfy
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use countries_mvi_testing::helpers::collect_states;
//!
//! #[tokio::test]
//! async fn test_initial_load() {
//!     let view_model = country_list_view_model(repository, config);
//!     let states = view_model.states();
//!
//!     view_model.send(CountryListIntent::Initial)?;
//!
//!     let states = collect_states(states, 3, Duration::from_secs(1)).await;
//!     assert!(states[1].is_loading);
//!     assert_eq!(states[2].countries.len(), 1);
//! }
//! ```


/// Test helpers and utilities
///
/// Async helpers for draining effects and state streams. Every helper that
/// waits takes a timeout so a broken pipeline fails the test instead of
/// hanging it.
pub mod helpers {
    use countries_mvi_core::effect::Effect;
    use countries_mvi_runtime::executor;
    use futures::{Stream, StreamExt};
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Run `effect` to completion and return every result it emitted
    pub async fn collect_results<R>(effect: Effect<R>) -> Vec<R>
    where
        R: Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        executor::execute(effect, tx).await;

        let mut results = Vec::new();
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        results
    }

    /// Take `count` items from `states`, waiting at most `timeout` overall
    ///
    /// # Panics
    ///
    /// Panics if the stream ends early or the timeout elapses, reporting
    /// how many items did arrive.
    #[allow(clippy::panic)] // Test helper
    pub async fn collect_states<St>(states: St, count: usize, timeout: Duration) -> Vec<St::Item>
    where
        St: Stream + Unpin,
    {
        let mut states = states;
        let mut collected = Vec::with_capacity(count);
        let deadline = tokio::time::Instant::now() + timeout;

        while collected.len() < count {
            match tokio::time::timeout_at(deadline, states.next()).await {
                Ok(Some(state)) => collected.push(state),
                Ok(None) => panic!(
                    "State stream ended after {} of {count} states",
                    collected.len()
                ),
                Err(_) => panic!(
                    "Timed out after {timeout:?} with {} of {count} states",
                    collected.len()
                ),
            }
        }
        collected
    }

    /// Wait for the first item matching `predicate`
    ///
    /// # Panics
    ///
    /// Panics if the stream ends or the timeout elapses first.
    #[allow(clippy::panic)] // Test helper
    pub async fn wait_for_state<St, F>(states: &mut St, timeout: Duration, predicate: F) -> St::Item
    where
        St: Stream + Unpin,
        F: Fn(&St::Item) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match tokio::time::timeout_at(deadline, states.next()).await {
                Ok(Some(state)) if predicate(&state) => return state,
                Ok(Some(_)) => {},
                Ok(None) => panic!("State stream ended before a matching state arrived"),
                Err(_) => panic!("Timed out after {timeout:?} waiting for a matching state"),
            }
        }
    }

    /// Assert that nothing arrives on `states` within `window`
    ///
    /// # Panics
    ///
    /// Panics if an item arrives.
    #[allow(clippy::panic)] // Test helper
    pub async fn assert_quiet<St>(states: &mut St, window: Duration)
    where
        St: Stream + Unpin,
        St::Item: std::fmt::Debug,
    {
        if let Ok(Some(state)) = tokio::time::timeout(window, states.next()).await {
            panic!("Expected no further states, got {state:?}");
        }
    }
}

/// Assertions for state stream laws
pub mod assertions {
    /// Assert that no two consecutive states are equal
    ///
    /// # Panics
    ///
    /// Panics at the first consecutive duplicate.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_distinct_until_changed<S>(states: &[S])
    where
        S: PartialEq + std::fmt::Debug,
    {
        for (idx, pair) in states.windows(2).enumerate() {
            assert!(
                pair[0] != pair[1],
                "States {idx} and {} are equal: {:?}",
                idx + 1,
                pair[0]
            );
        }
    }
}

/// Tracing setup for tests
pub mod tracing_setup {
    /// Install a test-friendly `tracing` subscriber once per process
    ///
    /// Honours `RUST_LOG`; defaults to `debug` for the pipeline crates.
    /// Safe to call from every test.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "countries=debug,countries_mvi_runtime=debug".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::{collect_results, collect_states};
pub use reducer_test::ReducerTest;
pub use tracing_setup::init_test_tracing;
