//! # Countries MVI Core
//!
//! Core traits and types for a unidirectional Model-View-Intent pipeline.
//!
//! A screen is described by four closed sum types and two functions:
//!
//! - **Intent**: user gestures ("load", "swipe to refresh", "toggle favorite")
//! - **Action**: internal commands derived from intents by a pure mapping
//! - **Result**: outcomes of performing an action (`InProgress`, `Success`,
//!   `Failure`, optionally `Reset`)
//! - **`ViewState`**: immutable snapshot rendered by the UI
//! - **Interactor**: `Action → Effect<Result>` (the asynchronous work)
//! - **Reducer**: pure function `(State, Result) → State`
//!
//! ## Data Flow
//!
//! ```text
//! Intent ──filter──→ Action ──Interactor──→ Effect<Result>
//!                                               │ (worker tasks)
//!                                               ▼
//!            StateSlot ←──distinct── Reducer ←── Result (serial)
//! ```
//!
//! ## Example
//!
//! ```
//! use countries_mvi_core::{effect::Effect, intent::Intent, interactor::Interactor, reducer::Reducer};
//!
//! #[derive(Clone, Debug, PartialEq, Default)]
//! struct CounterState { count: i64, busy: bool }
//!
//! enum CounterIntent { Initial, Bump }
//! enum CounterAction { Bump }
//! #[derive(Debug)]
//! enum CounterResult { InProgress, Bumped }
//!
//! impl Intent for CounterIntent {
//!     type Action = CounterAction;
//!     fn into_action(self) -> CounterAction { CounterAction::Bump }
//!     fn is_initial(&self) -> bool { matches!(self, Self::Initial) }
//! }
//!
//! struct CounterInteractor;
//! impl Interactor for CounterInteractor {
//!     type Action = CounterAction;
//!     type Result = CounterResult;
//!     fn process(&self, _action: CounterAction) -> Effect<CounterResult> {
//!         Effect::chain(vec![Effect::Emit(CounterResult::InProgress), Effect::Emit(CounterResult::Bumped)])
//!     }
//! }
//!
//! struct CounterReducer;
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Result = CounterResult;
//!     fn reduce(&self, state: &CounterState, result: CounterResult) -> CounterState {
//!         match result {
//!             CounterResult::InProgress => CounterState { busy: true, ..state.clone() },
//!             CounterResult::Bumped => CounterState { busy: false, count: state.count + 1 },
//!         }
//!     }
//! }
//!
//! let next = CounterReducer.reduce(&CounterState::default(), CounterResult::Bumped);
//! assert_eq!(next.count, 1);
//! ```

/// Effect module - descriptions of the result sequence for one action
pub mod effect;

/// Intent module - user events and the initial-intent filter
pub mod intent;

/// State module - view state marker and the single-slot state cache
pub mod state;

/// Reducer module - The pure state transition function
///
/// Reducers fold results into view state: `(State, Result) → State`.
///
/// They never perform I/O, never block, and are invoked serially by the
/// runtime, one result at a time.
pub mod reducer {
    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The view state this reducer produces
    /// - `Result`: The result type this reducer consumes
    ///
    /// A reducer must be total: every `Result` variant is handled by an
    /// exhaustive `match`. Results belonging to another screen cannot reach
    /// it because the associated `Result` type rules them out.
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for CountryListReducer {
    ///     type State = CountryListViewState;
    ///     type Result = CountryListResult;
    ///
    ///     fn reduce(&self, state: &CountryListViewState, result: CountryListResult) -> CountryListViewState {
    ///         match result {
    ///             CountryListResult::FilterChanged(filter_type) => CountryListViewState {
    ///                 filter_type,
    ///                 ..state.clone()
    ///             },
    ///             // ...
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer produces
        type State;

        /// The result type this reducer consumes
        type Result;

        /// Combine the previous state and a result into the next state
        ///
        /// The returned state equals `state` except for the fields the
        /// given result is documented to affect (copy-on-write update).
        fn reduce(&self, state: &Self::State, result: Self::Result) -> Self::State;
    }
}

/// Interactor module - routes actions to asynchronous operations
///
/// The interactor is the only place where a screen talks to its repository.
/// It does not execute anything itself: it returns an [`Effect`](crate::effect::Effect)
/// describing the result sequence, and the runtime executes it on a worker task.
pub mod interactor {
    use super::effect::Effect;

    /// Maps each action to the effect that produces its results
    ///
    /// For a single action the produced sequence is `InProgress` (or nothing)
    /// followed by exactly one terminal result, optionally followed by a
    /// delayed `Reset`. Repository failures must be mapped to failure
    /// results inside the effect; an effect has no error channel.
    pub trait Interactor {
        /// The action type this interactor handles
        type Action;

        /// The result type its effects emit
        type Result;

        /// Describe the result sequence for `action`
        fn process(&self, action: Self::Action) -> Effect<Self::Result>;
    }
}

// Re-export commonly used types
pub use effect::Effect;
pub use intent::{Intent, IntentFilter};
pub use interactor::Interactor;
pub use reducer::Reducer;
pub use state::{StateSlot, ViewState};
