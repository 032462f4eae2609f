//! Integration tests for the `ViewModel` pipeline
//!
//! Exercises replay-one, duplicate suppression, the initial-intent filter,
//! serial reduction, delayed resets and shutdown against a small counter
//! screen.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use countries_mvi_core::{Effect, Intent, Interactor, Reducer, ViewState};
use countries_mvi_runtime::{ViewModel, ViewModelConfig, ViewModelError};
use countries_mvi_testing::assertions::assert_distinct_until_changed;
use countries_mvi_testing::helpers::{assert_quiet, collect_states, wait_for_state};
use countries_mvi_testing::init_test_tracing;
use futures::{stream, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

const RESET_DELAY: Duration = Duration::from_secs(2);
const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Default)]
struct CounterState {
    is_loading: bool,
    value: i32,
    message: Option<String>,
}

impl ViewState for CounterState {}

#[derive(Debug, Clone)]
enum CounterIntent {
    Initial,
    Add(i32),
    Slow(i32),
    Flash,
    Noop,
    Poison,
}

#[derive(Debug, Clone)]
enum CounterAction {
    Load,
    Add(i32),
    Slow(i32),
    Flash,
    Noop,
    Poison,
}

#[derive(Debug, Clone)]
enum CounterResult {
    InProgress,
    Loaded(i32),
    Added(i32),
    Flashed,
    Reset,
    Unchanged,
    Poisoned,
}

impl Intent for CounterIntent {
    type Action = CounterAction;

    fn into_action(self) -> CounterAction {
        match self {
            Self::Initial => CounterAction::Load,
            Self::Add(n) => CounterAction::Add(n),
            Self::Slow(n) => CounterAction::Slow(n),
            Self::Flash => CounterAction::Flash,
            Self::Noop => CounterAction::Noop,
            Self::Poison => CounterAction::Poison,
        }
    }

    fn is_initial(&self) -> bool {
        matches!(self, Self::Initial)
    }
}

#[derive(Clone, Default)]
struct CounterInteractor {
    loads: Arc<AtomicUsize>,
}

impl Interactor for CounterInteractor {
    type Action = CounterAction;
    type Result = CounterResult;

    fn process(&self, action: CounterAction) -> Effect<CounterResult> {
        match action {
            CounterAction::Load => {
                self.loads.fetch_add(1, Ordering::SeqCst);
                Effect::start_with(
                    CounterResult::InProgress,
                    Effect::from_future(async {
                        tokio::task::yield_now().await;
                        Effect::Emit(CounterResult::Loaded(10))
                    }),
                )
            },
            CounterAction::Add(n) => Effect::Emit(CounterResult::Added(n)),
            CounterAction::Slow(n) => Effect::Delay {
                duration: Duration::from_secs(1),
                result: Box::new(CounterResult::Added(n)),
            },
            CounterAction::Flash => {
                Effect::pair_with_delay(CounterResult::Flashed, CounterResult::Reset, RESET_DELAY)
            },
            CounterAction::Noop => Effect::Emit(CounterResult::Unchanged),
            CounterAction::Poison => Effect::Emit(CounterResult::Poisoned),
        }
    }
}

struct CounterReducer;

impl Reducer for CounterReducer {
    type State = CounterState;
    type Result = CounterResult;

    fn reduce(&self, state: &CounterState, result: CounterResult) -> CounterState {
        match result {
            CounterResult::InProgress => CounterState {
                is_loading: true,
                ..state.clone()
            },
            CounterResult::Loaded(value) => CounterState {
                is_loading: false,
                value,
                ..state.clone()
            },
            CounterResult::Added(n) => CounterState {
                value: state.value + n,
                ..state.clone()
            },
            CounterResult::Flashed => CounterState {
                message: Some("flash".to_string()),
                ..state.clone()
            },
            CounterResult::Reset => CounterState {
                message: None,
                ..state.clone()
            },
            CounterResult::Unchanged => state.clone(),
            CounterResult::Poisoned => panic!("counter reducer cannot handle a poisoned result"),
        }
    }
}

type CounterViewModel = ViewModel<CounterIntent, CounterReducer, CounterInteractor>;

fn view_model() -> CounterViewModel {
    init_test_tracing();
    ViewModel::new(CounterState::default(), CounterReducer, CounterInteractor::default())
}

fn view_model_with(config: ViewModelConfig, interactor: CounterInteractor) -> CounterViewModel {
    init_test_tracing();
    ViewModel::with_config(CounterState::default(), CounterReducer, interactor, config)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_subscriber_receives_cached_state_first() {
    let vm = view_model();
    let states = collect_states(vm.states(), 1, WAIT).await;
    assert_eq!(states, vec![CounterState::default()]);
}

#[tokio::test]
async fn test_initial_intent_emits_in_progress_then_loaded() {
    let vm = view_model();
    let states = vm.states();

    vm.send(CounterIntent::Initial).unwrap();

    let states = collect_states(states, 3, WAIT).await;
    assert!(states[1].is_loading);
    assert_eq!(
        states[2],
        CounterState {
            is_loading: false,
            value: 10,
            message: None,
        }
    );
}

#[tokio::test]
async fn test_initial_intent_dispatched_once() {
    let interactor = CounterInteractor::default();
    let loads = Arc::clone(&interactor.loads);
    let vm = view_model_with(ViewModelConfig::new("counter"), interactor);
    let mut states = vm.states();

    vm.send(CounterIntent::Initial).unwrap();
    wait_for_state(&mut states, WAIT, |s| s.value == 10).await;

    // A re-attached UI replays its initial intent
    vm.send(CounterIntent::Initial).unwrap();
    vm.send(CounterIntent::Add(1)).unwrap();
    wait_for_state(&mut states, WAIT, |s| s.value == 11).await;

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(!vm.current_state().is_loading);
}

#[tokio::test]
async fn test_unchanged_state_is_not_emitted() {
    let vm = view_model();
    let mut states = vm.states();
    assert_eq!(states.next().await, Some(CounterState::default()));

    vm.send(CounterIntent::Noop).unwrap();
    vm.send(CounterIntent::Noop).unwrap();

    assert_quiet(&mut states, Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_late_subscriber_gets_latest_state_only() {
    let vm = view_model();
    let mut early = vm.states();

    for _ in 0..3 {
        vm.send(CounterIntent::Add(1)).unwrap();
    }
    wait_for_state(&mut early, WAIT, |s| s.value == 3).await;

    let mut late = vm.states();
    assert_eq!(late.next().await.map(|s| s.value), Some(3));
    assert_quiet(&mut late, Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_concurrent_results_are_reduced_serially() {
    let vm = view_model();
    let mut states = vm.states();

    for _ in 0..100 {
        vm.send(CounterIntent::Add(1)).unwrap();
    }

    let last = wait_for_state(&mut states, WAIT, |s| s.value == 100).await;
    assert_eq!(last.value, 100);
    assert_eq!(vm.current_state().value, 100);
}

#[tokio::test]
async fn test_emitted_states_are_distinct() {
    let vm = view_model();
    let states = vm.states();

    vm.send(CounterIntent::Add(1)).unwrap();
    vm.send(CounterIntent::Noop).unwrap();
    vm.send(CounterIntent::Add(0)).unwrap();
    vm.send(CounterIntent::Add(1)).unwrap();

    let states = collect_states(states, 3, WAIT).await;
    assert_distinct_until_changed(&states);
    assert_eq!(states[2].value, 2);
}

#[tokio::test]
async fn test_lagging_subscriber_catches_up_to_latest() {
    let vm = view_model_with(
        ViewModelConfig::new("lagging").with_state_buffer(1),
        CounterInteractor::default(),
    );
    let mut states = vm.states();

    for _ in 0..20 {
        vm.send(CounterIntent::Add(1)).unwrap();
    }

    let last = wait_for_state(&mut states, WAIT, |s| s.value == 20).await;
    assert_eq!(last.value, 20);
}

#[tokio::test]
async fn test_process_intents_forwards_stream() {
    let vm = view_model();
    let mut states = vm.states();

    vm.process_intents(stream::iter(vec![
        CounterIntent::Add(1),
        CounterIntent::Add(2),
        CounterIntent::Add(3),
    ]))
    .unwrap();

    wait_for_state(&mut states, WAIT, |s| s.value == 6).await;
}

#[tokio::test]
async fn test_several_intent_streams_can_attach() {
    let vm = view_model();
    let mut states = vm.states();

    vm.process_intents(stream::iter(vec![CounterIntent::Add(1)])).unwrap();
    vm.process_intents(stream::iter(vec![CounterIntent::Add(10)])).unwrap();

    wait_for_state(&mut states, WAIT, |s| s.value == 11).await;
}

#[tokio::test(start_paused = true)]
async fn test_flash_message_resets_after_delay() {
    let vm = view_model();
    let mut states = vm.states();
    let start = tokio::time::Instant::now();

    vm.send(CounterIntent::Flash).unwrap();

    wait_for_state(&mut states, WAIT, |s| s.message.is_some()).await;
    let reset = wait_for_state(&mut states, WAIT, |s| s.message.is_none()).await;

    assert!(start.elapsed() >= RESET_DELAY);
    assert_eq!(reset, CounterState::default());
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_tracks_running_actions() {
    let vm = view_model();
    let mut states = vm.states();

    vm.send(CounterIntent::Slow(5)).unwrap();
    while vm.in_flight() == 0 {
        tokio::task::yield_now().await;
    }
    assert_eq!(vm.in_flight(), 1);

    wait_for_state(&mut states, WAIT, |s| s.value == 5).await;
    while vm.in_flight() > 0 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_shutdown_drains_in_flight_work() {
    let vm = view_model();

    vm.send(CounterIntent::Add(7)).unwrap();
    vm.shutdown().await.unwrap();

    assert_eq!(vm.current_state().value, 7);
    assert!(vm.is_shutdown());
}

#[tokio::test]
async fn test_send_after_shutdown_is_rejected() {
    let vm = view_model();
    vm.shutdown().await.unwrap();

    assert_eq!(
        vm.send(CounterIntent::Add(1)),
        Err(ViewModelError::ShutdownInProgress)
    );
    assert_eq!(
        vm.process_intents(stream::empty()),
        Err(ViewModelError::ShutdownInProgress)
    );
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let vm = view_model();
    vm.shutdown().await.unwrap();
    vm.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_timeout_cancels_pending_reset() {
    let vm = view_model_with(
        ViewModelConfig::new("flash").with_shutdown_timeout(Duration::from_millis(100)),
        CounterInteractor::default(),
    );
    let mut states = vm.states();

    vm.send(CounterIntent::Flash).unwrap();
    wait_for_state(&mut states, WAIT, |s| s.message.is_some()).await;

    assert_eq!(vm.shutdown().await, Err(ViewModelError::ShutdownTimeout(1)));

    // The reset never lands and the stream ends
    tokio::time::sleep(RESET_DELAY * 2).await;
    assert!(vm.current_state().message.is_some());
    assert_eq!(states.next().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pipeline() {
    let vm = view_model();
    let mut states = vm.states();

    vm.send(CounterIntent::Flash).unwrap();
    wait_for_state(&mut states, WAIT, |s| s.message.is_some()).await;

    drop(vm);

    assert_eq!(states.next().await, None);
}

#[tokio::test]
async fn test_subscribers_detaching_do_not_stop_work() {
    let vm = view_model();
    drop(vm.states());

    vm.send(CounterIntent::Initial).unwrap();

    let mut states = vm.states();
    wait_for_state(&mut states, WAIT, |s| s.value == 10).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_process_intents_racing_shutdown_never_leaks_a_forwarder() {
    for _ in 0..500 {
        let vm = Arc::new(view_model_with(
            ViewModelConfig::new("race").with_shutdown_timeout(Duration::from_secs(2)),
            CounterInteractor::default(),
        ));

        let attach = {
            let vm = Arc::clone(&vm);
            tokio::spawn(async move { vm.process_intents(stream::pending::<CounterIntent>()) })
        };

        // A forwarder registered behind shutdown's back would keep the
        // dispatcher alive until the timeout.
        assert_eq!(vm.shutdown().await, Ok(()));
        assert!(matches!(
            attach.await.unwrap(),
            Ok(()) | Err(ViewModelError::ShutdownInProgress)
        ));
    }
}

#[tokio::test]
async fn test_reducer_panic_fails_shutdown_and_ends_streams() {
    let vm = view_model();
    let mut states = vm.states();
    collect_states(&mut states, 1, WAIT).await;

    vm.send(CounterIntent::Poison).unwrap();

    assert!(matches!(
        vm.shutdown().await,
        Err(ViewModelError::ReducerFailed(_))
    ));
    assert!(matches!(
        tokio::time::timeout(WAIT, states.next()).await,
        Ok(None)
    ));
}
