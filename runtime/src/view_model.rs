//! The `ViewModel` - owner of one Intent → Action → Result → State pipeline.
//!
//! # Tasks
//!
//! Construction spawns two long-lived tasks:
//!
//! - **dispatcher**: receives intents, applies the initial-intent filter,
//!   maps intents to actions, asks the interactor for each action's effect
//!   and spawns one worker task per action (unbounded fan-out)
//! - **reducer**: receives every result through one channel (fan-in) and
//!   folds it into the current state, one result at a time
//!
//! Neither task waits for a subscriber. The pipeline runs from construction
//! until `shutdown()` or drop, so in-flight work survives subscribers
//! detaching and re-attaching.
//!
//! # Ordering
//!
//! - Intents are handled in arrival order.
//! - Results of one action arrive in the order its effect emits them.
//! - Results of different actions interleave freely.
//! - Reducer invocations never overlap.

use crate::config::ViewModelConfig;
use crate::error::ViewModelError;
use crate::executor;
use crate::metrics::{
    ACTIONS_DISPATCHED, ACTIONS_IN_FLIGHT, INTENTS_FILTERED, INTENTS_RECEIVED, RESULTS_REDUCED,
    STATES_DEDUPLICATED, STATES_EMITTED, VIEW_MODEL_LABEL,
};
use countries_mvi_core::{
    Intent, IntentFilter, Interactor, Reducer, StateSlot, ViewState,
};
use futures::{Stream, StreamExt};
use std::fmt;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, mpsc};
use tokio::task::{JoinHandle, JoinSet};

/// Stream of view states handed to subscribers
pub type StateStream<S> = Pin<Box<dyn Stream<Item = S> + Send>>;

/// Handles of the tasks a `ViewModel` owns
#[derive(Default)]
struct PipelineTasks {
    dispatcher: Option<JoinHandle<()>>,
    reducer: Option<JoinHandle<()>>,
    forwarders: Vec<JoinHandle<()>>,
}

impl PipelineTasks {
    fn abort_all(&mut self) {
        for handle in self.forwarders.drain(..) {
            handle.abort();
        }
        if let Some(handle) = self.dispatcher.take() {
            handle.abort();
        }
        if let Some(handle) = self.reducer.take() {
            handle.abort();
        }
    }
}

/// The `ViewModel` - runtime owner of a screen's pipeline
///
/// # Type Parameters
///
/// - `I`: Intent type
/// - `R`: Reducer implementation
/// - `X`: Interactor implementation
///
/// # Example
///
/// ```ignore
/// let view_model = ViewModel::with_config(
///     CountryDetailViewState::idle(),
///     CountryDetailReducer,
///     CountryDetailInteractor::new(repository, config),
///     ViewModelConfig::new("country_detail"),
/// );
///
/// view_model.send(CountryDetailIntent::Initial { country_name: Some("Czechia".into()) })?;
/// ```
pub struct ViewModel<I, R, X>
where
    R: Reducer,
{
    intents: Mutex<Option<mpsc::UnboundedSender<I>>>,
    slot: StateSlot<R::State>,
    shutdown: AtomicBool,
    in_flight: Arc<AtomicUsize>,
    tasks: Mutex<PipelineTasks>,
    config: ViewModelConfig,
    _interactor: PhantomData<fn() -> X>,
}

impl<I, R, X> ViewModel<I, R, X>
where
    I: Intent<Action = X::Action> + fmt::Debug + Send + 'static,
    R: Reducer<Result = X::Result> + Send + 'static,
    R::State: ViewState + fmt::Debug,
    X: Interactor + Send + 'static,
    X::Action: fmt::Debug,
    X::Result: fmt::Debug + Send + 'static,
{
    /// Create a `ViewModel` with the default configuration
    ///
    /// The pipeline starts immediately. Must be called from within a tokio
    /// runtime.
    #[must_use]
    pub fn new(initial_state: R::State, reducer: R, interactor: X) -> Self {
        Self::with_config(initial_state, reducer, interactor, ViewModelConfig::default())
    }

    /// Create a `ViewModel` with a custom configuration
    ///
    /// # Arguments
    ///
    /// - `initial_state`: The state cached before any result arrives
    /// - `reducer`: Folds results into state
    /// - `interactor`: Turns actions into effects
    /// - `config`: Name, state buffer size, shutdown timeout
    #[must_use]
    pub fn with_config(
        initial_state: R::State,
        reducer: R,
        interactor: X,
        config: ViewModelConfig,
    ) -> Self {
        let slot = StateSlot::new(initial_state, config.state_buffer);
        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let dispatcher = Dispatcher {
            name: config.name().to_string(),
            filter: IntentFilter::new(),
            interactor,
            results: result_tx,
            in_flight: Arc::clone(&in_flight),
            running: JoinSet::new(),
        };
        let dispatcher = tokio::spawn(dispatcher.run(intent_rx));
        let reducer = tokio::spawn(reduce_loop(
            config.name().to_string(),
            result_rx,
            reducer,
            slot.clone(),
        ));

        tracing::debug!(view_model = %config.name(), "Pipeline started");

        Self {
            intents: Mutex::new(Some(intent_tx)),
            slot,
            shutdown: AtomicBool::new(false),
            in_flight,
            tasks: Mutex::new(PipelineTasks {
                dispatcher: Some(dispatcher),
                reducer: Some(reducer),
                forwarders: Vec::new(),
            }),
            config,
            _interactor: PhantomData,
        }
    }

    /// Submit one intent
    ///
    /// Returns once the intent is queued; its results arrive asynchronously
    /// through [`states()`](Self::states).
    ///
    /// # Errors
    ///
    /// - [`ViewModelError::ShutdownInProgress`] after `shutdown()` was called
    /// - [`ViewModelError::ChannelClosed`] if the dispatcher task is gone
    #[tracing::instrument(skip(self, intent), fields(view_model = %self.config.name()), name = "view_model_send")]
    pub fn send(&self, intent: I) -> Result<(), ViewModelError> {
        if self.shutdown.load(Ordering::Acquire) {
            return Err(ViewModelError::ShutdownInProgress);
        }
        match lock(&self.intents).as_ref() {
            Some(sender) => sender
                .send(intent)
                .map_err(|_| ViewModelError::ChannelClosed),
            None => Err(ViewModelError::ShutdownInProgress),
        }
    }

    /// Forward a stream of intents (typically the UI's gesture stream)
    ///
    /// Several streams may be attached over the `ViewModel`'s lifetime, e.g.
    /// one per UI attachment. A forwarder ends with its stream and is
    /// cancelled on shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`ViewModelError::ShutdownInProgress`] after `shutdown()` was called.
    pub fn process_intents<St>(&self, intents: St) -> Result<(), ViewModelError>
    where
        St: Stream<Item = I> + Send + 'static,
    {
        // `shutdown()` drains forwarders under this lock, so a forwarder is
        // either registered before the drain or never gets a sender.
        let mut tasks = lock(&self.tasks);
        if self.shutdown.load(Ordering::Acquire) {
            return Err(ViewModelError::ShutdownInProgress);
        }
        let sender = lock(&self.intents)
            .clone()
            .ok_or(ViewModelError::ShutdownInProgress)?;

        let name = self.config.name().to_string();
        let forwarder = tokio::spawn(async move {
            let mut intents = std::pin::pin!(intents);
            while let Some(intent) = intents.next().await {
                if sender.send(intent).is_err() {
                    break;
                }
            }
            tracing::trace!(view_model = %name, "Intent stream ended");
        });

        tasks.forwarders.retain(|handle| !handle.is_finished());
        tasks.forwarders.push(forwarder);
        Ok(())
    }

    /// Subscribe to view states
    ///
    /// The stream yields the cached state first, then every later distinct
    /// state. A subscriber that falls more than `state_buffer` states behind
    /// skips to newer ones. The stream ends after shutdown.
    #[must_use]
    pub fn states(&self) -> StateStream<R::State> {
        let (current, updates) = self.slot.subscribe();
        let name = self.config.name().to_string();

        Box::pin(async_stream::stream! {
            let mut last = current.clone();
            yield current;

            if let Some(mut updates) = updates {
                loop {
                    match updates.recv().await {
                        Ok(state) => {
                            // A lagged receiver may land on a value equal to the last one it saw.
                            if state != last {
                                last = state.clone();
                                yield state;
                            }
                        },
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(
                                view_model = %name,
                                skipped,
                                "State subscriber lagged, skipping to newer states"
                            );
                        },
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        })
    }
}

impl<I, R, X> ViewModel<I, R, X>
where
    R: Reducer,
    R::State: Clone,
{
    /// The most recently produced state
    #[must_use]
    pub fn current_state(&self) -> R::State {
        self.slot.get()
    }

    /// Number of actions whose effects are still running
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Whether `shutdown()` has been called
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// The configuration this `ViewModel` was built with
    #[must_use]
    pub const fn config(&self) -> &ViewModelConfig {
        &self.config
    }

    /// Shut the pipeline down
    ///
    /// 1. Stops accepting intents and cancels intent forwarders
    /// 2. Waits up to `shutdown_timeout` for in-flight actions (including
    ///    pending delayed resets) and their results to be reduced
    /// 3. Cancels whatever is still running and closes state streams
    ///
    /// Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ViewModelError::ShutdownTimeout`] with the number of
    /// actions that had to be cancelled.
    pub async fn shutdown(&self) -> Result<(), ViewModelError> {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        tracing::info!(view_model = %self.config.name(), "Initiating shutdown");

        // Dropping the last sender lets the dispatcher drain and exit.
        lock(&self.intents).take();
        let reducer = {
            let mut tasks = lock(&self.tasks);
            for handle in tasks.forwarders.drain(..) {
                handle.abort();
            }
            tasks.reducer.take()
        };

        let Some(reducer) = reducer else {
            return Ok(());
        };
        let reducer_abort = reducer.abort_handle();

        match tokio::time::timeout(self.config.shutdown_timeout, reducer).await {
            Ok(Ok(())) => {
                tracing::info!(view_model = %self.config.name(), "Pipeline drained, shutdown complete");
                return Ok(());
            },
            Ok(Err(error)) => {
                // The reducer never reached its own `close`.
                tracing::error!(view_model = %self.config.name(), %error, "Reducer task failed");
                lock(&self.tasks).abort_all();
                self.slot.close();
                return Err(ViewModelError::ReducerFailed(error.to_string()));
            },
            Err(_) => {},
        }

        let pending = self.in_flight();
        tracing::warn!(
            view_model = %self.config.name(),
            pending_actions = pending,
            "Shutdown timeout: cancelling {} in-flight actions", pending
        );
        lock(&self.tasks).abort_all();
        reducer_abort.abort();
        self.slot.close();
        Err(ViewModelError::ShutdownTimeout(pending))
    }
}

impl<I, R, X> Drop for ViewModel<I, R, X>
where
    R: Reducer,
{
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        lock(&self.tasks).abort_all();
        self.slot.close();
    }
}

impl<I, R, X> fmt::Debug for ViewModel<I, R, X>
where
    R: Reducer,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModel")
            .field("name", &self.config.name())
            .field("in_flight", &self.in_flight.load(Ordering::Acquire))
            .field("shutdown", &self.shutdown.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Decrements the in-flight counter when an action's task ends, even on abort
struct InFlightGuard {
    counter: Arc<AtomicUsize>,
    name: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::AcqRel);
        metrics::gauge!(ACTIONS_IN_FLIGHT, VIEW_MODEL_LABEL => self.name.clone()).decrement(1.0);
    }
}

/// Intent side of the pipeline; runs in the dispatcher task
struct Dispatcher<X>
where
    X: Interactor,
{
    name: String,
    filter: IntentFilter,
    interactor: X,
    results: mpsc::UnboundedSender<X::Result>,
    in_flight: Arc<AtomicUsize>,
    running: JoinSet<()>,
}

impl<X> Dispatcher<X>
where
    X: Interactor,
    X::Action: fmt::Debug,
    X::Result: Send + 'static,
{
    async fn run<I>(mut self, mut intents: mpsc::UnboundedReceiver<I>)
    where
        I: Intent<Action = X::Action> + fmt::Debug,
    {
        loop {
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(intent) => self.dispatch(intent),
                    None => break,
                },
                Some(joined) = self.running.join_next(), if !self.running.is_empty() => {
                    self.reap(joined);
                },
            }
        }

        tracing::debug!(view_model = %self.name, "Intent channel closed, draining in-flight actions");
        while let Some(joined) = self.running.join_next().await {
            self.reap(joined);
        }
        // `self.results` drops here; the reducer finishes once workers are done too.
    }

    fn dispatch<I>(&mut self, intent: I)
    where
        I: Intent<Action = X::Action> + fmt::Debug,
    {
        tracing::debug!(view_model = %self.name, ?intent, "intent");
        metrics::counter!(INTENTS_RECEIVED, VIEW_MODEL_LABEL => self.name.clone()).increment(1);

        if !self.filter.admit(&intent) {
            tracing::debug!(view_model = %self.name, "Initial intent already handled, dropping");
            metrics::counter!(INTENTS_FILTERED, VIEW_MODEL_LABEL => self.name.clone()).increment(1);
            return;
        }

        let action = intent.into_action();
        tracing::debug!(view_model = %self.name, ?action, "action");
        metrics::counter!(ACTIONS_DISPATCHED, VIEW_MODEL_LABEL => self.name.clone()).increment(1);

        let effect = self.interactor.process(action);

        self.in_flight.fetch_add(1, Ordering::AcqRel);
        metrics::gauge!(ACTIONS_IN_FLIGHT, VIEW_MODEL_LABEL => self.name.clone()).increment(1.0);
        let guard = InFlightGuard {
            counter: Arc::clone(&self.in_flight),
            name: self.name.clone(),
        };
        let results = self.results.clone();

        self.running.spawn(async move {
            let _guard = guard;
            executor::execute(effect, results).await;
        });
    }

    fn reap(&self, joined: Result<(), tokio::task::JoinError>) {
        if let Err(error) = joined {
            if error.is_panic() {
                tracing::error!(view_model = %self.name, %error, "Action task panicked");
            }
        }
    }
}

/// Result side of the pipeline; the only place state changes
async fn reduce_loop<R>(
    name: String,
    mut results: mpsc::UnboundedReceiver<R::Result>,
    reducer: R,
    slot: StateSlot<R::State>,
) where
    R: Reducer,
    R::State: ViewState,
    R::Result: fmt::Debug,
{
    let mut state = slot.get();

    while let Some(result) = results.recv().await {
        tracing::debug!(view_model = %name, ?result, "result");
        metrics::counter!(RESULTS_REDUCED, VIEW_MODEL_LABEL => name.clone()).increment(1);

        state = reducer.reduce(&state, result);

        if slot.replace_if_changed(state.clone()) {
            tracing::trace!(view_model = %name, subscribers = slot.subscriber_count(), "State published");
            metrics::counter!(STATES_EMITTED, VIEW_MODEL_LABEL => name.clone()).increment(1);
        } else {
            tracing::trace!(view_model = %name, "State unchanged, not publishing");
            metrics::counter!(STATES_DEDUPLICATED, VIEW_MODEL_LABEL => name.clone()).increment(1);
        }
    }

    tracing::debug!(view_model = %name, "Result channel closed, pipeline finished");
    slot.close();
}
