//! Result effects - descriptions of how an action produces its results
//!
//! An [`Effect`] is a value, not an execution. Interactors return effects and
//! the runtime executes them on worker tasks, forwarding every emitted result
//! to the reducer.
//!
//! # Ordering
//!
//! - Results of one effect tree are emitted from a single task, so
//!   `Sequential` children keep their relative order.
//! - `Parallel` children interleave in completion order.
//! - Effects of different actions run in different tasks and carry no
//!   ordering guarantee relative to each other.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future resolving to a follow-up effect
pub type EffectFuture<R> = Pin<Box<dyn Future<Output = Effect<R>> + Send>>;

/// Effect type - describes the result sequence of one action
///
/// # Type Parameters
///
/// - `R`: The result type emitted towards the reducer
pub enum Effect<R> {
    /// Emits nothing
    None,

    /// Emit a result immediately
    Emit(R),

    /// Run effects concurrently
    Parallel(Vec<Effect<R>>),

    /// Run effects one after another
    Sequential(Vec<Effect<R>>),

    /// Emit a result after a fixed delay
    ///
    /// Used to clear transient UI messages. The delay is cancelled together
    /// with the task running it.
    Delay {
        /// How long to wait
        duration: Duration,
        /// Result to emit once the delay elapsed
        result: Box<R>,
    },

    /// Arbitrary async computation resolving to a follow-up effect
    Future(EffectFuture<R>),
}

// Manual Debug implementation since Future doesn't implement Debug
impl<R> fmt::Debug for Effect<R>
where
    R: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::None => write!(f, "Effect::None"),
            Effect::Emit(result) => f.debug_tuple("Effect::Emit").field(result).finish(),
            Effect::Parallel(effects) => f.debug_tuple("Effect::Parallel").field(effects).finish(),
            Effect::Sequential(effects) => {
                f.debug_tuple("Effect::Sequential").field(effects).finish()
            },
            Effect::Delay { duration, result } => f
                .debug_struct("Effect::Delay")
                .field("duration", duration)
                .field("result", result)
                .finish(),
            Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
        }
    }
}

impl<R> Effect<R> {
    /// Combine effects to run in parallel
    #[must_use]
    pub const fn merge(effects: Vec<Effect<R>>) -> Effect<R> {
        Effect::Parallel(effects)
    }

    /// Chain effects to run sequentially
    #[must_use]
    pub const fn chain(effects: Vec<Effect<R>>) -> Effect<R> {
        Effect::Sequential(effects)
    }

    /// Wrap a future that resolves to the next effect
    #[must_use]
    pub fn from_future<F>(future: F) -> Effect<R>
    where
        F: Future<Output = Effect<R>> + Send + 'static,
    {
        Effect::Future(Box::pin(future))
    }

    /// Run a fallible operation and turn its outcome into an effect
    ///
    /// Errors become values here: `on_failure` maps the error into a
    /// failure effect so the pipeline never sees an error channel.
    ///
    /// # Example
    ///
    /// ```ignore
    /// Effect::attempt(
    ///     async move { repository.get_countries().await },
    ///     |countries| Effect::Emit(LoadCountriesResult::Success(countries)),
    ///     |error| Effect::Emit(LoadCountriesResult::Failure(error)),
    /// )
    /// ```
    #[must_use]
    pub fn attempt<F, T, E, S, X>(operation: F, on_success: S, on_failure: X) -> Effect<R>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        S: FnOnce(T) -> Effect<R> + Send + 'static,
        X: FnOnce(E) -> Effect<R> + Send + 'static,
        R: 'static,
    {
        Effect::from_future(async move {
            match operation.await {
                Ok(value) => on_success(value),
                Err(error) => on_failure(error),
            }
        })
    }

    /// Emit `first`, then continue with `rest`
    ///
    /// The typical shape of an action: announce `InProgress` on the current
    /// frame, then run the operation.
    #[must_use]
    pub fn start_with(first: R, rest: Effect<R>) -> Effect<R> {
        Effect::Sequential(vec![Effect::Emit(first), rest])
    }

    /// Emit `first` now and `second` after `delay`
    ///
    /// Pairs a success result with the reset that hides its transient
    /// message again.
    #[must_use]
    pub fn pair_with_delay(first: R, second: R, delay: Duration) -> Effect<R> {
        Effect::Sequential(vec![
            Effect::Emit(first),
            Effect::Delay {
                duration: delay,
                result: Box::new(second),
            },
        ])
    }

    /// Returns `true` for [`Effect::None`]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Effect::None)
    }

    /// `Emit` leaves of nested `Sequential`/`Parallel` effects in declaration
    /// order, stopping at `Future` and `Delay`
    #[cfg(test)]
    fn immediate_results(&self) -> Vec<&R> {
        let mut out = Vec::new();
        self.collect_immediate(&mut out);
        out
    }

    #[cfg(test)]
    fn collect_immediate<'a>(&'a self, out: &mut Vec<&'a R>) {
        match self {
            Effect::Emit(result) => out.push(result),
            Effect::Parallel(effects) | Effect::Sequential(effects) => {
                for effect in effects {
                    effect.collect_immediate(out);
                }
            },
            Effect::None | Effect::Delay { .. } | Effect::Future(_) => {},
        }
    }
}

impl<R> Default for Effect<R> {
    fn default() -> Self {
        Effect::None
    }
}
