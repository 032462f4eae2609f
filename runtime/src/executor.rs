//! Effect execution.
//!
//! [`execute`] walks an [`Effect`] tree and pushes every emitted result into
//! the pipeline's result channel. The whole tree runs inside the caller's
//! task, so aborting that task cancels outstanding futures and pending
//! delays alike.

use countries_mvi_core::effect::Effect;
use futures::future::{BoxFuture, join_all};
use tokio::sync::mpsc;

/// Execute `effect`, sending each result to `results`
///
/// # Ordering
///
/// - `Sequential` children complete one after another, so their results
///   arrive in declaration order
/// - `Parallel` children run concurrently within this task and their
///   results interleave
///
/// If the receiving side is gone (pipeline shut down) results are dropped
/// and execution winds down quietly.
///
/// # Example
///
/// ```
/// use countries_mvi_core::Effect;
/// use countries_mvi_runtime::executor::execute;
/// use tokio::sync::mpsc;
///
/// # tokio_test::block_on(async {
/// let (tx, mut rx) = mpsc::unbounded_channel();
/// execute(Effect::chain(vec![Effect::Emit(1), Effect::Emit(2)]), tx).await;
///
/// assert_eq!(rx.recv().await, Some(1));
/// assert_eq!(rx.recv().await, Some(2));
/// # });
/// ```
pub fn execute<R>(effect: Effect<R>, results: mpsc::UnboundedSender<R>) -> BoxFuture<'static, ()>
where
    R: Send + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
            },
            Effect::Emit(result) => {
                tracing::trace!("Executing Effect::Emit");
                if results.send(result).is_err() {
                    tracing::trace!("Result channel closed, dropping result");
                }
            },
            Effect::Future(future) => {
                tracing::trace!("Executing Effect::Future");
                let next = future.await;
                execute(next, results).await;
            },
            Effect::Delay { duration, result } => {
                tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                tokio::time::sleep(duration).await;
                if results.send(*result).is_err() {
                    tracing::trace!("Result channel closed, dropping delayed result");
                }
            },
            Effect::Sequential(effects) => {
                let effect_count = effects.len();
                tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);
                for (idx, effect) in effects.into_iter().enumerate() {
                    tracing::trace!("Executing sequential effect {} of {}", idx + 1, effect_count);
                    execute(effect, results.clone()).await;
                }
            },
            Effect::Parallel(effects) => {
                tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                join_all(
                    effects
                        .into_iter()
                        .map(|effect| execute(effect, results.clone())),
                )
                .await;
            },
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    async fn run<R: Send + 'static>(effect: Effect<R>) -> Vec<R> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        execute(effect, tx).await;
        let mut out = Vec::new();
        while let Some(result) = rx.recv().await {
            out.push(result);
        }
        out
    }

    #[tokio::test]
    async fn none_emits_nothing() {
        assert!(run::<u8>(Effect::None).await.is_empty());
    }

    #[tokio::test]
    async fn future_result_follows_start_value() {
        let effect = Effect::start_with(
            "in_progress",
            Effect::from_future(async {
                tokio::task::yield_now().await;
                Effect::Emit("success")
            }),
        );
        assert_eq!(run(effect).await, vec!["in_progress", "success"]);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_waits_before_emitting() {
        let start = tokio::time::Instant::now();
        let effect = Effect::pair_with_delay("success", "reset", Duration::from_secs(2));

        assert_eq!(run(effect).await, vec!["success", "reset"]);
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn parallel_results_arrive_in_completion_order() {
        let slow = Effect::from_future(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Effect::Emit("slow")
        });
        let fast = Effect::from_future(async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Effect::Emit("fast")
        });

        assert_eq!(run(Effect::merge(vec![slow, fast])).await, vec!["fast", "slow"]);
    }

    #[tokio::test]
    async fn closed_channel_is_tolerated() {
        let (tx, rx) = mpsc::unbounded_channel::<u8>();
        drop(rx);
        execute(Effect::chain(vec![Effect::Emit(1), Effect::Emit(2)]), tx).await;
    }

    proptest! {
        #[test]
        fn sequential_preserves_declaration_order(chunks in prop::collection::vec(prop::collection::vec(any::<u16>(), 0..5), 0..6)) {
            let expected: Vec<u16> = chunks.iter().flatten().copied().collect();
            let effect = Effect::chain(
                chunks
                    .into_iter()
                    .map(|chunk| Effect::chain(chunk.into_iter().map(Effect::Emit).collect()))
                    .collect(),
            );

            let results = tokio_test::block_on(run(effect));
            prop_assert_eq!(results, expected);
        }
    }
}
