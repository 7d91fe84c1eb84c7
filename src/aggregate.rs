//! All-results aggregation: run every task, abort none.

use futures::future::join_all;

use crate::batch::Batch;
use crate::outcome::BatchOutcome;
use crate::task::TaskFuture;

/// Runs every task in the batch concurrently and reports per-task outcomes
/// once all of them have finished.
///
/// Unlike abort-on-first-error combinators such as
/// [`try_join_all`](futures::future::try_join_all), a failing task never
/// short-circuits its siblings: each task resolves to a `Result` *value*,
/// so the fan-in primitive underneath has nothing to abort on. The returned
/// [`BatchOutcome`] pairs the error and result collections, shape-matched
/// to the input -- a sequence in, sequence collections out; a mapping in,
/// mapping collections out with the same keys.
///
/// The tasks are polled cooperatively from the caller's own task; nothing
/// is spawned, no runtime is required, and completion order does not affect
/// slot order. An empty batch resolves immediately with no errors and an
/// empty result collection of the matching shape. Discarding the returned
/// outcome is the fire-and-forget form: the tasks still ran to completion.
///
/// # Examples
///
/// ```
/// use futures::FutureExt;
/// use parallel_rollback::{parallel_all, Batch};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let outcome = parallel_all(Batch::mapping([
///     ("fetch", async { Ok::<_, String>(200) }.boxed()),
///     ("store", async { Err("connection reset".to_string()) }.boxed()),
/// ]))
/// .await;
///
/// assert!(!outcome.is_success());
/// assert_eq!(
///     outcome.results,
///     Batch::mapping([("fetch", Some(200)), ("store", None)]),
/// );
/// # }
/// ```
pub async fn parallel_all<T, E>(tasks: impl Into<Batch<TaskFuture<T, E>>>) -> BatchOutcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    let batch = tasks.into();
    tracing::debug!(tasks = batch.len(), "running task batch to completion");

    let settled = match batch {
        Batch::Sequence(actions) => Batch::Sequence(join_all(actions).await),
        Batch::Mapping(actions) => {
            let (keys, actions): (Vec<_>, Vec<_>) = actions.into_iter().unzip();
            let settled = join_all(actions).await;
            Batch::Mapping(keys.into_iter().zip(settled).collect())
        }
    };

    let outcome = BatchOutcome::from_settled(settled);
    if !outcome.is_success() {
        tracing::debug!(
            failed = outcome.failure_count(),
            total = outcome.results.len(),
            "task batch completed with failures"
        );
    }
    outcome
}
