//! Rollback coordination: compensate committed tasks when siblings fail.

use futures::future::join_all;

use crate::aggregate::parallel_all;
use crate::batch::Batch;
use crate::outcome::BatchOutcome;
use crate::task::{RollbackTask, TaskFuture};

/// Runs every task in the batch concurrently and, if any of them failed,
/// invokes the compensating actions of the tasks that succeeded.
///
/// The run itself is [`parallel_all`] on the tasks' actions, and the
/// reported [`BatchOutcome`] is that aggregation, returned unchanged --
/// compensation never rewrites history. On an all-success run this function
/// is observably identical to calling [`parallel_all`] on the bare actions.
///
/// When at least one task fails, each task that succeeded *and* carries a
/// compensating action has that action invoked exactly once, with a clone
/// of its success value; the compensations run concurrently, only after the
/// whole initial batch has settled. Failed tasks committed nothing and are
/// never compensated; successful tasks without a compensating action are
/// skipped. Compensation outcomes are observed and dropped: cleanup is
/// best-effort, and a compensation failure neither surfaces in the
/// returned outcome nor aborts its sibling compensations. A
/// compensating action that never completes leaves this call pending;
/// bounding that wait is the caller's responsibility, per task.
///
/// # Examples
///
/// ```
/// use parallel_rollback::{parallel_rollback, Batch, RollbackTask};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let outcome = parallel_rollback(vec![
///     RollbackTask::new(async { Ok::<_, String>("lease-42") })
///         .with_undo(|lease| async move {
///             // return the lease that the failing batch cannot use
///             let _ = lease;
///             Ok(())
///         }),
///     RollbackTask::new(async { Err("quota exceeded".to_string()) }),
/// ])
/// .await;
///
/// assert_eq!(outcome.failure_count(), 1);
/// assert_eq!(outcome.results, Batch::sequence([Some("lease-42"), None]));
/// # }
/// ```
pub async fn parallel_rollback<T, E>(
    tasks: impl Into<Batch<RollbackTask<T, E>>>,
) -> BatchOutcome<T, E>
where
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    let batch = tasks.into();
    let (actions, compensations) = batch.unzip(|task| (task.action, task.compensation));

    let outcome = parallel_all(actions).await;
    if outcome.is_success() {
        return outcome;
    }

    // Compensate only tasks that committed a success; failed tasks produced
    // nothing to undo, and successful tasks without an undo are skipped.
    let scheduled: Vec<TaskFuture<(), E>> = compensations
        .into_values()
        .zip(outcome.results.values())
        .filter_map(|(compensation, result)| match (compensation, result) {
            (Some(undo), Some(value)) => Some(undo(value.clone())),
            _ => None,
        })
        .collect();

    if scheduled.is_empty() {
        return outcome;
    }

    tracing::debug!(
        compensations = scheduled.len(),
        "batch failed; compensating the tasks that succeeded"
    );
    // Compensation outcomes are observed here and dropped; they never reach
    // the caller.
    let _ = join_all(scheduled).await;
    outcome
}
