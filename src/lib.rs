//! Run batches of independent asynchronous tasks to completion, collect
//! per-task outcomes without aborting on the first failure, and compensate
//! the tasks that succeeded when any sibling fails.
//!
//! # Overview
//!
//! Abort-on-first-error combinators are the wrong tool when a batch of
//! tasks commits side effects: cancelling the survivors tells you nothing
//! about what already happened, and the effects of the tasks that finished
//! are left dangling. This crate runs every task to completion and reports
//! a per-task error collection alongside a per-task result collection, both
//! shape-matched to the input ([`parallel_all`]). On top of that,
//! [`parallel_rollback`] accepts tasks carrying an optional compensating
//! action and, when the batch reports any failure, invokes the undo of
//! every task that succeeded -- best-effort, concurrently, and without
//! ever rewriting the batch's reported outcome.
//!
//! A batch is either an ordered sequence or a keyed mapping ([`Batch`]);
//! the shape is preserved through the whole pipeline. Tasks are plain
//! futures resolving to `Result`, boxed with
//! [`FutureExt::boxed`](futures::FutureExt::boxed); nothing is spawned, so
//! any executor can drive the returned futures.
//!
//! # Examples
//!
//! ```
//! use parallel_rollback::{parallel_rollback, Batch, RollbackTask};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let outcome = parallel_rollback(Batch::mapping([
//!     (
//!         "reserve",
//!         RollbackTask::new(async { Ok::<_, String>(11) })
//!             .with_undo(|id| async move {
//!                 // cancel reservation `id`
//!                 let _ = id;
//!                 Ok(())
//!             }),
//!     ),
//!     (
//!         "charge",
//!         RollbackTask::new(async { Err("card declined".to_string()) }),
//!     ),
//! ]))
//! .await;
//!
//! // The reservation succeeded, the charge failed, and the reservation's
//! // undo has already run by the time the outcome is delivered.
//! assert_eq!(
//!     outcome.results,
//!     Batch::mapping([("reserve", Some(11)), ("charge", None)]),
//! );
//! assert_eq!(outcome.failure_count(), 1);
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`batch`] - Shape-preserving sequence/mapping collections
//! - [`task`] - Boxed task futures and rollback-capable tasks
//! - [`aggregate`] - [`parallel_all`], the run-everything aggregator
//! - [`rollback`] - [`parallel_rollback`], the compensation coordinator
//! - [`outcome`] - Outcome records and their error form

pub mod aggregate;
pub mod batch;
pub mod outcome;
pub mod rollback;
pub mod task;

// Re-exports for ergonomic access
pub use aggregate::parallel_all;
pub use batch::Batch;
pub use outcome::{BatchFailure, BatchOutcome};
pub use rollback::parallel_rollback;
pub use task::{RollbackTask, TaskFuture};
