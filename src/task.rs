//! Task building blocks: boxed task futures and rollback-capable tasks.
//!
//! A task is any future resolving to `Result<T, E>`; [`TaskFuture`] is its
//! boxed form, built with [`FutureExt::boxed`](futures::FutureExt::boxed).
//! [`RollbackTask`] pairs a task with an optional compensating action and is
//! the canonical record the rollback coordinator works with: bare actions
//! and `{action, undo}` pairs are both normalized into it synchronously,
//! before any concurrency starts, and that normalization cannot fail.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;

/// A boxed asynchronous task resolving to success-with-value or
/// failure-with-error.
///
/// The completion is always delivered as a [`Result`] value. There is no
/// channel through which an individual task could abort its batch: the
/// aggregator's fan-in primitive only ever sees futures that resolve.
pub type TaskFuture<T, E> = BoxFuture<'static, Result<T, E>>;

/// Boxed compensating action, invoked with the success value of its task.
pub(crate) type Compensation<T, E> = Box<dyn FnOnce(T) -> TaskFuture<(), E> + Send>;

/// A task paired with an optional compensating action.
///
/// The compensating action receives the task's success value and reverses
/// the task's side effects. It only runs when the task succeeded but the
/// enclosing batch reported at least one failure, and its own outcome is
/// observed but never surfaced by the coordinator.
///
/// # Examples
///
/// ```
/// use parallel_rollback::RollbackTask;
///
/// // A bare action: nothing to undo.
/// let plain = RollbackTask::new(async { Ok::<_, String>(7) });
/// assert!(!plain.has_undo());
///
/// // An action that knows how to reverse itself.
/// let undoable = RollbackTask::new(async { Ok::<_, String>(7) })
///     .with_undo(|value| async move {
///         let _ = value; // release what the action acquired
///         Ok(())
///     });
/// assert!(undoable.has_undo());
/// ```
pub struct RollbackTask<T, E> {
    pub(crate) action: TaskFuture<T, E>,
    pub(crate) compensation: Option<Compensation<T, E>>,
}

impl<T, E> RollbackTask<T, E> {
    /// Wraps a bare action with no compensating action.
    pub fn new<F>(action: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            action: Box::pin(action),
            compensation: None,
        }
    }

    /// Attaches the compensating action, replacing any previous one.
    ///
    /// `undo` is called with the task's success value and returns the
    /// future performing the reversal. Its `Result` is swallowed by the
    /// coordinator; reversal is best-effort.
    pub fn with_undo<U, Fut>(mut self, undo: U) -> Self
    where
        U: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
    {
        self.compensation = Some(Box::new(move |value: T| -> TaskFuture<(), E> {
            Box::pin(undo(value))
        }));
        self
    }

    /// Returns `true` if a compensating action is attached.
    pub fn has_undo(&self) -> bool {
        self.compensation.is_some()
    }
}

impl<T, E> From<TaskFuture<T, E>> for RollbackTask<T, E> {
    /// Normalizes an already-boxed bare action.
    fn from(action: TaskFuture<T, E>) -> Self {
        Self {
            action,
            compensation: None,
        }
    }
}

impl<T, E> fmt::Debug for RollbackTask<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollbackTask")
            .field("has_undo", &self.compensation.is_some())
            .finish_non_exhaustive()
    }
}
