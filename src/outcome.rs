//! Aggregated batch outcomes.
//!
//! [`BatchOutcome`] is the terminal report of a batch run: a per-task error
//! collection and a per-task result collection, both shape-matched to the
//! input batch. [`BatchFailure`] is the same information re-expressed as a
//! [`std::error::Error`] for callers that want to short-circuit with `?`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::batch::Batch;

/// The terminal report of a batch run.
///
/// Exactly one of the following holds for every slot: the task failed and
/// its error sits in `errors`, or the task succeeded and its value sits in
/// `results`. When *zero* tasks failed, `errors` is `None` as a whole --
/// not a collection of `None` slots -- so "nothing failed" is
/// distinguishable from "failures with empty errors" at the type level.
///
/// # Examples
///
/// ```
/// use futures::FutureExt;
/// use parallel_rollback::{parallel_all, Batch};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let outcome = parallel_all(vec![
///     async { Ok::<_, String>(1) }.boxed(),
///     async { Err("disk full".to_string()) }.boxed(),
/// ])
/// .await;
///
/// assert_eq!(outcome.failure_count(), 1);
/// assert_eq!(outcome.results, Batch::sequence([Some(1), None]));
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome<T, E> {
    /// Per-task errors, shape-matched to the input. `None` when every task
    /// succeeded; otherwise a slot is `Some` iff that task failed.
    pub errors: Option<Batch<Option<E>>>,
    /// Per-task results, shape-matched to the input. A slot is `Some` iff
    /// that task succeeded, regardless of how its siblings fared.
    pub results: Batch<Option<T>>,
}

impl<T, E> BatchOutcome<T, E> {
    /// Splits a batch of settled `Result`s into the error/result pair,
    /// applying the errors-absent-on-success rule.
    pub(crate) fn from_settled(settled: Batch<Result<T, E>>) -> Self {
        let any_failed = settled.values().any(|record| record.is_err());
        let (errors, results) = settled.unzip(|record| match record {
            Ok(value) => (None, Some(value)),
            Err(error) => (Some(error), None),
        });
        Self {
            errors: any_failed.then_some(errors),
            results,
        }
    }

    /// Returns `true` if every task in the batch succeeded.
    pub fn is_success(&self) -> bool {
        self.errors.is_none()
    }

    /// Number of tasks that failed.
    pub fn failure_count(&self) -> usize {
        self.errors
            .as_ref()
            .map_or(0, |errors| errors.values().filter(|slot| slot.is_some()).count())
    }

    /// Converts the outcome into a `Result` for `?`-style handling.
    ///
    /// On success the result slots are unwrapped into a plain value batch;
    /// on failure the full error collection and the partial results are
    /// returned as a [`BatchFailure`].
    ///
    /// # Panics
    ///
    /// Panics if the outcome was assembled by hand in violation of the
    /// pairing invariant (no `errors`, yet a missing result slot). Outcomes
    /// produced by this crate always uphold the invariant.
    pub fn into_result(self) -> Result<Batch<T>, BatchFailure<T, E>> {
        match self.errors {
            Some(errors) => Err(BatchFailure {
                errors,
                results: self.results,
            }),
            None => Ok(self
                .results
                .map(|slot| slot.expect("outcome without errors holds a result in every slot"))),
        }
    }
}

/// A failed batch, as an error value.
///
/// Carries the shape-matched per-task error collection (at least one slot
/// is `Some`) together with the partial results of the tasks that
/// succeeded, so nothing is lost by converting an outcome into a `Result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure<T, E> {
    /// Per-task errors; a slot is `Some` iff that task failed.
    pub errors: Batch<Option<E>>,
    /// Per-task partial results; a slot is `Some` iff that task succeeded.
    pub results: Batch<Option<T>>,
}

impl<T, E> BatchFailure<T, E> {
    /// Number of tasks that failed.
    pub fn failure_count(&self) -> usize {
        self.errors.values().filter(|slot| slot.is_some()).count()
    }
}

impl<T, E> fmt::Display for BatchFailure<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} batch tasks failed",
            self.failure_count(),
            self.errors.len()
        )
    }
}

impl<T: fmt::Debug, E: fmt::Debug> std::error::Error for BatchFailure<T, E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settled_successes_leave_errors_absent() {
        let outcome = BatchOutcome::<i32, String>::from_settled(Batch::sequence([Ok(1), Ok(2)]));
        assert!(outcome.is_success());
        assert_eq!(outcome.errors, None);
        assert_eq!(outcome.results, Batch::sequence([Some(1), Some(2)]));
        assert_eq!(outcome.failure_count(), 0);
    }

    #[test]
    fn settled_failures_fill_matching_slots() {
        let outcome = BatchOutcome::from_settled(Batch::mapping([
            ("one", Ok(1)),
            ("two", Err("broke")),
            ("three", Ok(3)),
        ]));
        assert_eq!(
            outcome.errors,
            Some(Batch::mapping([
                ("one", None),
                ("two", Some("broke")),
                ("three", None),
            ]))
        );
        assert_eq!(
            outcome.results,
            Batch::mapping([("one", Some(1)), ("two", None), ("three", Some(3))])
        );
        assert_eq!(outcome.failure_count(), 1);
    }

    #[test]
    fn into_result_unwraps_a_clean_batch() {
        let outcome = BatchOutcome::<i32, String>::from_settled(Batch::sequence([Ok(1), Ok(2)]));
        assert_eq!(outcome.into_result().unwrap(), Batch::sequence([1, 2]));
    }

    #[test]
    fn into_result_surfaces_failures_with_partial_results() {
        let outcome =
            BatchOutcome::from_settled(Batch::sequence([Ok(1), Err("broke"), Err("also broke")]));
        let failure = outcome.into_result().unwrap_err();
        assert_eq!(failure.failure_count(), 2);
        assert_eq!(
            failure.results,
            Batch::sequence([Some(1), None, None])
        );
        assert_eq!(failure.to_string(), "2 of 3 batch tasks failed");
    }

    #[test]
    fn failure_is_a_sendable_error() {
        fn assert_error<T: std::error::Error + Send + Sync>() {}
        assert_error::<BatchFailure<i32, String>>();
    }
}
