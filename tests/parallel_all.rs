//! Behavioral tests for `parallel_all`.
//!
//! Covers all-results aggregation over both batch shapes, equivalence with
//! the abort-on-first-error primitive on clean runs, no-short-circuit
//! semantics when a task fails early, and the fire-and-forget form.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use futures::FutureExt;
use parallel_rollback::{parallel_all, Batch, TaskFuture};
use pretty_assertions::assert_eq;

/// Builds a task that settles with `result` after `delay_ms` milliseconds.
fn sample_task<T: Send + 'static>(
    result: Result<T, &'static str>,
    delay_ms: u64,
) -> TaskFuture<T, &'static str> {
    async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        result
    }
    .boxed()
}

/// Three tasks that all succeed, finishing in reverse input order.
fn success_tasks() -> Vec<TaskFuture<i32, &'static str>> {
    vec![
        sample_task(Ok(1), 30),
        sample_task(Ok(2), 20),
        sample_task(Ok(3), 10),
    ]
}

/// Three tasks where the middle one fails before its siblings finish.
fn failing_tasks() -> Vec<TaskFuture<i32, &'static str>> {
    vec![
        sample_task(Ok(1), 30),
        sample_task(Err("two broke"), 20),
        sample_task(Ok(3), 10),
    ]
}

/// Keys a task list as `one`/`two`/`three`, in order.
fn keyed(tasks: Vec<TaskFuture<i32, &'static str>>) -> Batch<TaskFuture<i32, &'static str>> {
    Batch::mapping(["one", "two", "three"].into_iter().zip(tasks))
}

// ─── Sequence-shaped batches ────────────────────────────────────────────────

#[tokio::test]
async fn all_success_matches_the_abort_on_first_error_primitive() {
    let outcome = parallel_all(success_tasks()).await;
    let reference = try_join_all(success_tasks())
        .await
        .expect("every task succeeds");

    assert!(outcome.is_success());
    assert_eq!(outcome.errors, None);
    assert_eq!(outcome.into_result().unwrap(), Batch::sequence(reference));
}

#[tokio::test]
async fn failures_are_reported_by_position_without_aborting_siblings() {
    let outcome = parallel_all(failing_tasks()).await;

    // Task `one` finished 10ms after `two` failed; its result proves the
    // failure cancelled nothing.
    assert_eq!(
        outcome.errors,
        Some(Batch::sequence([None, Some("two broke"), None]))
    );
    assert_eq!(outcome.results, Batch::sequence([Some(1), None, Some(3)]));
}

// ─── Mapping-shaped batches ─────────────────────────────────────────────────

#[tokio::test]
async fn keyed_all_success_keeps_keys_in_input_order() {
    let outcome = parallel_all(keyed(success_tasks())).await;

    assert!(outcome.is_success());
    assert_eq!(
        outcome.results,
        Batch::mapping([("one", Some(1)), ("two", Some(2)), ("three", Some(3))])
    );
    assert_eq!(
        serde_json::to_string(&outcome.results).unwrap(),
        r#"{"one":1,"two":2,"three":3}"#
    );
}

#[tokio::test]
async fn keyed_failures_are_reported_by_key() {
    let outcome = parallel_all(keyed(failing_tasks())).await;

    assert_eq!(
        outcome.errors,
        Some(Batch::mapping([
            ("one", None),
            ("two", Some("two broke")),
            ("three", None),
        ]))
    );
    assert_eq!(
        outcome.results,
        Batch::mapping([("one", Some(1)), ("two", None), ("three", Some(3))])
    );
    assert_eq!(
        serde_json::to_string(&outcome.errors).unwrap(),
        r#"{"one":null,"two":"two broke","three":null}"#
    );
}

// ─── Completion semantics ───────────────────────────────────────────────────

#[tokio::test]
async fn discarded_outcomes_still_run_every_task() {
    let completions = Arc::new(AtomicUsize::new(0));
    let tasks: Vec<TaskFuture<(), &'static str>> = (0..3)
        .map(|_| {
            let completions = completions.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                completions.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            .boxed()
        })
        .collect();

    let _ = parallel_all(tasks).await;
    assert_eq!(completions.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn immediately_ready_failures_count_like_delayed_ones() {
    let outcome = parallel_all(vec![
        futures::future::ready(Err::<i32, _>("went wrong at once")).boxed(),
        sample_task(Ok(2), 10),
    ])
    .await;

    assert_eq!(
        outcome.errors,
        Some(Batch::sequence([Some("went wrong at once"), None]))
    );
    assert_eq!(outcome.results, Batch::sequence([None, Some(2)]));
}

#[tokio::test]
async fn empty_batches_report_no_errors_and_an_empty_matching_shape() {
    let sequence = parallel_all(Vec::<TaskFuture<i32, &'static str>>::new()).await;
    assert_eq!(sequence.errors, None);
    assert_eq!(sequence.results, Batch::sequence(Vec::<Option<i32>>::new()));

    let mapping = parallel_all(Batch::mapping(
        Vec::<(String, TaskFuture<i32, &'static str>)>::new(),
    ))
    .await;
    assert_eq!(mapping.errors, None);
    assert_eq!(
        mapping.results,
        Batch::mapping(Vec::<(String, Option<i32>)>::new())
    );
}
