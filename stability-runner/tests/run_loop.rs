//! Run-loop behavior: failure isolation, fatal exhaustion, and the
//! end-to-end five-iteration scenario.

use std::collections::VecDeque;
use std::sync::Mutex;

use llm_query::{ProviderError, ProviderErrorKind, QueryOutcome, QueryRequest};
use stability_runner::{
    IterationFailure, NoopObserver, QueryBackend, RunError, RunObserver, RunOptions,
    run_stability,
};

/// Backend replaying a fixed script of outcomes, one per iteration.
struct ScriptedBackend {
    replies: Mutex<VecDeque<llm_query::Result<QueryOutcome>>>,
}

impl ScriptedBackend {
    fn new(replies: Vec<llm_query::Result<QueryOutcome>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

impl QueryBackend for ScriptedBackend {
    async fn query(&self, _req: &QueryRequest) -> llm_query::Result<QueryOutcome> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted")
    }
}

#[derive(Default)]
struct RecordingObserver {
    progress: Mutex<Vec<(u32, u32)>>,
    failures: Mutex<Vec<u32>>,
}

impl RunObserver for RecordingObserver {
    fn on_progress(&self, done: u32, total: u32) {
        self.progress.lock().unwrap().push((done, total));
    }

    fn on_error(&self, failure: &IterationFailure) {
        self.failures.lock().unwrap().push(failure.iteration);
    }
}

fn ok(text: &str) -> llm_query::Result<QueryOutcome> {
    Ok(QueryOutcome {
        text: text.to_string(),
        latency_ms: 42,
        citations: vec![],
    })
}

fn err() -> llm_query::Result<QueryOutcome> {
    Err(ProviderError::new("test", ProviderErrorKind::EmptyCompletion).into())
}

fn options(iterations: u32) -> RunOptions {
    RunOptions {
        prompt: "What is the best project management tool?".into(),
        model: "test-model".into(),
        iterations,
        delay_ms: 0,
        ..RunOptions::default()
    }
}

const ASANA_REPLY: &str = "**I recommend Asana** for task management because it is simple to \
                           adopt. Asana also offers excellent reporting dashboards.";
const TRELLO_REPLY: &str = "Trello provides kanban boards and a generous free plan.";

#[tokio::test]
async fn all_failed_iterations_are_fatal() {
    let backend = ScriptedBackend::new(vec![err(), err(), err()]);
    let result = run_stability(&backend, &options(3), None, &NoopObserver).await;

    match result {
        Err(RunError::AllIterationsFailed {
            attempted,
            first_message,
        }) => {
            assert_eq!(attempted, 3);
            assert!(first_message.contains("empty completion"));
        }
        other => panic!("expected AllIterationsFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn partial_failures_isolate_and_reach_the_observer() {
    let backend = ScriptedBackend::new(vec![
        ok(ASANA_REPLY),
        err(),
        ok(ASANA_REPLY),
        err(),
        ok(ASANA_REPLY),
    ]);
    let observer = RecordingObserver::default();

    let result = run_stability(&backend, &options(5), None, &observer)
        .await
        .expect("three iterations succeeded");

    assert_eq!(result.metadata.iterations, 3);
    assert_eq!(result.metadata.requested_iterations, 5);
    assert_eq!(*observer.failures.lock().unwrap(), vec![2, 4]);

    let progress = observer.progress.lock().unwrap();
    assert_eq!(progress.len(), 5, "progress fires for failed iterations too");
    assert_eq!(progress.last(), Some(&(5, 5)));
}

#[tokio::test]
async fn zero_iterations_never_queries() {
    // An exhausted script panics on any query; validation must reject
    // the options before the loop starts.
    let backend = ScriptedBackend::new(vec![]);
    let result = run_stability(&backend, &options(0), None, &NoopObserver).await;
    assert!(matches!(result, Err(RunError::Config(_))));
}

#[tokio::test]
async fn five_iteration_scenario_classifies_and_scores() {
    let backend = ScriptedBackend::new(vec![
        ok(ASANA_REPLY),
        ok(ASANA_REPLY),
        ok(ASANA_REPLY),
        ok(ASANA_REPLY),
        ok(TRELLO_REPLY),
    ]);
    let mut opts = options(5);
    opts.brand = Some("Asana".into());

    let result = run_stability(&backend, &opts, None, &NoopObserver)
        .await
        .expect("all iterations succeeded");

    // Two sentences repeated in 4 of 5 responses: both are core at 80%.
    assert_eq!(result.messages.core.len(), 2);
    for core in &result.messages.core {
        assert!((core.frequency_pct - 80.0).abs() < 1e-9);
    }

    // The Trello reply appears once: outlier at 20%.
    assert_eq!(result.messages.outliers.len(), 1);
    assert!(result.messages.outliers[0].message.contains("trello"));
    assert!((result.messages.outliers[0].frequency_pct - 20.0).abs() < 1e-9);
    assert!(result.messages.variable.is_empty());

    // "Asana" appears twice per mentioning response, never in Trello's.
    assert_eq!(result.brand_stats.total, 8);
    assert_eq!(result.brand_stats.min, 0);
    assert_eq!(result.brand_stats.max, 2);
    assert!((result.brand_stats.mean - 1.6).abs() < 1e-9);
    assert_eq!(result.brand_stats.contexts.len(), 8);

    // 4 positive responses ("excellent"), 1 neutral.
    assert!((result.sentiment.positive_pct - 80.0).abs() < 1e-9);
    assert!((result.sentiment.neutral_pct - 20.0).abs() < 1e-9);

    assert_eq!(result.metadata.iterations, 5);
    assert!(result.consistency_score >= 50);
    assert!(result.semantic_overlap > 50.0 && result.semantic_overlap < 100.0);

    // Markdown was stripped before analysis.
    assert!(!result.messages.core[0].message.contains('*'));

    // The result is a serializable contract, not just an in-memory view.
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["metadata"]["iterations"], 5);
    assert_eq!(json["metadata"]["search_mode"], false);
}
