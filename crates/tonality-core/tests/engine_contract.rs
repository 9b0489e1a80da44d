//! Engine-level behavior contracts: the concurrency ceiling, policy
//! semantics, cancellation, and the aggregation arithmetic as observed
//! through the public API.

use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tonality_core::config::EngineConfig;
use tonality_core::engine::{FailurePolicy, Orchestrator};
use tonality_core::errors::BatchError;
use tonality_core::model::AggregateOutcome;
use tonality_core::providers::ScriptedScorer;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn comments(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}

fn config(limit: usize, policy: FailurePolicy) -> EngineConfig {
    EngineConfig {
        max_concurrency: limit,
        failure_policy: policy,
        deadline_ms: None,
    }
}

#[tokio::test]
async fn ceiling_holds_when_the_batch_is_larger() {
    init_logging();
    let scorer = Arc::new(
        ScriptedScorer::new()
            .with_fallback(0.3)
            .with_delay(Duration::from_millis(5)),
    );
    let orchestrator = Orchestrator::new(
        scorer.clone(),
        config(4, FailurePolicy::FailFast),
    );

    let many: Vec<String> = (0..30).map(|i| format!("comment {i}")).collect();
    let outcome = orchestrator.analyze(&many, "").await.unwrap();

    assert!(outcome.score_available);
    assert_eq!(scorer.started(), 30);
    assert!(
        scorer.peak_in_flight() <= 4,
        "ceiling exceeded: {}",
        scorer.peak_in_flight()
    );
}

#[tokio::test]
async fn mid_run_cancellation_drains_what_already_started() {
    init_logging();
    // limit 1 serializes the batch; the cancel lands somewhere in the middle.
    let scorer = Arc::new(
        ScriptedScorer::new()
            .with_fallback(0.3)
            .with_delay(Duration::from_millis(25)),
    );
    let orchestrator = Orchestrator::new(scorer.clone(), config(1, FailurePolicy::FailFast));

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(40)).await;
        trigger.cancel();
    });

    let batch = comments(&["a", "b", "c", "d", "e", "f"]);
    let err = orchestrator
        .analyze_with_cancel(&batch, "", &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, BatchError::Cancelled));
    assert!(scorer.started() < 6, "cancel never took effect");
    // Whatever started also finished: cancellation never abandons a call.
    assert_eq!(scorer.started(), scorer.completed());
}

#[tokio::test]
async fn cancel_after_the_last_dispatch_changes_nothing() {
    let scorer = Arc::new(ScriptedScorer::new().with_fallback(0.2));
    let orchestrator = Orchestrator::new(scorer.clone(), config(8, FailurePolicy::FailFast));

    let cancel = CancellationToken::new();
    let batch = comments(&["a", "b", "c"]);
    let outcome = orchestrator
        .analyze_with_cancel(&batch, "", &cancel)
        .await
        .unwrap();
    // Too late to matter.
    cancel.cancel();

    assert_eq!(outcome.final_score, Some(0.2));
    assert_eq!(scorer.started(), 3);
}

#[tokio::test]
async fn deadline_expiry_abandons_in_flight_calls() {
    init_logging();
    let scorer = Arc::new(
        ScriptedScorer::new()
            .with_fallback(0.5)
            .with_delay(Duration::from_secs(30)),
    );
    let cfg = EngineConfig {
        max_concurrency: 2,
        failure_policy: FailurePolicy::FailFast,
        deadline_ms: Some(50),
    };
    let orchestrator = Orchestrator::new(scorer.clone(), cfg);

    let err = orchestrator
        .analyze(&comments(&["hung"]), "")
        .await
        .unwrap_err();

    assert!(matches!(err, BatchError::DeadlineExceeded { .. }));
    // The hung call was dropped mid-flight, unlike every other exit path.
    assert_eq!(scorer.started(), 1);
    assert_eq!(scorer.completed(), 0);
}

#[tokio::test]
async fn retry_once_hides_a_transient_failure_from_the_batch() {
    let scorer = Arc::new(
        ScriptedScorer::new()
            .with_fail_then_score("flaky", "blip", 0.8)
            .with_fallback(0.4),
    );
    let orchestrator = Orchestrator::new(scorer.clone(), config(4, FailurePolicy::RetryOnce));

    let outcome = orchestrator
        .analyze(&comments(&["flaky", "steady"]), "")
        .await
        .unwrap();

    // (0.8 + 0.4) / 2
    let score = outcome.final_score.unwrap();
    assert!((score - 0.6).abs() < 1e-6, "got {score}");
    assert_eq!(scorer.started(), 3);
}

#[tokio::test]
async fn fail_fast_reports_the_first_failure_not_the_count() {
    let scorer = Arc::new(
        ScriptedScorer::new()
            .with_failure("bad-1", "backend down")
            .with_failure("bad-2", "backend down")
            .with_fallback(0.1),
    );
    let orchestrator = Orchestrator::new(scorer, config(1, FailurePolicy::FailFast));

    let err = orchestrator
        .analyze(&comments(&["bad-1", "bad-2", "fine"]), "")
        .await
        .unwrap_err();

    assert_eq!(err.kind_str(), "scoring");
    assert!(err.to_string().contains("t0"), "unexpected error: {err}");
}

fn run_analysis(
    comment_scores: &[f32],
    caption_score: Option<f32>,
) -> Result<AggregateOutcome, BatchError> {
    let mut scorer = ScriptedScorer::new();
    let mut texts = Vec::new();
    for (i, score) in comment_scores.iter().enumerate() {
        let text = format!("comment {i}");
        scorer = scorer.with_score(&text, *score);
        texts.push(text);
    }
    let caption = match caption_score {
        Some(score) => {
            scorer = scorer.with_score("the caption", score);
            "the caption"
        }
        None => "",
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let orchestrator = Orchestrator::new(Arc::new(scorer), EngineConfig::default());
    rt.block_on(orchestrator.analyze(&texts, caption))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn combination_matches_the_closed_form(
        comment_scores in proptest::collection::vec(-1.0f32..=1.0, 0..6),
        caption_score in proptest::option::of(-1.0f32..=1.0),
    ) {
        let outcome = run_analysis(&comment_scores, caption_score).unwrap();

        if comment_scores.is_empty() && caption_score.is_none() {
            prop_assert!(!outcome.score_available);
            prop_assert_eq!(outcome.final_score, None);
        } else {
            let comment_mean = if comment_scores.is_empty() {
                None
            } else {
                let sum: f32 = comment_scores.iter().sum();
                Some(sum / comment_scores.len() as f32)
            };
            let expected = match (comment_mean, caption_score) {
                (Some(c), Some(cap)) => (c + cap) / 2.0,
                (Some(c), None) => c,
                (None, Some(cap)) => cap,
                (None, None) => unreachable!(),
            };
            prop_assert!(outcome.score_available);
            let got = outcome.final_score.unwrap();
            prop_assert!((got - expected).abs() < 1e-5, "got {}, expected {}", got, expected);
        }
    }

    #[test]
    fn final_scores_stay_in_range(
        comment_scores in proptest::collection::vec(-1.0f32..=1.0, 1..6),
        caption_score in proptest::option::of(-1.0f32..=1.0),
    ) {
        let outcome = run_analysis(&comment_scores, caption_score).unwrap();
        let score = outcome.final_score.unwrap();
        prop_assert!((-1.0..=1.0).contains(&score), "out of range: {}", score);
    }
}
