//! End-to-end driver for one video's scoring request.

use crate::config::EngineConfig;
use crate::engine::aggregate;
use crate::engine::pool::BoundedWorkerPool;
use crate::errors::{BatchError, BatchResult};
use crate::model::AggregateOutcome;
use crate::providers::SentimentScorer;
use crate::tasks;
use std::sync::Arc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// Runs one scoring request end to end: build the tasks, dispatch them to
/// the bounded pool, aggregate the scores. Each call handles exactly one
/// video and runs it exactly once; there is no retry beyond what the
/// configured failure policy does per call.
pub struct Orchestrator {
    scorer: Arc<dyn SentimentScorer>,
    config: EngineConfig,
}

impl Orchestrator {
    pub fn new(scorer: Arc<dyn SentimentScorer>, config: EngineConfig) -> Self {
        Self { scorer, config }
    }

    /// Score a video from its comments and caption text.
    pub async fn analyze(&self, comments: &[String], caption: &str) -> BatchResult<AggregateOutcome> {
        self.analyze_with_cancel(comments, caption, &CancellationToken::new())
            .await
    }

    /// Like [`Orchestrator::analyze`], with a caller-supplied cancel token.
    ///
    /// Cancellation stops new task starts and fails the batch; it never cuts
    /// short a scoring call that already began. A token that fires after the
    /// last task started has no effect on the batch.
    pub async fn analyze_with_cancel(
        &self,
        comments: &[String],
        caption: &str,
        cancel: &CancellationToken,
    ) -> BatchResult<AggregateOutcome> {
        let batch = tasks::build(comments, caption);
        if batch.is_empty() {
            // An empty-input video never reaches the pool.
            tracing::debug!("no comments or caption, skipping dispatch");
            return Ok(AggregateOutcome::no_data());
        }
        let total = batch.len();
        tracing::debug!(
            tasks = total,
            limit = self.config.max_concurrency,
            policy = self.config.failure_policy.as_str(),
            "dispatching scoring batch"
        );

        let pool = BoundedWorkerPool::new(Arc::clone(&self.scorer), self.config.max_concurrency)
            .with_policy(self.config.failure_policy);

        let run = pool.run(batch, cancel);
        let results = match self.config.deadline() {
            // Expiry drops the pool future, the one path that abandons
            // in-flight scoring calls; see the config field docs.
            Some(limit) => timeout(limit, run)
                .await
                .map_err(|_| BatchError::DeadlineExceeded { limit })??,
            None => run.await?,
        };

        let failures = results.iter().filter(|r| r.outcome.is_failure()).count();
        if failures > 0 {
            // Only reachable under best-effort; the halting policies already
            // failed the batch inside the pool.
            tracing::warn!(failed = failures, total, "aggregating partial results");
        }

        match aggregate::combine(&results) {
            Some(score) => Ok(AggregateOutcome::available(score)),
            None => match results.iter().find(|r| r.outcome.is_failure()) {
                Some(first) => {
                    let cause = first.outcome.failure_cause().unwrap_or("unknown").to_string();
                    Err(BatchError::scoring(first.task_id, first.category, cause))
                }
                None => Err(BatchError::pool("no results for a non-empty batch")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pool::FailurePolicy;
    use crate::providers::ScriptedScorer;

    fn comments(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn orchestrator_with(scorer: ScriptedScorer, config: EngineConfig) -> Orchestrator {
        Orchestrator::new(Arc::new(scorer), config)
    }

    #[tokio::test]
    async fn comments_only_video_gets_the_comment_mean() {
        let scorer = ScriptedScorer::new()
            .with_score("loved it", 0.8)
            .with_score("not great", -0.2);
        let orchestrator = orchestrator_with(scorer, EngineConfig::default());

        let outcome = orchestrator
            .analyze(&comments(&["loved it", "not great"]), "")
            .await
            .unwrap();
        assert!(outcome.score_available);
        let score = outcome.final_score.unwrap();
        assert!((score - 0.3).abs() < 1e-6, "got {score}");
    }

    #[tokio::test]
    async fn caption_only_video_gets_the_caption_score() {
        let scorer = ScriptedScorer::new().with_score("welcome back", 0.9);
        let orchestrator = orchestrator_with(scorer, EngineConfig::default());

        let outcome = orchestrator.analyze(&[], "welcome back").await.unwrap();
        assert_eq!(outcome.final_score, Some(0.9));
        assert!(outcome.score_available);
    }

    #[tokio::test]
    async fn both_sides_average_to_the_midpoint() {
        let scorer = ScriptedScorer::new()
            .with_score("nice", 0.6)
            .with_score("meh", 0.2)
            .with_score("the caption", -0.4);
        let orchestrator = orchestrator_with(scorer, EngineConfig::default());

        let outcome = orchestrator
            .analyze(&comments(&["nice", "meh"]), "the caption")
            .await
            .unwrap();
        // comment mean 0.4, caption -0.4
        let score = outcome.final_score.unwrap();
        assert!(score.abs() < 1e-6, "got {score}");
    }

    #[tokio::test]
    async fn empty_video_reports_no_data_without_dispatching() {
        let scorer = ScriptedScorer::new();
        let orchestrator = Orchestrator::new(Arc::new(scorer), EngineConfig::default());

        let outcome = orchestrator.analyze(&[], "").await.unwrap();
        assert!(!outcome.score_available);
        assert_eq!(outcome.final_score, None);
    }

    #[tokio::test]
    async fn empty_comment_strings_still_count_as_data() {
        // A present-but-empty comment is dispatched and scored like any
        // other; only an empty collection means no data.
        let scorer = ScriptedScorer::new().with_score("", 0.0);
        let orchestrator = orchestrator_with(scorer, EngineConfig::default());

        let outcome = orchestrator.analyze(&comments(&[""]), "").await.unwrap();
        assert!(outcome.score_available);
        assert_eq!(outcome.final_score, Some(0.0));
    }

    #[tokio::test]
    async fn one_failure_fails_the_batch_by_default() {
        let scorer = ScriptedScorer::new()
            .with_score("fine", 0.5)
            .with_failure("doomed", "backend down");
        let orchestrator = orchestrator_with(scorer, EngineConfig::default());

        let err = orchestrator
            .analyze(&comments(&["fine", "doomed"]), "")
            .await
            .unwrap_err();
        assert!(err.is_scoring());
    }

    #[tokio::test]
    async fn best_effort_scores_what_it_can() {
        let scorer = ScriptedScorer::new()
            .with_score("fine", 0.6)
            .with_failure("doomed", "backend down")
            .with_score("the caption", 0.2);
        let config = EngineConfig {
            failure_policy: FailurePolicy::BestEffort,
            ..EngineConfig::default()
        };
        let orchestrator = orchestrator_with(scorer, config);

        let outcome = orchestrator
            .analyze(&comments(&["fine", "doomed"]), "the caption")
            .await
            .unwrap();
        // comment mean over the surviving comment only: (0.6 + 0.2) / 2
        let score = outcome.final_score.unwrap();
        assert!((score - 0.4).abs() < 1e-6, "got {score}");
    }

    #[tokio::test]
    async fn best_effort_with_nothing_scored_is_still_a_failure() {
        let scorer = ScriptedScorer::new()
            .with_failure("a", "down")
            .with_failure("b", "down");
        let config = EngineConfig {
            failure_policy: FailurePolicy::BestEffort,
            ..EngineConfig::default()
        };
        let orchestrator = orchestrator_with(scorer, config);

        let err = orchestrator
            .analyze(&comments(&["a", "b"]), "")
            .await
            .unwrap_err();
        assert!(err.is_scoring(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn deadline_cuts_off_a_hung_batch() {
        let scorer = ScriptedScorer::new()
            .with_fallback(0.5)
            .with_delay(std::time::Duration::from_secs(30));
        let config = EngineConfig {
            deadline_ms: Some(50),
            ..EngineConfig::default()
        };
        let orchestrator = orchestrator_with(scorer, config);

        let err = orchestrator.analyze(&comments(&["slow"]), "").await.unwrap_err();
        assert!(matches!(err, BatchError::DeadlineExceeded { .. }));
    }

    #[tokio::test]
    async fn no_deadline_means_no_timeout_machinery() {
        let scorer = ScriptedScorer::new()
            .with_fallback(0.1)
            .with_delay(std::time::Duration::from_millis(20));
        let orchestrator = orchestrator_with(scorer, EngineConfig::default());

        let outcome = orchestrator.analyze(&comments(&["slowish"]), "").await.unwrap();
        assert_eq!(outcome.final_score, Some(0.1));
    }

    #[tokio::test]
    async fn oversized_concurrency_still_analyzes() {
        // Code-built configs skip validate(); the pool caps the ceiling
        // itself, so even usize::MAX stays on the normal outcome path.
        let scorer = ScriptedScorer::new().with_fallback(0.3);
        let config = EngineConfig {
            max_concurrency: usize::MAX,
            ..EngineConfig::default()
        };
        let orchestrator = orchestrator_with(scorer, config);

        let outcome = orchestrator.analyze(&comments(&["a", "b"]), "").await.unwrap();
        assert_eq!(outcome.final_score, Some(0.3));
    }
}
