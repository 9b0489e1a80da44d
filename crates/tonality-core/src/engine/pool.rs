//! Bounded concurrent execution of one scoring batch.

use crate::errors::{BatchError, BatchResult};
use crate::model::{ScoreOutcome, ScoringResult, ScoringTask};
use crate::providers::SentimentScorer;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// What a single task failure does to the rest of the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// First failure fails the batch: queued tasks stop starting, in-flight
    /// tasks drain, partial successes are discarded.
    #[default]
    FailFast,
    /// Score what can be scored; failed tasks are simply absent from
    /// aggregation. The batch only fails when nothing scored at all.
    BestEffort,
    /// Retry a failed call once, then behave like fail-fast.
    RetryOnce,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::FailFast => "fail_fast",
            FailurePolicy::BestEffort => "best_effort",
            FailurePolicy::RetryOnce => "retry_once",
        }
    }

    /// Whether an observed failure should stop the dispatch of queued tasks.
    fn halts_dispatch(&self) -> bool {
        !matches!(self, FailurePolicy::BestEffort)
    }
}

/// Executes one batch of scoring tasks with a fixed concurrency ceiling.
///
/// The ceiling is independent of batch size: when the batch is larger, excess
/// tasks queue on the semaphore until a worker slot frees up. Every spawned
/// worker is drained before [`BoundedWorkerPool::run`] returns on any path,
/// so no scoring call is ever abandoned and no worker leaks into the next
/// batch.
pub struct BoundedWorkerPool {
    scorer: Arc<dyn SentimentScorer>,
    limit: usize,
    policy: FailurePolicy,
}

impl BoundedWorkerPool {
    /// `limit` is clamped into `1..=Semaphore::MAX_PERMITS`.
    pub fn new(scorer: Arc<dyn SentimentScorer>, limit: usize) -> Self {
        Self {
            scorer,
            limit: limit.clamp(1, Semaphore::MAX_PERMITS),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Score every task, at most `limit` concurrently.
    ///
    /// Results come back in completion order, not submission order; the
    /// aggregation step does not care. Under the halting policies the first
    /// failed outcome observed fails the batch after all in-flight workers
    /// have drained. Cancellation takes effect at the next dispatch check: no
    /// new task starts, in-flight tasks finish, and the batch reports
    /// [`BatchError::Cancelled`]. A token that fires after the last task has
    /// started changes nothing.
    pub async fn run(
        &self,
        tasks: Vec<ScoringTask>,
        cancel: &CancellationToken,
    ) -> BatchResult<Vec<ScoringResult>> {
        let sem = Arc::new(Semaphore::new(self.limit));
        let failed = Arc::new(AtomicBool::new(false));
        let mut join_set = JoinSet::new();

        let mut infra: Option<BatchError> = None;
        let mut cancelled = false;
        let mut dispatched = 0usize;
        for task in tasks {
            // Queued tasks wait here for a worker slot; this is also where a
            // fail-fast latch or a cancel request takes effect.
            let permit = match sem.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    infra = Some(BatchError::pool(format!("semaphore closed: {e}")));
                    break;
                }
            };
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            if self.policy.halts_dispatch() && failed.load(Ordering::SeqCst) {
                break;
            }

            let scorer = Arc::clone(&self.scorer);
            let failed = Arc::clone(&failed);
            let policy = self.policy;
            join_set.spawn(async move {
                let _permit = permit;
                let outcome = score_task(scorer.as_ref(), &task, policy).await;
                if outcome.is_failure() {
                    failed.store(true, Ordering::SeqCst);
                }
                ScoringResult {
                    task_id: task.id,
                    category: task.category,
                    outcome,
                }
            });
            dispatched += 1;
        }

        // Drain every worker that started. In-flight scoring calls are never
        // interruptible here, so even a doomed batch waits for them.
        let mut results = Vec::with_capacity(dispatched);
        let mut lost_worker: Option<String> = None;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::warn!(error = %e, "scoring worker lost");
                    lost_worker.get_or_insert_with(|| format!("worker lost: {e}"));
                }
            }
        }

        if let Some(err) = infra {
            return Err(err);
        }
        if let Some(detail) = lost_worker {
            return Err(BatchError::pool(detail));
        }
        if cancelled {
            return Err(BatchError::Cancelled);
        }
        if self.policy.halts_dispatch() {
            if let Some(first) = results.iter().find(|r| r.outcome.is_failure()) {
                let cause = first.outcome.failure_cause().unwrap_or("unknown").to_string();
                return Err(BatchError::scoring(first.task_id, first.category, cause));
            }
        }
        Ok(results)
    }
}

async fn score_task(
    scorer: &dyn SentimentScorer,
    task: &ScoringTask,
    policy: FailurePolicy,
) -> ScoreOutcome {
    match attempt(scorer, task).await {
        Ok(score) => ScoreOutcome::Score(score),
        Err(first) if policy == FailurePolicy::RetryOnce => {
            tracing::warn!(
                task = %task.id,
                category = %task.category,
                error = %first,
                "scoring failed, retrying once"
            );
            match attempt(scorer, task).await {
                Ok(score) => ScoreOutcome::Score(score),
                Err(second) => ScoreOutcome::Failed {
                    cause: second.to_string(),
                },
            }
        }
        Err(e) => ScoreOutcome::Failed {
            cause: e.to_string(),
        },
    }
}

/// One scoring call plus the range check on the provider's answer. A provider
/// that wanders outside `[-1.0, 1.0]` is a failed call, never a clamped one.
async fn attempt(scorer: &dyn SentimentScorer, task: &ScoringTask) -> anyhow::Result<f32> {
    let score = scorer.score(&task.text).await?;
    if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
        anyhow::bail!("provider returned out-of-range score {score}");
    }
    Ok(score)
}
