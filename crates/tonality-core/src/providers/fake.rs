//! Deterministic scorers for tests and dry runs.

use super::SentimentScorer;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scorer that returns the same score for every text. Useful as a dry-run
/// provider and for pinning aggregation arithmetic in tests.
#[derive(Debug)]
pub struct FixedScorer {
    score: f32,
}

impl FixedScorer {
    pub fn new(score: f32) -> Self {
        Self { score }
    }
}

#[async_trait]
impl SentimentScorer for FixedScorer {
    async fn score(&self, _text: &str) -> anyhow::Result<f32> {
        Ok(self.score)
    }

    fn provider_name(&self) -> &'static str {
        "fixed"
    }
}

#[derive(Debug, Clone)]
enum Step {
    Score(f32),
    Fail(String),
}

/// Per-text outcome sequence; the last step repeats once exhausted.
#[derive(Debug)]
struct Script {
    steps: Vec<Step>,
    hits: AtomicUsize,
}

impl Script {
    fn next(&self) -> Step {
        let n = self.hits.fetch_add(1, Ordering::SeqCst);
        self.steps[n.min(self.steps.len() - 1)].clone()
    }
}

/// Deterministic scorer for tests: per-text outcome scripts, optional fixed
/// latency, and call accounting so tests can assert on dispatch behavior
/// (how many calls started, how many finished, the concurrency peak).
#[derive(Debug, Default)]
pub struct ScriptedScorer {
    scripts: HashMap<String, Script>,
    fallback: Option<f32>,
    delay: Option<Duration>,
    started: AtomicUsize,
    completed: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always score `text` as `score`.
    pub fn with_score(mut self, text: &str, score: f32) -> Self {
        self.scripts.insert(
            text.to_string(),
            Script {
                steps: vec![Step::Score(score)],
                hits: AtomicUsize::new(0),
            },
        );
        self
    }

    /// Always fail `text` with `cause`.
    pub fn with_failure(mut self, text: &str, cause: &str) -> Self {
        self.scripts.insert(
            text.to_string(),
            Script {
                steps: vec![Step::Fail(cause.to_string())],
                hits: AtomicUsize::new(0),
            },
        );
        self
    }

    /// Fail the first call for `text`, then score later calls. Exercises the
    /// retry-once policy.
    pub fn with_fail_then_score(mut self, text: &str, cause: &str, score: f32) -> Self {
        self.scripts.insert(
            text.to_string(),
            Script {
                steps: vec![Step::Fail(cause.to_string()), Step::Score(score)],
                hits: AtomicUsize::new(0),
            },
        );
        self
    }

    /// Score any text without an explicit script as `score`. Without a
    /// fallback, unscripted texts fail.
    pub fn with_fallback(mut self, score: f32) -> Self {
        self.fallback = Some(score);
        self
    }

    /// Hold every call for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Calls that entered `score`, including ones later abandoned.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Calls that ran to completion, success or failure.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Highest number of concurrently executing calls observed so far.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentScorer for ScriptedScorer {
    async fn score(&self, text: &str) -> anyhow::Result<f32> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let step = match self.scripts.get(text) {
            Some(script) => script.next(),
            None => match self.fallback {
                Some(score) => Step::Score(score),
                None => Step::Fail(format!("no scripted outcome for {text:?}")),
            },
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);

        match step {
            Step::Score(v) => Ok(v),
            Step::Fail(cause) => Err(anyhow::anyhow!(cause)),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}
