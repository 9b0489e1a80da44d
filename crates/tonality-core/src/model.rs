//! Core data types shared across the scoring pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which data source a scoring task came from. Aggregation is computed per
/// category before the categories are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Comment,
    Caption,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Comment => "comment",
            TaskCategory::Caption => "caption",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle for one scoring task, unique within its batch. Assigned by
/// the task builder in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u32);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// One unit of text submitted for independent sentiment scoring.
#[derive(Debug, Clone)]
pub struct ScoringTask {
    pub id: TaskId,
    pub category: TaskCategory,
    pub text: String,
}

/// What a worker produced for one task: a sentiment score in `[-1.0, 1.0]`
/// or the cause of the scoring failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Score(f32),
    Failed { cause: String },
}

impl ScoreOutcome {
    pub fn score(&self) -> Option<f32> {
        match self {
            ScoreOutcome::Score(v) => Some(*v),
            ScoreOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ScoreOutcome::Failed { .. })
    }

    pub fn failure_cause(&self) -> Option<&str> {
        match self {
            ScoreOutcome::Score(_) => None,
            ScoreOutcome::Failed { cause } => Some(cause),
        }
    }
}

/// Outcome of one task, tagged with enough identity to aggregate it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringResult {
    pub task_id: TaskId,
    pub category: TaskCategory,
    pub outcome: ScoreOutcome,
}

/// Arithmetic mean of the scored results in one category. A category with no
/// scored results produces no average at all, never a zero-count one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryAverage {
    pub category: TaskCategory,
    pub mean: f32,
    pub count: usize,
}

/// Final combined score for one video plus its availability flag.
///
/// `score_available` is false only when the video had neither comments nor a
/// caption; in that case no scoring call was ever dispatched. A failed batch
/// is an error, not an unavailable score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOutcome {
    pub final_score: Option<f32>,
    pub score_available: bool,
}

impl AggregateOutcome {
    pub fn available(score: f32) -> Self {
        Self {
            final_score: Some(score),
            score_available: true,
        }
    }

    pub fn no_data() -> Self {
        Self {
            final_score: None,
            score_available: false,
        }
    }
}

/// The outward record for one analyzed video. This is the shape consumers
/// see: JSON output, the JSONL store, downstream dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalysis {
    pub id: String,
    pub score: Option<f32>,
    pub score_available: bool,
}

impl VideoAnalysis {
    pub fn from_outcome(id: impl Into<String>, outcome: &AggregateOutcome) -> Self {
        Self {
            id: id.into(),
            score: outcome.final_score,
            score_available: outcome.score_available,
        }
    }
}
