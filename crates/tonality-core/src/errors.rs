//! Typed failures for the scoring pipeline.
//!
//! The split follows the runtime boundaries: [`BatchError`] is everything the
//! engine itself can produce for one batch, [`SourceError`] covers the
//! comment/caption retrieval seam, and [`ServiceError`] is the union a
//! request-level caller sees. An empty input is never an error; it is a
//! no-data outcome.

use crate::model::{TaskCategory, TaskId};
use std::time::Duration;
use thiserror::Error;

pub type BatchResult<T> = Result<T, BatchError>;

/// Why a whole scoring batch failed. One batch reports at most one of these,
/// even when several tasks failed.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A scoring call failed. Under the halting policies the first failure
    /// observed (in completion order) fails the batch and partial successes
    /// are discarded.
    #[error("scoring failed for {category} task {task_id}: {cause}")]
    Scoring {
        task_id: TaskId,
        category: TaskCategory,
        cause: String,
    },

    /// The pool itself broke: a lost worker, a closed semaphore. Distinct
    /// from a provider saying no.
    #[error("worker pool fault: {detail}")]
    Pool { detail: String },

    /// The cancel token fired before every task had been started. Tasks that
    /// were already in flight still ran to completion.
    #[error("batch cancelled before all tasks were dispatched")]
    Cancelled,

    /// The opt-in batch deadline elapsed. The only exit path that abandons
    /// in-flight scoring calls.
    #[error("batch deadline of {limit:?} exceeded")]
    DeadlineExceeded { limit: Duration },
}

impl BatchError {
    pub fn scoring(task_id: TaskId, category: TaskCategory, cause: impl Into<String>) -> Self {
        BatchError::Scoring {
            task_id,
            category,
            cause: cause.into(),
        }
    }

    pub fn pool(detail: impl Into<String>) -> Self {
        BatchError::Pool {
            detail: detail.into(),
        }
    }

    /// True for failures caused by a scoring call, as opposed to the pool,
    /// cancellation or the deadline.
    pub fn is_scoring(&self) -> bool {
        matches!(self, BatchError::Scoring { .. })
    }

    /// Stable label for logs and machine-readable output.
    pub fn kind_str(&self) -> &'static str {
        match self {
            BatchError::Scoring { .. } => "scoring",
            BatchError::Pool { .. } => "pool",
            BatchError::Cancelled => "cancelled",
            BatchError::DeadlineExceeded { .. } => "deadline",
        }
    }
}

/// Failures at the comment/caption retrieval boundary.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The video does not exist or is not visible to the caller.
    #[error("video not found: {video_id}")]
    NotFound { video_id: String },

    /// The backing source exists but could not be read.
    #[error("source unavailable: {detail}")]
    Unavailable { detail: String },
}

impl SourceError {
    pub fn not_found(video_id: impl Into<String>) -> Self {
        SourceError::NotFound {
            video_id: video_id.into(),
        }
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        SourceError::Unavailable {
            detail: detail.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }
}

/// Failures surfaced by [`crate::service::AnalysisService::analyze_video`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("comment retrieval failed: {0}")]
    Comments(SourceError),

    #[error("caption retrieval failed: {0}")]
    Captions(SourceError),

    #[error(transparent)]
    Scoring(#[from] BatchError),

    #[error("failed to persist analysis for {video_id}: {detail}")]
    Store { video_id: String, detail: String },
}

impl ServiceError {
    /// True when the underlying cause is a missing or invisible video rather
    /// than a transient retrieval or scoring problem.
    pub fn is_not_found(&self) -> bool {
        match self {
            ServiceError::Comments(e) | ServiceError::Captions(e) => e.is_not_found(),
            _ => false,
        }
    }
}

/// Configuration loading or validation failure, message included.
#[derive(Debug, Error)]
#[error("config error: {0}")]
pub struct ConfigError(pub String);
