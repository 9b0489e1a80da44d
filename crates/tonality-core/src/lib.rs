//! Tonality: concurrent sentiment scoring for video comments and captions.
//!
//! One video's score is computed by scoring every comment and the caption
//! blob independently, in parallel under a bounded worker ceiling, then
//! combining the per-category averages:
//!
//! - comments and caption both present: mean of the two category scores,
//! - only one side present: that side's score, unaveraged,
//! - neither present: no score, reported as such rather than as an error.
//!
//! A single scoring failure fails the whole request under the default
//! fail-fast policy; see [`engine::FailurePolicy`] for the alternatives.
//! Scoring itself sits behind [`providers::SentimentScorer`], so the same
//! engine runs against a real language backend, the offline lexicon scorer,
//! or a scripted fake in tests.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tonality_core::config::EngineConfig;
//! use tonality_core::engine::Orchestrator;
//! use tonality_core::providers::FixedScorer;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), tonality_core::errors::BatchError> {
//! let orchestrator = Orchestrator::new(Arc::new(FixedScorer::new(0.5)), EngineConfig::default());
//! let outcome = orchestrator
//!     .analyze(&["nice one".to_string()], "welcome back")
//!     .await?;
//! assert_eq!(outcome.final_score, Some(0.5));
//! assert!(outcome.score_available);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod errors;
pub mod model;
pub mod providers;
pub mod service;
pub mod sources;
pub mod store;
pub mod tasks;

pub use config::{load_config, EngineConfig, DEFAULT_MAX_CONCURRENCY};
pub use engine::{BoundedWorkerPool, FailurePolicy, Orchestrator};
pub use errors::{BatchError, BatchResult, ConfigError, ServiceError, SourceError};
pub use model::{AggregateOutcome, ScoringResult, TaskCategory, VideoAnalysis};
pub use providers::SentimentScorer;
pub use service::AnalysisService;
