//! Outcome persistence boundary.

use crate::model::VideoAnalysis;
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Mutex;

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Record one computed analysis. Implementations decide what repeats of
    /// the same video mean; the service only calls this when a score is
    /// available.
    async fn record(&self, analysis: &VideoAnalysis) -> anyhow::Result<()>;
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<VideoAnalysis>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<VideoAnalysis> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn record(&self, analysis: &VideoAnalysis) -> anyhow::Result<()> {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push(analysis.clone());
        Ok(())
    }
}

/// JSONL line shape: the analysis plus when it was recorded.
#[derive(Debug, Serialize)]
struct StoredAnalysis<'a> {
    recorded_at: String,
    #[serde(flatten)]
    analysis: &'a VideoAnalysis,
}

/// Append-only JSONL store, one analysis per line. The file is opened per
/// record, so concurrent writers interleave at line granularity.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AnalysisStore for JsonlStore {
    async fn record(&self, analysis: &VideoAnalysis) -> anyhow::Result<()> {
        use std::io::Write;

        let line = serde_json::to_string(&StoredAnalysis {
            recorded_at: chrono::Utc::now().to_rfc3339(),
            analysis,
        })?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}
