//! Engine configuration.

use crate::engine::pool::FailurePolicy;
use crate::errors::ConfigError;
use crate::sources::MAX_COMMENTS_PER_VIDEO;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Worker ceiling sized for a full comment page plus the caption slot.
pub const DEFAULT_MAX_CONCURRENCY: usize = MAX_COMMENTS_PER_VIDEO + 1;

/// Tunables for one engine instance. Built in code or loaded from YAML;
/// every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum number of scoring calls in flight at once.
    pub max_concurrency: usize,

    /// What a single scoring failure does to the batch.
    pub failure_policy: FailurePolicy,

    /// Wall-clock bound for one whole batch, in milliseconds. `None`
    /// disables the deadline. Expiry abandons in-flight scoring calls, so
    /// only enable this when the provider tolerates abandoned calls.
    pub deadline_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            failure_policy: FailurePolicy::default(),
            deadline_ms: None,
        }
    }
}

impl EngineConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError("max_concurrency must be at least 1".into()));
        }
        // The pool's semaphore cannot hold more permits than this.
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(ConfigError(format!(
                "max_concurrency must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if self.deadline_ms == Some(0) {
            return Err(ConfigError("deadline_ms must be positive when set".into()));
        }
        Ok(())
    }
}

/// Load and validate an engine config from a YAML file. An empty file
/// yields the defaults.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {e}", path.display())))?;
    let cfg = parse_config(&raw)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse_config(raw: &str) -> Result<EngineConfig, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(EngineConfig::default());
    }
    serde_yaml::from_str(raw).map_err(|e| ConfigError(format!("failed to parse YAML: {e}")))
}
