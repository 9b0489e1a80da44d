//! Comment and caption retrieval boundaries.
//!
//! The engine never talks to a video platform itself; callers hand it text.
//! These traits are the seam a real platform client would implement. The
//! bundled implementation is a JSON fixture catalog for offline use and
//! tests.

use crate::errors::SourceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Upstream page size for comment retrieval: sources hand back at most the
/// top 25 comments per video. This also sizes the default worker ceiling.
pub const MAX_COMMENTS_PER_VIDEO: usize = 25;

#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Top comments for a video, best first, possibly empty. At most
    /// [`MAX_COMMENTS_PER_VIDEO`] entries.
    async fn comments_for(&self, video_id: &str) -> Result<Vec<String>, SourceError>;
}

#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// The caption track as one text blob; empty when the video has none.
    async fn caption_for(&self, video_id: &str) -> Result<String, SourceError>;
}

/// One video's raw material inside a fixture catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub caption: String,
}

/// Fixture-backed source: a JSON map of video id to comments and caption.
#[derive(Debug, Default)]
pub struct FixtureCatalog {
    videos: HashMap<String, VideoRecord>,
}

impl FixtureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON file shaped like
    /// `{"<video_id>": {"comments": [...], "caption": "..."}}`.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SourceError::unavailable(format!("failed to read fixtures {}: {e}", path.display()))
        })?;
        let videos: HashMap<String, VideoRecord> = serde_json::from_str(&raw)
            .map_err(|e| SourceError::unavailable(format!("failed to parse fixtures: {e}")))?;
        Ok(Self { videos })
    }

    pub fn insert(&mut self, video_id: impl Into<String>, record: VideoRecord) {
        self.videos.insert(video_id.into(), record);
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    fn get(&self, video_id: &str) -> Result<&VideoRecord, SourceError> {
        self.videos
            .get(video_id)
            .ok_or_else(|| SourceError::not_found(video_id))
    }
}

#[async_trait]
impl CommentSource for FixtureCatalog {
    async fn comments_for(&self, video_id: &str) -> Result<Vec<String>, SourceError> {
        let record = self.get(video_id)?;
        let mut comments = record.comments.clone();
        comments.truncate(MAX_COMMENTS_PER_VIDEO);
        Ok(comments)
    }
}

#[async_trait]
impl CaptionSource for FixtureCatalog {
    async fn caption_for(&self, video_id: &str) -> Result<String, SourceError> {
        Ok(self.get(video_id)?.caption.clone())
    }
}
