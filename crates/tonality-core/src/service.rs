//! Request-level assembly around the engine.

use crate::engine::Orchestrator;
use crate::errors::ServiceError;
use crate::model::VideoAnalysis;
use crate::sources::{CaptionSource, CommentSource};
use crate::store::AnalysisStore;
use std::sync::Arc;

/// Everything one analysis request needs wired together: where the text
/// comes from, how it gets scored, and where the outcome goes.
pub struct AnalysisService {
    comments: Arc<dyn CommentSource>,
    captions: Arc<dyn CaptionSource>,
    store: Option<Arc<dyn AnalysisStore>>,
    orchestrator: Orchestrator,
}

impl AnalysisService {
    pub fn new(
        comments: Arc<dyn CommentSource>,
        captions: Arc<dyn CaptionSource>,
        orchestrator: Orchestrator,
    ) -> Self {
        Self {
            comments,
            captions,
            store: None,
            orchestrator,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn AnalysisStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Fetch a video's comments and caption, score them, and persist the
    /// outcome when a score is available.
    ///
    /// A video with neither comments nor caption yields a valid record with
    /// `score_available == false` and is not persisted. Retrieval failures
    /// fail the request before anything is dispatched; a failed batch fails
    /// it afterwards. Nothing half-done is ever written to the store.
    pub async fn analyze_video(&self, video_id: &str) -> Result<VideoAnalysis, ServiceError> {
        let comments = self
            .comments
            .comments_for(video_id)
            .await
            .map_err(ServiceError::Comments)?;
        let caption = self
            .captions
            .caption_for(video_id)
            .await
            .map_err(ServiceError::Captions)?;

        let outcome = self.orchestrator.analyze(&comments, &caption).await?;
        let analysis = VideoAnalysis::from_outcome(video_id, &outcome);

        if analysis.score_available {
            if let Some(store) = &self.store {
                store
                    .record(&analysis)
                    .await
                    .map_err(|e| ServiceError::Store {
                        video_id: video_id.to_string(),
                        detail: e.to_string(),
                    })?;
            }
        }

        tracing::debug!(
            video = video_id,
            available = analysis.score_available,
            "video analysis complete"
        );
        Ok(analysis)
    }
}
