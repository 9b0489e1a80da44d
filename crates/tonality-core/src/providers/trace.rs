//! Span-per-call decorator for any scorer.

use super::SentimentScorer;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// Wraps every scoring call in a `sentiment.score` span and records the
/// outcome on it. Text content is never logged, only its length.
pub struct TracingScorer {
    inner: Arc<dyn SentimentScorer>,
}

impl TracingScorer {
    pub fn new(inner: Arc<dyn SentimentScorer>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SentimentScorer for TracingScorer {
    async fn score(&self, text: &str) -> anyhow::Result<f32> {
        let span = info_span!(
            "sentiment.score",
            provider = self.inner.provider_name(),
            text_len = text.len(),
            score = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        let inner = Arc::clone(&self.inner);
        async move {
            let result = inner.score(text).await;
            let span = tracing::Span::current();
            match &result {
                Ok(score) => {
                    span.record("score", f64::from(*score));
                }
                Err(e) => {
                    span.record("error", e.to_string().as_str());
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
