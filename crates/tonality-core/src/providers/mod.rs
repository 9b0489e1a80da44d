//! The scoring capability boundary and its bundled implementations.
//!
//! The engine only ever sees `Arc<dyn SentimentScorer>`; which provider sits
//! behind it is wiring. Bundled here: a deterministic lexicon scorer for
//! offline runs, scripted fakes for tests, and a tracing decorator.

pub mod fake;
pub mod lexicon;
pub mod trace;

pub use fake::{FixedScorer, ScriptedScorer};
pub use lexicon::LexiconScorer;
pub use trace::TracingScorer;

use async_trait::async_trait;

/// The opaque per-text scoring call.
///
/// Implementations return a sentiment in `[-1.0, 1.0]` (negative is hostile,
/// positive is favorable); anything outside that range, or non-finite, is
/// treated as a scoring failure by the pool. The trait is object-safe so the
/// engine can hold trait objects and tests can substitute deterministic
/// fakes.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    async fn score(&self, text: &str) -> anyhow::Result<f32>;

    fn provider_name(&self) -> &'static str;
}
