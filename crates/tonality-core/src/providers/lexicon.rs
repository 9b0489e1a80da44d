//! Offline word-list scorer.

use super::SentimentScorer;
use async_trait::async_trait;

const POSITIVE: &[&str] = &[
    "amazing",
    "awesome",
    "best",
    "brilliant",
    "cool",
    "enjoyed",
    "excellent",
    "fantastic",
    "fun",
    "good",
    "great",
    "helpful",
    "love",
    "loved",
    "nice",
    "perfect",
    "thank",
    "thanks",
    "wonderful",
];

const NEGATIVE: &[&str] = &[
    "annoying",
    "awful",
    "bad",
    "boring",
    "broken",
    "disappointing",
    "hate",
    "hated",
    "horrible",
    "poor",
    "terrible",
    "useless",
    "waste",
    "worst",
    "wrong",
];

/// Deterministic scorer for runs without a language service.
///
/// Scores `(positive - negative) / (positive + negative)` over case-folded
/// alphanumeric tokens; text with no marker words is neutral. Never fails,
/// and always stays within `[-1.0, 1.0]` by construction. The word lists are
/// deliberately tiny: this is a stand-in for a real language backend, not an
/// NLP model.
#[derive(Debug, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }

    fn rate(text: &str) -> f32 {
        let mut positive = 0usize;
        let mut negative = 0usize;
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            if POSITIVE.contains(&token.as_str()) {
                positive += 1;
            } else if NEGATIVE.contains(&token.as_str()) {
                negative += 1;
            }
        }
        let hits = positive + negative;
        if hits == 0 {
            return 0.0;
        }
        (positive as f32 - negative as f32) / hits as f32
    }
}

#[async_trait]
impl SentimentScorer for LexiconScorer {
    async fn score(&self, text: &str) -> anyhow::Result<f32> {
        Ok(Self::rate(text))
    }

    fn provider_name(&self) -> &'static str {
        "lexicon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_text_scores_positive() {
        assert_eq!(LexiconScorer::rate("great video, loved it"), 1.0);
    }

    #[test]
    fn negative_text_scores_negative() {
        assert_eq!(LexiconScorer::rate("awful, total waste of time"), -1.0);
    }

    #[test]
    fn mixed_text_lands_between() {
        let score = LexiconScorer::rate("great idea but terrible sound and boring pacing");
        assert!(score < 0.0, "one positive vs two negatives: {score}");
        assert!((-1.0..=1.0).contains(&score));
    }

    #[test]
    fn unmarked_text_is_neutral() {
        assert_eq!(LexiconScorer::rate("the quick brown fox"), 0.0);
        assert_eq!(LexiconScorer::rate(""), 0.0);
    }

    #[test]
    fn matching_ignores_case_and_punctuation() {
        assert_eq!(LexiconScorer::rate("GREAT!!!"), 1.0);
        assert_eq!(LexiconScorer::rate("so. much. hate."), -1.0);
    }
}
