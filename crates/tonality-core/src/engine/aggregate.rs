//! Combining per-task scores into one video-level score.

use crate::model::{CategoryAverage, ScoringResult, TaskCategory};

/// Mean of the scored results in `category`, or `None` when the category has
/// none. Failed outcomes never contribute to a mean; under best-effort they
/// are simply absent here.
pub fn category_average(
    results: &[ScoringResult],
    category: TaskCategory,
) -> Option<CategoryAverage> {
    let mut sum = 0.0f32;
    let mut count = 0usize;
    for result in results.iter().filter(|r| r.category == category) {
        if let Some(score) = result.outcome.score() {
            sum += score;
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    Some(CategoryAverage {
        category,
        mean: sum / count as f32,
        count,
    })
}

/// The cross-category combination: average the comment mean with the caption
/// score when both are present, otherwise pass through whichever side exists
/// unchanged. `None` when nothing was scored at all.
///
/// The caption side is a mean too, but with at most one caption task per
/// batch it degenerates to the single caption score.
pub fn combine(results: &[ScoringResult]) -> Option<f32> {
    let comments = category_average(results, TaskCategory::Comment);
    let caption = category_average(results, TaskCategory::Caption);
    match (comments, caption) {
        (Some(c), Some(cap)) => Some((c.mean + cap.mean) / 2.0),
        (Some(c), None) => Some(c.mean),
        (None, Some(cap)) => Some(cap.mean),
        (None, None) => None,
    }
}
