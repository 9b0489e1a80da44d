//! Task construction for one video's scoring batch.

use crate::model::{ScoringTask, TaskCategory, TaskId};

/// Build the scoring tasks for one video.
///
/// Every comment element becomes a task, empty text included: presence in the
/// collection is what counts, not the content of an individual entry. The
/// caption becomes a task only when it is non-empty, so a captionless video
/// contributes no caption task at all. Both sides empty yields an empty batch,
/// which the orchestrator turns into a no-data outcome without dispatching
/// anything.
pub fn build(comments: &[String], caption: &str) -> Vec<ScoringTask> {
    let mut tasks = Vec::with_capacity(comments.len() + 1);
    for (i, text) in comments.iter().enumerate() {
        tasks.push(ScoringTask {
            id: TaskId(i as u32),
            category: TaskCategory::Comment,
            text: text.clone(),
        });
    }
    if !caption.is_empty() {
        tasks.push(ScoringTask {
            id: TaskId(comments.len() as u32),
            category: TaskCategory::Caption,
            text: caption.to_string(),
        });
    }
    tasks
}
