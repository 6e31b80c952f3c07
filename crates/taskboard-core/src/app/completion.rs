//! CompletionAggregator - Subtask totals per Task.

use std::sync::Arc;

use crate::domain::{CompletionCounts, Result, Status, TaskId};
use crate::ports::EntityStore;

/// Reads how many of a Task's Subtasks exist and how many are completed.
///
/// Both the completion guard and `TaskView` projection go through here, so a
/// single operation never shows counts that differ from the ones it checked.
#[derive(Clone)]
pub struct CompletionAggregator {
    store: Arc<dyn EntityStore>,
}

impl CompletionAggregator {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Pure read. An unknown task id simply yields `0 / 0`.
    pub async fn counts(&self, task_id: TaskId) -> Result<CompletionCounts> {
        let total = self.store.count_by_task(task_id).await?;
        let completed = self
            .store
            .count_by_task_and_status(task_id, Status::Completed)
            .await?;
        // completed <= total even if a Subtask lands between the two reads
        Ok(CompletionCounts {
            total: total.max(completed),
            completed,
        })
    }
}
