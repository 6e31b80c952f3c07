//! Subtask record: belongs to exactly one Task.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::errors::Result;
use super::ids::{SubtaskId, TaskId};
use super::progress::{Progress, Tracked};
use super::task::{validate_description, validate_title};

/// A stored Subtask. `task_id` is a back-reference, not ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtaskRecord {
    pub id: SubtaskId,
    pub task_id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    progress: Progress,
}

impl SubtaskRecord {
    pub fn new(
        id: SubtaskId,
        task_id: TaskId,
        title: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            title,
            description,
            created_at,
            progress: Progress::pending(),
        }
    }
}

impl Tracked for SubtaskRecord {
    fn progress(&self) -> &Progress {
        &self.progress
    }

    fn set_progress(&mut self, progress: Progress) {
        self.progress = progress;
    }
}

/// Input for creating a Subtask. The owning Task is passed separately.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubtask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewSubtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(String, Option<String>)> {
        Ok((
            validate_title(&self.title)?,
            validate_description(self.description.as_deref())?,
        ))
    }
}
