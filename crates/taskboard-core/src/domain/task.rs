//! Task record: owned by one User, owns its Subtasks.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::errors::{Result, TaskboardError};
use super::ids::{TaskId, UserId};
use super::progress::{Progress, Tracked};

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// A stored Task.
///
/// Status and completion time are only reachable through [`Tracked`], so
/// the transition engine is the single place that changes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: TaskId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    progress: Progress,
}

impl TaskRecord {
    /// A freshly created Task, always `Pending`.
    pub fn new(
        id: TaskId,
        user_id: UserId,
        title: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            title,
            description,
            created_at,
            progress: Progress::pending(),
        }
    }
}

impl Tracked for TaskRecord {
    fn progress(&self) -> &Progress {
        &self.progress
    }

    fn set_progress(&mut self, progress: Progress) {
        self.progress = progress;
    }
}

/// Input for creating a Task.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(user_id: UserId, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the normalized `(title, description)`.
    pub fn validate(&self) -> Result<(String, Option<String>)> {
        Ok((
            validate_title(&self.title)?,
            validate_description(self.description.as_deref())?,
        ))
    }
}

pub(crate) fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskboardError::validation("title", "must not be blank"));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(TaskboardError::validation(
            "title",
            format!("must not exceed {TITLE_MAX_CHARS} characters"),
        ));
    }
    Ok(title.to_string())
}

/// A blank description is stored as `None`.
pub(crate) fn validate_description(description: Option<&str>) -> Result<Option<String>> {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(TaskboardError::validation(
            "description",
            format!("must not exceed {DESCRIPTION_MAX_CHARS} characters"),
        ));
    }
    Ok(Some(description.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;
    use chrono::TimeZone;
    use ulid::Ulid;

    fn owner() -> UserId {
        UserId::from_ulid(Ulid::new())
    }

    #[test]
    fn new_task_starts_pending_without_completion_time() {
        let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let task = TaskRecord::new(
            TaskId::from_ulid(Ulid::new()),
            owner(),
            "Write report".into(),
            None,
            created_at,
        );

        assert_eq!(task.status(), Status::Pending);
        assert_eq!(task.completed_at(), None);
    }

    #[test]
    fn blank_description_becomes_none() {
        let (title, description) = NewTask::new(owner(), " Plan ")
            .with_description("   ")
            .validate()
            .unwrap();

        assert_eq!(title, "Plan");
        assert_eq!(description, None);
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = NewTask::new(owner(), "  ").validate().unwrap_err();

        assert!(matches!(err, TaskboardError::Validation { field: "title", .. }));
    }

    #[test]
    fn overlong_fields_are_rejected() {
        let long_title = "t".repeat(TITLE_MAX_CHARS + 1);
        let long_description = "d".repeat(DESCRIPTION_MAX_CHARS + 1);

        assert!(NewTask::new(owner(), long_title).validate().is_err());
        assert!(
            NewTask::new(owner(), "ok")
                .with_description(long_description)
                .validate()
                .is_err()
        );
    }
}
