//! Read models returned to the request layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::{SubtaskId, TaskId, UserId};
use super::progress::Tracked;
use super::status::Status;
use super::subtask::SubtaskRecord;
use super::task::TaskRecord;
use super::user::UserRecord;

/// Subtask totals for one Task, as seen by a single read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CompletionCounts {
    pub total: u64,
    pub completed: u64,
}

impl CompletionCounts {
    pub fn pending(&self) -> u64 {
        self.total.saturating_sub(self.completed)
    }

    /// True when every Subtask is completed; vacuously true for zero Subtasks.
    pub fn all_completed(&self) -> bool {
        self.completed >= self.total
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserView {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub user_id: UserId,
    pub user_name: String,
    pub total_subtasks: u64,
    pub completed_subtasks: u64,
}

impl TaskView {
    pub fn project(task: &TaskRecord, owner: &UserRecord, counts: CompletionCounts) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status(),
            created_at: task.created_at,
            completed_at: task.completed_at(),
            user_id: owner.id,
            user_name: owner.name.clone(),
            total_subtasks: counts.total,
            completed_subtasks: counts.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskView {
    pub id: SubtaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub task_id: TaskId,
    pub task_title: String,
}

impl SubtaskView {
    pub fn project(subtask: &SubtaskRecord, task: &TaskRecord) -> Self {
        Self {
            id: subtask.id,
            title: subtask.title.clone(),
            description: subtask.description.clone(),
            status: subtask.status(),
            created_at: subtask.created_at,
            completed_at: subtask.completed_at(),
            task_id: task.id,
            task_title: task.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::no_subtasks(0, 0, true)]
    #[case::all_done(2, 2, true)]
    #[case::one_pending(2, 1, false)]
    #[case::none_done(3, 0, false)]
    fn all_completed_is_vacuous_for_empty(
        #[case] total: u64,
        #[case] completed: u64,
        #[case] expected: bool,
    ) {
        let counts = CompletionCounts { total, completed };

        assert_eq!(counts.all_completed(), expected);
        assert_eq!(counts.pending(), total - completed);
    }

    #[test]
    fn task_view_serializes_in_camel_case() {
        use chrono::TimeZone;
        use ulid::Ulid;

        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let owner = UserRecord {
            id: UserId::from_ulid(Ulid::new()),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            created_at: at,
        };
        let task = TaskRecord::new(
            TaskId::from_ulid(Ulid::new()),
            owner.id,
            "Ship".into(),
            None,
            at,
        );

        let json = serde_json::to_value(TaskView::project(
            &task,
            &owner,
            CompletionCounts {
                total: 2,
                completed: 1,
            },
        ))
        .unwrap();

        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["userName"], "Ada");
        assert_eq!(json["totalSubtasks"], 2);
        assert_eq!(json["completedSubtasks"], 1);
        assert!(json["completedAt"].is_null());
    }
}
