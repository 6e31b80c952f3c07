//! Dynamic filter composition for Task and Subtask search.
//!
//! A search request carries any subset of optional filter values. Each present
//! value becomes one clause; absent values contribute nothing. The resulting
//! [`Specification`] is the AND of its clauses, so an empty specification
//! matches every record.
//!
//! Clauses are plain data rather than closures: the in-memory store evaluates
//! them with [`Clause::matches`], and a SQL-backed store can translate the same
//! values into a `WHERE` list.

use serde::Deserialize;

use super::ids::{TaskId, UserId};
use super::progress::Tracked;
use super::status::Status;
use super::subtask::SubtaskRecord;
use super::task::TaskRecord;

/// One predicate over records of type `T`.
pub trait Clause<T> {
    fn matches(&self, record: &T) -> bool;
}

/// Conjunction of clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specification<C> {
    clauses: Vec<C>,
}

impl<C> Specification<C> {
    /// The empty conjunction: matches everything.
    pub fn all() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    pub fn and(mut self, clause: C) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Add `clause` if present; `None` leaves the specification unchanged.
    pub fn and_maybe(self, clause: Option<C>) -> Self {
        match clause {
            Some(clause) => self.and(clause),
            None => self,
        }
    }

    pub fn clauses(&self) -> &[C] {
        &self.clauses
    }

    pub fn is_unconstrained(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches<T>(&self, record: &T) -> bool
    where
        C: Clause<T>,
    {
        self.clauses.iter().all(|clause| clause.matches(record))
    }
}

impl<C> Default for Specification<C> {
    fn default() -> Self {
        Self::all()
    }
}

/// Case-insensitive substring needle for title search.
///
/// Blank input yields no needle at all, so a whitespace-only title filter
/// behaves exactly like an absent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleNeedle(String);

impl TitleNeedle {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.filter(|s| !s.trim().is_empty())
            .map(|s| Self(s.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_in(&self, title: &str) -> bool {
        title.to_lowercase().contains(&self.0)
    }
}

// ========================================
// Tasks
// ========================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskClause {
    Status(Status),
    Owner(UserId),
    TitleContains(TitleNeedle),
}

impl Clause<TaskRecord> for TaskClause {
    fn matches(&self, task: &TaskRecord) -> bool {
        match self {
            TaskClause::Status(status) => task.status() == *status,
            TaskClause::Owner(user_id) => task.user_id == *user_id,
            TaskClause::TitleContains(needle) => needle.is_in(&task.title),
        }
    }
}

/// Optional Task search filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub status: Option<Status>,
    pub user_id: Option<UserId>,
    pub title: Option<String>,
}

impl TaskFilter {
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn to_specification(&self) -> Specification<TaskClause> {
        Specification::all()
            .and_maybe(self.status.map(TaskClause::Status))
            .and_maybe(self.user_id.map(TaskClause::Owner))
            .and_maybe(TitleNeedle::parse(self.title.as_deref()).map(TaskClause::TitleContains))
    }
}

// ========================================
// Subtasks
// ========================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtaskClause {
    Task(TaskId),
    Status(Status),
    TitleContains(TitleNeedle),
}

impl Clause<SubtaskRecord> for SubtaskClause {
    fn matches(&self, subtask: &SubtaskRecord) -> bool {
        match self {
            SubtaskClause::Task(task_id) => subtask.task_id == *task_id,
            SubtaskClause::Status(status) => subtask.status() == *status,
            SubtaskClause::TitleContains(needle) => needle.is_in(&subtask.title),
        }
    }
}

/// Optional Subtask search filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubtaskFilter {
    pub task_id: Option<TaskId>,
    pub status: Option<Status>,
    pub title: Option<String>,
}

impl SubtaskFilter {
    pub fn with_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn to_specification(&self) -> Specification<SubtaskClause> {
        Specification::all()
            .and_maybe(self.task_id.map(SubtaskClause::Task))
            .and_maybe(self.status.map(SubtaskClause::Status))
            .and_maybe(TitleNeedle::parse(self.title.as_deref()).map(SubtaskClause::TitleContains))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Progress, SubtaskId};
    use chrono::Utc;
    use rstest::rstest;
    use ulid::Ulid;

    fn task(title: &str, owner: UserId, status: Status) -> TaskRecord {
        let mut task = TaskRecord::new(
            TaskId::from_ulid(Ulid::new()),
            owner,
            title.to_string(),
            None,
            Utc::now(),
        );
        if let Some(progress) = Progress::pending().advance(status, Utc::now()) {
            task.set_progress(progress);
        }
        task
    }

    fn subtask(title: &str, task_id: TaskId, status: Status) -> SubtaskRecord {
        let mut subtask = SubtaskRecord::new(
            SubtaskId::from_ulid(Ulid::new()),
            task_id,
            title.to_string(),
            None,
            Utc::now(),
        );
        if let Some(progress) = Progress::pending().advance(status, Utc::now()) {
            subtask.set_progress(progress);
        }
        subtask
    }

    fn sample_tasks() -> (UserId, UserId, Vec<TaskRecord>) {
        let alice = UserId::from_ulid(Ulid::new());
        let bob = UserId::from_ulid(Ulid::new());
        let tasks = vec![
            task("Project Alpha", alice, Status::Pending),
            task("project beta", bob, Status::Completed),
            task("Other", alice, Status::Completed),
            task("Groceries", bob, Status::InProgress),
        ];
        (alice, bob, tasks)
    }

    #[test]
    fn no_filters_means_no_clauses_and_everything_matches() {
        let (_, _, tasks) = sample_tasks();
        let spec = TaskFilter::default().to_specification();

        assert!(spec.is_unconstrained());
        assert!(tasks.iter().all(|t| spec.matches(t)));
    }

    #[test]
    fn status_only_selects_exactly_that_status() {
        let (_, _, tasks) = sample_tasks();
        let spec = TaskFilter::default()
            .with_status(Status::Completed)
            .to_specification();

        let titles: Vec<_> = tasks
            .iter()
            .filter(|t| spec.matches(*t))
            .map(|t| t.title.as_str())
            .collect();

        assert_eq!(titles, vec!["project beta", "Other"]);
    }

    #[test]
    fn title_is_case_insensitive_containment() {
        let (_, _, tasks) = sample_tasks();
        let spec = TaskFilter::default().with_title("proj").to_specification();

        let titles: Vec<_> = tasks
            .iter()
            .filter(|t| spec.matches(*t))
            .map(|t| t.title.as_str())
            .collect();

        assert_eq!(titles, vec!["Project Alpha", "project beta"]);
    }

    #[test]
    fn title_contains_is_not_prefix_match() {
        let (_, _, tasks) = sample_tasks();
        let spec = TaskFilter::default().with_title("ALPHA").to_specification();

        assert_eq!(tasks.iter().filter(|t| spec.matches(*t)).count(), 1);
    }

    #[rstest]
    #[case::empty("")]
    #[case::spaces("   ")]
    #[case::tabs("\t\n")]
    fn blank_title_is_treated_as_absent(#[case] title: &str) {
        let spec = TaskFilter::default().with_title(title).to_specification();

        assert!(spec.is_unconstrained());
    }

    #[test]
    fn filters_combine_with_and() {
        let (alice, _, tasks) = sample_tasks();
        let spec = TaskFilter::default()
            .with_user(alice)
            .with_status(Status::Completed)
            .to_specification();

        let titles: Vec<_> = tasks
            .iter()
            .filter(|t| spec.matches(*t))
            .map(|t| t.title.as_str())
            .collect();

        assert_eq!(spec.clauses().len(), 2);
        assert_eq!(titles, vec!["Other"]);
    }

    #[test]
    fn subtask_filters_by_parent_status_and_title() {
        let parent = TaskId::from_ulid(Ulid::new());
        let other = TaskId::from_ulid(Ulid::new());
        let subtasks = vec![
            subtask("Draft", parent, Status::Pending),
            subtask("Review draft", parent, Status::Completed),
            subtask("Draft", other, Status::Completed),
        ];

        let by_parent = SubtaskFilter::default().with_task(parent).to_specification();
        let completed_drafts = SubtaskFilter::default()
            .with_status(Status::Completed)
            .with_title("DRAFT")
            .to_specification();

        assert_eq!(subtasks.iter().filter(|s| by_parent.matches(*s)).count(), 2);
        assert_eq!(
            subtasks.iter().filter(|s| completed_drafts.matches(*s)).count(),
            2
        );
        assert!(
            subtasks
                .iter()
                .all(|s| SubtaskFilter::default().to_specification().matches(s))
        );
    }
}
