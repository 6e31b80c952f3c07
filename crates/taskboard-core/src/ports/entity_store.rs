//! EntityStore port - durable storage for Users, Tasks and Subtasks.
//!
//! The store is the only shared mutable resource. Each call is atomic on its
//! own, but nothing spans calls: the service runs read-then-validate-then-write
//! sequences over separate calls.

use async_trait::async_trait;

use crate::domain::{
    Page, PageRequest, Specification, Status, StoreError, SubtaskClause, SubtaskId, SubtaskRecord,
    TaskClause, TaskId, TaskRecord, UserId, UserRecord,
};

/// EntityStore persists records and answers the queries the core needs.
///
/// # Contract
/// - `get_*` returns `Ok(None)` for an unknown id; mapping that to a
///   not-found error is the caller's job.
/// - `save_*` inserts or replaces by id and returns the stored record.
/// - `save_user` rejects a second User with an existing email with
///   `StoreError::UniqueViolation { field: "email", .. }`.
/// - `query_*` applies the specification, orders by `page.sort` (ties keep
///   insertion order) and returns the requested slice with the total match count.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_user(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn get_task(&self, id: TaskId) -> Result<Option<TaskRecord>, StoreError>;

    async fn get_subtask(&self, id: SubtaskId) -> Result<Option<SubtaskRecord>, StoreError>;

    async fn save_user(&self, user: UserRecord) -> Result<UserRecord, StoreError>;

    async fn save_task(&self, task: TaskRecord) -> Result<TaskRecord, StoreError>;

    async fn save_subtask(&self, subtask: SubtaskRecord) -> Result<SubtaskRecord, StoreError>;

    /// Number of Subtasks owned by `task_id`.
    async fn count_by_task(&self, task_id: TaskId) -> Result<u64, StoreError>;

    /// Number of Subtasks owned by `task_id` currently in `status`.
    async fn count_by_task_and_status(
        &self,
        task_id: TaskId,
        status: Status,
    ) -> Result<u64, StoreError>;

    async fn query_tasks(
        &self,
        spec: &Specification<TaskClause>,
        page: PageRequest,
    ) -> Result<Page<TaskRecord>, StoreError>;

    async fn query_subtasks(
        &self,
        spec: &Specification<SubtaskClause>,
        page: PageRequest,
    ) -> Result<Page<SubtaskRecord>, StoreError>;
}
