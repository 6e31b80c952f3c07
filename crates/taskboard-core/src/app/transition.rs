//! StatusTransitionEngine - moves Tasks and Subtasks between statuses.
//!
//! # Rules
//! - same status requested: no-op, nothing is written
//! - into `Completed`: `completed_at = now`
//! - out of `Completed`: `completed_at` cleared
//! - a Task may enter `Completed` only when all of its Subtasks are completed
//!   (vacuously true with none); Subtasks have no guard
//!
//! # Concurrency
//! The guard read and the write are separate store calls with no lock or
//! version check between them. Two concurrent completions of one Task both
//! pass and converge on the same state. A Subtask leaving `Completed` inside
//! that window can leave the Task completed over an unfinished Subtask;
//! callers that need more must serialize completions per Task.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{
    CompletionCounts, Result, Status, SubtaskRecord, TaskRecord, TaskboardError, Tracked,
};
use crate::ports::{Clock, EntityStore};

use super::completion::CompletionAggregator;

#[derive(Clone)]
pub struct StatusTransitionEngine {
    store: Arc<dyn EntityStore>,
    aggregator: CompletionAggregator,
    clock: Arc<dyn Clock>,
}

impl StatusTransitionEngine {
    pub fn new(
        store: Arc<dyn EntityStore>,
        aggregator: CompletionAggregator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            aggregator,
            clock,
        }
    }

    /// Transition a Task and return it with the counts the guard saw.
    ///
    /// The counts are read once and returned for projection, whether or not
    /// the guard was needed.
    pub async fn transition_task(
        &self,
        task: TaskRecord,
        requested: Status,
    ) -> Result<(TaskRecord, CompletionCounts)> {
        let counts = self.aggregator.counts(task.id).await?;

        if requested.is_completed() && !task.status().is_completed() && !counts.all_completed() {
            warn!(
                task_id = %task.id,
                total = counts.total,
                completed = counts.completed,
                "task completion rejected"
            );
            return Err(TaskboardError::BusinessRuleViolation {
                task_id: task.id,
                pending: counts.pending(),
                total: counts.total,
            });
        }

        let task = self.apply(task, requested).await?;
        Ok((task, counts))
    }

    /// Transition a Subtask. Always allowed.
    pub async fn transition_subtask(
        &self,
        subtask: SubtaskRecord,
        requested: Status,
    ) -> Result<SubtaskRecord> {
        let Some(progress) = subtask.progress().advance(requested, self.clock.now()) else {
            debug!(subtask_id = %subtask.id, status = %requested, "subtask status unchanged");
            return Ok(subtask);
        };
        let mut subtask = subtask;
        subtask.set_progress(progress);
        Ok(self.store.save_subtask(subtask).await?)
    }

    async fn apply(&self, task: TaskRecord, requested: Status) -> Result<TaskRecord> {
        let Some(progress) = task.progress().advance(requested, self.clock.now()) else {
            debug!(task_id = %task.id, status = %requested, "task status unchanged");
            return Ok(task);
        };
        let mut task = task;
        task.set_progress(progress);
        Ok(self.store.save_task(task).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SubtaskId, TaskId, UserId};
    use crate::impls::InMemoryEntityStore;
    use crate::ports::FixedClock;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rstest::rstest;
    use ulid::Ulid;

    struct Fixture {
        store: InMemoryEntityStore,
        clock: Arc<FixedClock>,
        engine: StatusTransitionEngine,
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn fixture() -> Fixture {
        let store = InMemoryEntityStore::new();
        let clock = Arc::new(FixedClock::new(start()));
        let shared: Arc<dyn EntityStore> = Arc::new(store.clone());
        let engine = StatusTransitionEngine::new(
            shared.clone(),
            CompletionAggregator::new(shared),
            clock.clone(),
        );
        Fixture {
            store,
            clock,
            engine,
        }
    }

    impl Fixture {
        async fn task(&self) -> TaskRecord {
            let task = TaskRecord::new(
                TaskId::from_ulid(Ulid::new()),
                UserId::from_ulid(Ulid::new()),
                "Ship release".into(),
                None,
                self.clock.now(),
            );
            self.store.save_task(task).await.unwrap()
        }

        async fn subtask(&self, task_id: TaskId) -> SubtaskRecord {
            let subtask = SubtaskRecord::new(
                SubtaskId::from_ulid(Ulid::new()),
                task_id,
                "Write notes".into(),
                None,
                self.clock.now(),
            );
            self.store.save_subtask(subtask).await.unwrap()
        }

        async fn stored_task(&self, id: TaskId) -> TaskRecord {
            self.store.get_task(id).await.unwrap().unwrap()
        }
    }

    #[tokio::test]
    async fn task_without_subtasks_completes() {
        let f = fixture();
        let task = f.task().await;

        let (task, counts) = f
            .engine
            .transition_task(task, Status::Completed)
            .await
            .unwrap();

        assert_eq!(task.status(), Status::Completed);
        assert_eq!(task.completed_at(), Some(start()));
        assert_eq!(counts, CompletionCounts::default());
        assert_eq!(f.stored_task(task.id).await, task);
    }

    #[tokio::test]
    async fn pending_subtask_blocks_completion_without_mutation() {
        let f = fixture();
        let task = f.task().await;
        f.subtask(task.id).await;
        let before = f.stored_task(task.id).await;

        let err = f
            .engine
            .transition_task(task, Status::Completed)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TaskboardError::BusinessRuleViolation {
                pending: 1,
                total: 1,
                ..
            }
        ));
        assert!(err.to_string().contains("pending subtasks exist"));
        assert_eq!(f.stored_task(before.id).await, before);
    }

    #[tokio::test]
    async fn completing_the_last_subtask_unblocks_the_task() {
        let f = fixture();
        let task = f.task().await;
        let subtask = f.subtask(task.id).await;
        assert!(
            f.engine
                .transition_task(task.clone(), Status::Completed)
                .await
                .is_err()
        );

        f.engine
            .transition_subtask(subtask, Status::Completed)
            .await
            .unwrap();
        let (task, counts) = f
            .engine
            .transition_task(task, Status::Completed)
            .await
            .unwrap();

        assert_eq!(task.status(), Status::Completed);
        assert_eq!(counts, CompletionCounts { total: 1, completed: 1 });
    }

    #[tokio::test]
    async fn subtask_completes_without_guard() {
        let f = fixture();
        let subtask = f.subtask(TaskId::from_ulid(Ulid::new())).await;

        let subtask = f
            .engine
            .transition_subtask(subtask, Status::Completed)
            .await
            .unwrap();

        assert_eq!(subtask.status(), Status::Completed);
        assert_eq!(subtask.completed_at(), Some(start()));
    }

    #[rstest]
    #[case::pending(Status::Pending)]
    #[case::in_progress(Status::InProgress)]
    #[case::completed(Status::Completed)]
    #[tokio::test]
    async fn same_status_is_a_no_op(#[case] status: Status) {
        let f = fixture();
        let task = f.task().await;
        let (task, _) = f.engine.transition_task(task, status).await.unwrap();
        let before = f.stored_task(task.id).await;
        f.clock.advance(Duration::hours(1));

        let (after, _) = f.engine.transition_task(task, status).await.unwrap();

        assert_eq!(after, before);
        assert_eq!(after.completed_at(), before.completed_at());
        assert_eq!(f.stored_task(after.id).await, before);
    }

    #[tokio::test]
    async fn already_completed_task_stays_completed_even_with_new_pending_subtask() {
        let f = fixture();
        let task = f.task().await;
        let (task, _) = f
            .engine
            .transition_task(task, Status::Completed)
            .await
            .unwrap();
        f.subtask(task.id).await;

        let (after, counts) = f
            .engine
            .transition_task(task.clone(), Status::Completed)
            .await
            .unwrap();

        assert_eq!(after, task);
        assert_eq!(counts.pending(), 1);
    }

    #[tokio::test]
    async fn reopen_then_complete_sets_a_later_timestamp() {
        let f = fixture();
        let task = f.task().await;
        let (task, _) = f
            .engine
            .transition_task(task, Status::Completed)
            .await
            .unwrap();
        let first = task.completed_at().unwrap();

        let (task, _) = f
            .engine
            .transition_task(task, Status::InProgress)
            .await
            .unwrap();
        assert_eq!(task.completed_at(), None);

        f.clock.advance(Duration::minutes(5));
        let (task, _) = f
            .engine
            .transition_task(task, Status::Completed)
            .await
            .unwrap();

        let second = task.completed_at().unwrap();
        assert!(second >= first);
        assert_eq!(second, start() + Duration::minutes(5));
    }

    #[tokio::test]
    async fn pending_and_in_progress_keep_timestamp_empty() {
        let f = fixture();
        let subtask = f.subtask(TaskId::from_ulid(Ulid::new())).await;

        let subtask = f
            .engine
            .transition_subtask(subtask, Status::InProgress)
            .await
            .unwrap();
        assert_eq!(subtask.completed_at(), None);

        let subtask = f
            .engine
            .transition_subtask(subtask, Status::Pending)
            .await
            .unwrap();
        assert_eq!(subtask.completed_at(), None);
    }
}
