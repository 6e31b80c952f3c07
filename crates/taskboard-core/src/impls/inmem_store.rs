//! InMemoryEntityStore - development and test store.
//!
//! # Implementation
//! - one `tokio::sync::Mutex` around all maps; every trait call takes the
//!   lock once, so each call is atomic but consecutive calls are not
//! - insertion order is tracked separately so sorted queries break ties
//!   the same way every time

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{
    Clause, Page, PageRequest, SortDirection, SortKey, Specification, Status, StoreError,
    SubtaskClause, SubtaskId, SubtaskRecord, TaskClause, TaskId, TaskRecord, Tracked, UserId,
    UserRecord,
};
use crate::ports::{EntityStore, UserLookup};

#[derive(Default)]
struct InMemoryStoreState {
    users: HashMap<UserId, UserRecord>,

    /// email -> owner, backs the unique constraint.
    emails: HashMap<String, UserId>,

    tasks: HashMap<TaskId, TaskRecord>,
    task_order: Vec<TaskId>,

    subtasks: HashMap<SubtaskId, SubtaskRecord>,
    subtask_order: Vec<SubtaskId>,
}

impl InMemoryStoreState {
    fn tasks_in_order(&self) -> impl Iterator<Item = &TaskRecord> {
        self.task_order.iter().filter_map(|id| self.tasks.get(id))
    }

    fn subtasks_in_order(&self) -> impl Iterator<Item = &SubtaskRecord> {
        self.subtask_order
            .iter()
            .filter_map(|id| self.subtasks.get(id))
    }

    fn subtasks_of(&self, task_id: TaskId) -> impl Iterator<Item = &SubtaskRecord> {
        self.subtasks.values().filter(move |s| s.task_id == task_id)
    }
}

/// Fields a query can be ordered by.
trait Sortable {
    fn created_at(&self) -> DateTime<Utc>;
    fn title(&self) -> &str;
    fn status(&self) -> Status;
}

impl Sortable for TaskRecord {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn status(&self) -> Status {
        Tracked::status(self)
    }
}

impl Sortable for SubtaskRecord {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn status(&self) -> Status {
        Tracked::status(self)
    }
}

/// Filter, order (stable, so ties keep insertion order) and slice.
fn run_query<'a, T, C>(
    records: impl Iterator<Item = &'a T>,
    spec: &Specification<C>,
    page: PageRequest,
) -> Page<T>
where
    T: Sortable + Clone + 'a,
    C: Clause<T>,
{
    let mut matched: Vec<T> = records.filter(|r| spec.matches(*r)).cloned().collect();
    matched.sort_by(|a, b| {
        let ordering = match page.sort.key {
            SortKey::CreatedAt => a.created_at().cmp(&b.created_at()),
            SortKey::Title => a.title().cmp(b.title()),
            SortKey::Status => a.status().cmp(&b.status()),
        };
        match page.sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    Page::from_ordered(matched, page)
}

/// InMemoryEntityStore keeps every record in process memory.
///
/// Cloning is cheap and clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryEntityStore {
    state: Arc<Mutex<InMemoryStoreState>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }

    pub async fn task_count(&self) -> usize {
        self.state.lock().await.tasks.len()
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn get_user(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .emails
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<TaskRecord>, StoreError> {
        Ok(self.state.lock().await.tasks.get(&id).cloned())
    }

    async fn get_subtask(&self, id: SubtaskId) -> Result<Option<SubtaskRecord>, StoreError> {
        Ok(self.state.lock().await.subtasks.get(&id).cloned())
    }

    async fn save_user(&self, user: UserRecord) -> Result<UserRecord, StoreError> {
        let mut state = self.state.lock().await;

        if let Some(owner) = state.emails.get(&user.email)
            && *owner != user.id
        {
            return Err(StoreError::UniqueViolation {
                field: "email",
                value: user.email,
            });
        }
        if let Some(previous) = state.users.get(&user.id)
            && previous.email != user.email
        {
            let stale = previous.email.clone();
            state.emails.remove(&stale);
        }

        state.emails.insert(user.email.clone(), user.id);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save_task(&self, task: TaskRecord) -> Result<TaskRecord, StoreError> {
        let mut state = self.state.lock().await;
        if state.tasks.insert(task.id, task.clone()).is_none() {
            state.task_order.push(task.id);
        }
        Ok(task)
    }

    async fn save_subtask(&self, subtask: SubtaskRecord) -> Result<SubtaskRecord, StoreError> {
        let mut state = self.state.lock().await;
        if state.subtasks.insert(subtask.id, subtask.clone()).is_none() {
            state.subtask_order.push(subtask.id);
        }
        Ok(subtask)
    }

    async fn count_by_task(&self, task_id: TaskId) -> Result<u64, StoreError> {
        let state = self.state.lock().await;
        Ok(state.subtasks_of(task_id).count() as u64)
    }

    async fn count_by_task_and_status(
        &self,
        task_id: TaskId,
        status: Status,
    ) -> Result<u64, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .subtasks_of(task_id)
            .filter(|s| Tracked::status(*s) == status)
            .count() as u64)
    }

    async fn query_tasks(
        &self,
        spec: &Specification<TaskClause>,
        page: PageRequest,
    ) -> Result<Page<TaskRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(run_query(state.tasks_in_order(), spec, page))
    }

    async fn query_subtasks(
        &self,
        spec: &Specification<SubtaskClause>,
        page: PageRequest,
    ) -> Result<Page<SubtaskRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(run_query(state.subtasks_in_order(), spec, page))
    }
}

#[async_trait]
impl UserLookup for InMemoryEntityStore {
    async fn exists(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.state.lock().await.emails.contains_key(email))
    }
}
