//! TaskboardService - the operations exposed to the request layer.
//!
//! Every call loads what it needs, delegates status changes to the
//! [`StatusTransitionEngine`] and returns read models. Errors are returned to
//! the caller as they are; nothing here retries.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{
    CompletionCounts, NewSubtask, NewTask, NewUser, Page, PageRequest, Result, Status,
    StoreError, SubtaskFilter, SubtaskId, SubtaskRecord, SubtaskView, TaskFilter, TaskId,
    TaskRecord, TaskView, TaskboardError, Tracked, UserId, UserRecord, UserView,
};
use crate::ports::{Clock, EntityStore, IdGenerator, UserLookup};

use super::completion::CompletionAggregator;
use super::config::ServiceConfig;
use super::transition::StatusTransitionEngine;

/// Built by [`ServiceBuilder`](super::ServiceBuilder).
#[derive(Clone)]
pub struct TaskboardService {
    store: Arc<dyn EntityStore>,
    users: Arc<dyn UserLookup>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    aggregator: CompletionAggregator,
    engine: StatusTransitionEngine,
    config: ServiceConfig,
}

impl TaskboardService {
    pub(crate) fn new(
        store: Arc<dyn EntityStore>,
        users: Arc<dyn UserLookup>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        let aggregator = CompletionAggregator::new(store.clone());
        let engine = StatusTransitionEngine::new(store.clone(), aggregator.clone(), clock.clone());
        Self {
            store,
            users,
            ids,
            clock,
            aggregator,
            engine,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // ---- users ----

    pub async fn create_user(&self, new_user: NewUser) -> Result<UserView> {
        let (name, email) = new_user.validate()?;

        if self.users.exists(&email).await? {
            warn!(email = %email, "email already in use");
            return Err(TaskboardError::EmailConflict(email));
        }

        let user = UserRecord {
            id: self.ids.generate_user_id(),
            name,
            email,
            created_at: self.clock.now(),
        };
        let user = self.store.save_user(user).await.map_err(|err| match err {
            StoreError::UniqueViolation { value, .. } => {
                warn!(email = %value, "email claimed concurrently");
                TaskboardError::EmailConflict(value)
            }
            other => other.into(),
        })?;

        info!(user_id = %user.id, "user created");
        Ok(UserView::from(&user))
    }

    pub async fn get_user(&self, id: UserId) -> Result<UserView> {
        let user = self.load_user(id).await?;
        Ok(UserView::from(&user))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<UserView> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| TaskboardError::UserEmailNotFound(email.to_string()))?;
        Ok(UserView::from(&user))
    }

    // ---- tasks ----

    pub async fn create_task(&self, new_task: NewTask) -> Result<TaskView> {
        let (title, description) = new_task.validate()?;
        let owner = self.load_user(new_task.user_id).await?;

        let task = TaskRecord::new(
            self.ids.generate_task_id(),
            owner.id,
            title,
            description,
            self.clock.now(),
        );
        let task = self.store.save_task(task).await?;

        info!(task_id = %task.id, user_id = %owner.id, "task created");
        Ok(TaskView::project(&task, &owner, CompletionCounts::default()))
    }

    pub async fn get_task(&self, id: TaskId) -> Result<TaskView> {
        let task = self.load_task(id).await?;
        let owner = self.load_user(task.user_id).await?;
        let counts = self.aggregator.counts(task.id).await?;
        Ok(TaskView::project(&task, &owner, counts))
    }

    /// Fails with `BusinessRuleViolation` when completing a Task that still
    /// has unfinished Subtasks. The returned counts are the ones the guard saw.
    pub async fn update_task_status(&self, id: TaskId, status: Status) -> Result<TaskView> {
        let task = self.load_task(id).await?;
        let owner = self.load_user(task.user_id).await?;
        let (task, counts) = self.engine.transition_task(task, status).await?;

        info!(task_id = %task.id, status = %task.status(), "task status updated");
        Ok(TaskView::project(&task, &owner, counts))
    }

    pub async fn search_tasks(
        &self,
        filter: &TaskFilter,
        page: Option<PageRequest>,
    ) -> Result<Page<TaskView>> {
        let request = self.page_request(page);
        let spec = filter.to_specification();
        debug!(?filter, ?request, "searching tasks");

        let found = self.store.query_tasks(&spec, request).await?;

        let mut owners: HashMap<UserId, UserRecord> = HashMap::new();
        let mut items = Vec::with_capacity(found.items.len());
        for task in &found.items {
            if !owners.contains_key(&task.user_id) {
                let owner = self.load_user(task.user_id).await?;
                owners.insert(owner.id, owner);
            }
            let owner = &owners[&task.user_id];
            let counts = self.aggregator.counts(task.id).await?;
            items.push(TaskView::project(task, owner, counts));
        }

        info!(total = found.total, returned = items.len(), "tasks searched");
        Ok(Page::new(items, found.total, request))
    }

    // ---- subtasks ----

    pub async fn create_subtask(
        &self,
        task_id: TaskId,
        new_subtask: NewSubtask,
    ) -> Result<SubtaskView> {
        let (title, description) = new_subtask.validate()?;
        let task = self.load_task(task_id).await?;

        let subtask = SubtaskRecord::new(
            self.ids.generate_subtask_id(),
            task.id,
            title,
            description,
            self.clock.now(),
        );
        let subtask = self.store.save_subtask(subtask).await?;

        info!(subtask_id = %subtask.id, task_id = %task.id, "subtask created");
        Ok(SubtaskView::project(&subtask, &task))
    }

    pub async fn get_subtask(&self, id: SubtaskId) -> Result<SubtaskView> {
        let subtask = self.load_subtask(id).await?;
        let task = self.load_task(subtask.task_id).await?;
        Ok(SubtaskView::project(&subtask, &task))
    }

    pub async fn update_subtask_status(
        &self,
        id: SubtaskId,
        status: Status,
    ) -> Result<SubtaskView> {
        let subtask = self.load_subtask(id).await?;
        let task = self.load_task(subtask.task_id).await?;
        let subtask = self.engine.transition_subtask(subtask, status).await?;

        info!(
            subtask_id = %subtask.id,
            status = %subtask.status(),
            "subtask status updated"
        );
        Ok(SubtaskView::project(&subtask, &task))
    }

    /// Subtasks of one Task. Unlike a filtered search, an unknown Task is an error.
    pub async fn list_subtasks_of_task(
        &self,
        task_id: TaskId,
        page: Option<PageRequest>,
    ) -> Result<Page<SubtaskView>> {
        let task = self.load_task(task_id).await?;
        let request = self.page_request(page);
        let spec = SubtaskFilter::default().with_task(task.id).to_specification();

        let found = self.store.query_subtasks(&spec, request).await?;
        Ok(found.map(|subtask| SubtaskView::project(&subtask, &task)))
    }

    pub async fn search_subtasks(
        &self,
        filter: &SubtaskFilter,
        page: Option<PageRequest>,
    ) -> Result<Page<SubtaskView>> {
        let request = self.page_request(page);
        let spec = filter.to_specification();
        debug!(?filter, ?request, "searching subtasks");

        let found = self.store.query_subtasks(&spec, request).await?;

        let mut parents: HashMap<TaskId, TaskRecord> = HashMap::new();
        let mut items = Vec::with_capacity(found.items.len());
        for subtask in &found.items {
            if !parents.contains_key(&subtask.task_id) {
                let task = self.load_task(subtask.task_id).await?;
                parents.insert(task.id, task);
            }
            items.push(SubtaskView::project(subtask, &parents[&subtask.task_id]));
        }

        info!(total = found.total, returned = items.len(), "subtasks searched");
        Ok(Page::new(items, found.total, request))
    }

    // ---- helpers ----

    fn page_request(&self, page: Option<PageRequest>) -> PageRequest {
        page.unwrap_or_else(|| PageRequest::new(0, self.config.default_page_size))
            .clamped(self.config.max_page_size)
    }

    async fn load_user(&self, id: UserId) -> Result<UserRecord> {
        self.store
            .get_user(id)
            .await?
            .ok_or(TaskboardError::UserNotFound(id))
    }

    async fn load_task(&self, id: TaskId) -> Result<TaskRecord> {
        self.store
            .get_task(id)
            .await?
            .ok_or(TaskboardError::TaskNotFound(id))
    }

    async fn load_subtask(&self, id: SubtaskId) -> Result<SubtaskRecord> {
        self.store
            .get_subtask(id)
            .await?
            .ok_or(TaskboardError::SubtaskNotFound(id))
    }
}
