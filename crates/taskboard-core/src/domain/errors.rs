//! Errors surfaced by the core, and their classification.

use thiserror::Error;

use super::ids::{SubtaskId, TaskId, UserId};

/// Coarse classification of a [`TaskboardError`].
///
/// The request layer maps each kind to a protocol status; the core itself
/// never recovers from or retries any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced User, Task or Subtask does not exist.
    NotFound,
    /// A uniqueness rule was violated (duplicate email).
    Conflict,
    /// A Task completion was attempted while Subtasks are unfinished.
    BusinessRule,
    /// The caller supplied malformed input.
    InvalidInput,
    /// The entity store failed.
    Infrastructure,
}

/// Failure reported by an `EntityStore` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unique constraint violated on {field}: {value}")]
    UniqueViolation { field: &'static str, value: String },

    #[error("entity store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum TaskboardError {
    #[error("user not found with id: {0}")]
    UserNotFound(UserId),

    #[error("user not found with email: {0}")]
    UserEmailNotFound(String),

    #[error("task not found with id: {0}")]
    TaskNotFound(TaskId),

    #[error("subtask not found with id: {0}")]
    SubtaskNotFound(SubtaskId),

    #[error("email already in use: {0}")]
    EmailConflict(String),

    #[error("cannot complete task {task_id}: pending subtasks exist ({pending} of {total} not completed)")]
    BusinessRuleViolation {
        task_id: TaskId,
        pending: u64,
        total: u64,
    },

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaskboardError::UserNotFound(_)
            | TaskboardError::UserEmailNotFound(_)
            | TaskboardError::TaskNotFound(_)
            | TaskboardError::SubtaskNotFound(_) => ErrorKind::NotFound,
            TaskboardError::EmailConflict(_) => ErrorKind::Conflict,
            TaskboardError::BusinessRuleViolation { .. } => ErrorKind::BusinessRule,
            TaskboardError::Validation { .. } => ErrorKind::InvalidInput,
            TaskboardError::Store(StoreError::UniqueViolation { .. }) => ErrorKind::Conflict,
            TaskboardError::Store(StoreError::Unavailable(_)) => ErrorKind::Infrastructure,
        }
    }

    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        TaskboardError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = TaskboardError> = std::result::Result<T, E>;
