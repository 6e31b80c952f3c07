//! Status + completion timestamp, kept consistent as one value.

use chrono::{DateTime, Utc};

use super::Status;

/// The mutable lifecycle part of a Task or Subtask.
///
/// Invariant: `completed_at.is_some() == status.is_completed()`.
/// The fields are private so the only way to change them is [`Progress::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    status: Status,
    completed_at: Option<DateTime<Utc>>,
}

impl Progress {
    /// Initial progress of every new entity.
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Compute the progress after moving to `requested` at time `now`.
    ///
    /// Returns `None` when `requested` equals the current status; the caller
    /// must then leave the entity untouched, including its completion time.
    ///
    /// Timestamp rules:
    /// - into `Completed`: `completed_at = now`
    /// - out of `Completed`: `completed_at` cleared
    /// - between `Pending` and `InProgress`: stays `None`
    pub fn advance(&self, requested: Status, now: DateTime<Utc>) -> Option<Progress> {
        if requested == self.status {
            return None;
        }
        let completed_at = match requested {
            Status::Completed => Some(now),
            Status::Pending | Status::InProgress => None,
        };
        Some(Progress {
            status: requested,
            completed_at,
        })
    }
}

/// Anything whose status is driven by the transition engine.
pub trait Tracked {
    fn progress(&self) -> &Progress;

    fn set_progress(&mut self, progress: Progress);

    fn status(&self) -> Status {
        self.progress().status()
    }

    fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.progress().completed_at()
    }
}
