//! Domain model (ids, status, records, filters, pages, read models, errors).

pub mod errors;
pub mod filter;
pub mod ids;
pub mod page;
pub mod progress;
pub mod status;
pub mod subtask;
pub mod task;
pub mod user;
pub mod view;

pub use self::errors::{ErrorKind, Result, StoreError, TaskboardError};
pub use self::filter::{
    Clause, Specification, SubtaskClause, SubtaskFilter, TaskClause, TaskFilter, TitleNeedle,
};
pub use self::ids::{SubtaskId, TaskId, UserId};
pub use self::page::{Page, PageRequest, Sort, SortDirection, SortKey};
pub use self::progress::{Progress, Tracked};
pub use self::status::Status;
pub use self::subtask::{NewSubtask, SubtaskRecord};
pub use self::task::{NewTask, TaskRecord};
pub use self::user::{NewUser, UserRecord};
pub use self::view::{CompletionCounts, SubtaskView, TaskView, UserView};
