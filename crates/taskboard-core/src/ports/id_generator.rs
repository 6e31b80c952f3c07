//! IdGenerator port - id allocation.
//!
//! # Implementations
//! - **UlidGenerator**: ULID from the injected clock plus random bits

use crate::domain::ids::{SubtaskId, TaskId, UserId};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator hands out fresh, collision-free ids.
///
/// ULIDs embed their creation millisecond, so ids sort in creation order
/// across processes without coordination.
pub trait IdGenerator: Send + Sync {
    fn generate_user_id(&self) -> UserId;

    fn generate_task_id(&self) -> TaskId;

    fn generate_subtask_id(&self) -> SubtaskId;
}

/// ULID-based generator.
///
/// The timestamp half comes from the clock, so a `FixedClock` yields ids
/// with a deterministic time component.
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_user_id(&self) -> UserId {
        UserId::from(self.next_ulid())
    }

    fn generate_task_id(&self) -> TaskId {
        TaskId::from(self.next_ulid())
    }

    fn generate_subtask_id(&self) -> SubtaskId {
        SubtaskId::from(self.next_ulid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn ulid_generator_generates_unique_ids() {
        let id_gen = UlidGenerator::new(SystemClock);

        let id1 = id_gen.generate_task_id();
        let id2 = id_gen.generate_task_id();
        let id3 = id_gen.generate_task_id();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn ulid_generator_with_fixed_clock_pins_timestamp() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(FixedClock::new(fixed_time));

        let id1 = id_gen.generate_user_id();
        let id2 = id_gen.generate_user_id();

        // random half still differs
        assert_ne!(id1, id2);
        assert_eq!(id1.as_ulid().timestamp_ms(), id2.as_ulid().timestamp_ms());
        assert_eq!(
            id1.as_ulid().timestamp_ms(),
            fixed_time.timestamp_millis() as u64
        );
    }

    #[test]
    fn different_id_kinds_are_generated() {
        let id_gen = UlidGenerator::new(SystemClock);

        assert!(id_gen.generate_user_id().to_string().starts_with("user-"));
        assert!(id_gen.generate_task_id().to_string().starts_with("task-"));
        assert!(
            id_gen
                .generate_subtask_id()
                .to_string()
                .starts_with("subtask-")
        );
    }
}
