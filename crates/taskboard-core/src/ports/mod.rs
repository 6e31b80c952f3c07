//! Ports - collaborator interfaces.
//!
//! Each trait hides one external concern (storage, lookup, time, id
//! allocation) so the core can run against the in-memory implementations in
//! `impls` or against a database-backed one.

pub mod clock;
pub mod entity_store;
pub mod id_generator;
pub mod user_lookup;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::entity_store::EntityStore;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::user_lookup::UserLookup;
