//! Impls - port implementations for development and tests.
//!
//! # Included
//! - **InMemoryEntityStore**: `EntityStore` + `UserLookup` in process memory
//!
//! A database-backed store belongs in its own crate.

pub mod inmem_store;

pub use self::inmem_store::InMemoryEntityStore;
