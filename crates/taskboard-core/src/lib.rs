//! taskboard-core
//!
//! Core of a task tracker: Users own Tasks, Tasks own Subtasks, and a Task
//! can only be completed once every one of its Subtasks is.
//!
//! # Modules
//! - **domain**: ids, status, records, filters, pagination, read models, errors
//! - **ports**: collaborator traits (EntityStore, UserLookup, Clock, IdGenerator)
//! - **app**: completion aggregator, transition engine, service facade, builder, config
//! - **impls**: in-memory store for development and tests

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{ServiceBuilder, ServiceConfig, TaskboardService};
pub use domain::{ErrorKind, Result, TaskboardError};
