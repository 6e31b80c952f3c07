//! App - application layer.
//!
//! Combines the ports into the operations the request layer calls.
//!
//! # Components
//! - **CompletionAggregator**: Subtask totals per Task
//! - **StatusTransitionEngine**: status changes and the completion guard
//! - **TaskboardService**: create / get / update / search facade
//! - **ServiceBuilder**: wiring with startup validation
//! - **ServiceConfig**: paging limits, from defaults or the environment

pub mod builder;
pub mod completion;
pub mod config;
pub mod service;
pub mod transition;

pub use self::builder::{BuildError, ServiceBuilder};
pub use self::completion::CompletionAggregator;
pub use self::config::{ConfigError, ServiceConfig};
pub use self::service::TaskboardService;
pub use self::transition::StatusTransitionEngine;
