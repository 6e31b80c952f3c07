//! ServiceBuilder - wiring and startup validation for [`TaskboardService`].
//!
//! # Fail-fast
//! Configuration is checked in `build()`, so a bad page-size setting stops
//! the process at startup instead of surfacing on the first search.

use std::sync::Arc;

use crate::ports::{Clock, EntityStore, IdGenerator, SystemClock, UlidGenerator, UserLookup};

use super::config::{ConfigError, ServiceConfig};
use super::service::TaskboardService;

/// ServiceBuilder assembles a [`TaskboardService`] from its ports.
///
/// # Example
/// ```ignore
/// let store = Arc::new(InMemoryEntityStore::new());
/// let service = ServiceBuilder::new(store.clone(), store)
///     .config(ServiceConfig::from_env()?)
///     .build()?;
/// ```
///
/// Defaults: [`SystemClock`], a [`UlidGenerator`] driven by the chosen clock,
/// and [`ServiceConfig::default`].
pub struct ServiceBuilder {
    store: Arc<dyn EntityStore>,
    users: Arc<dyn UserLookup>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    config: ServiceConfig,
}

/// BuildError is returned when the service can not be assembled.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid service configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl ServiceBuilder {
    pub fn new(store: Arc<dyn EntityStore>, users: Arc<dyn UserLookup>) -> Self {
        Self {
            store,
            users,
            clock: None,
            ids: None,
            config: ServiceConfig::default(),
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration and build the service.
    pub fn build(self) -> Result<TaskboardService, BuildError> {
        self.config.validate()?;

        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let ids: Arc<dyn IdGenerator> = match self.ids {
            Some(ids) => ids,
            None => Arc::new(UlidGenerator::new(clock.clone())),
        };

        Ok(TaskboardService::new(
            self.store,
            self.users,
            ids,
            clock,
            self.config,
        ))
    }
}
