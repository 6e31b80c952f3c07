//! ServiceConfig - tunables for the service facade.

use std::env;

use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE_VAR: &str = "TASKBOARD_DEFAULT_PAGE_SIZE";
pub const MAX_PAGE_SIZE_VAR: &str = "TASKBOARD_MAX_PAGE_SIZE";

/// Paging limits applied to every list and search operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Size used when the caller does not pick one.
    pub default_page_size: u32,
    /// Requested sizes above this are clamped down.
    pub max_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("page sizes must be non-zero (default {default}, max {max})")]
    ZeroPageSize { default: u32, max: u32 },

    #[error("default page size {default} exceeds max page size {max}")]
    DefaultAboveMax { default: u32, max: u32 },
}

impl ServiceConfig {
    /// Read overrides from the process environment; unset variables keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(DEFAULT_PAGE_SIZE_VAR) {
            config.default_page_size = parse_size(DEFAULT_PAGE_SIZE_VAR, &value)?;
        }
        if let Some(value) = lookup(MAX_PAGE_SIZE_VAR) {
            config.max_page_size = parse_size(MAX_PAGE_SIZE_VAR, &value)?;
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(ConfigError::ZeroPageSize {
                default: self.default_page_size,
                max: self.max_page_size,
            });
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::DefaultAboveMax {
                default: self.default_page_size,
                max: self.max_page_size,
            });
        }
        Ok(())
    }
}

fn parse_size(name: &'static str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        })
}
