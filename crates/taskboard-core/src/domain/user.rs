//! User record and its creation input.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;

use super::errors::{Result, TaskboardError};
use super::ids::UserId;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 150;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern must compile"));

/// A stored User. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a User.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Check field rules and return the normalized `(name, email)` pair.
    pub fn validate(&self) -> Result<(String, String)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(TaskboardError::validation("name", "must not be blank"));
        }
        let name_chars = name.chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_chars) {
            return Err(TaskboardError::validation(
                "name",
                format!("must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"),
            ));
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(TaskboardError::validation("email", "must not be blank"));
        }
        if email.chars().count() > EMAIL_MAX_CHARS {
            return Err(TaskboardError::validation(
                "email",
                format!("must not exceed {EMAIL_MAX_CHARS} characters"),
            ));
        }
        if !EMAIL_PATTERN.is_match(email) {
            return Err(TaskboardError::validation("email", "must be a valid address"));
        }

        Ok((name.to_string(), email.to_string()))
    }
}
