//! UserLookup port - email existence check used before creating a User.

use async_trait::async_trait;

use crate::domain::StoreError;

/// Answers whether an email is already taken.
///
/// The pre-check gives the friendly `EmailConflict` path; the store's unique
/// constraint still covers two creations racing past it.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn exists(&self, email: &str) -> Result<bool, StoreError>;
}
