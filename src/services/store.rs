use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{Account, ActionRecord, Decision, Message, NewProfile, Profile, ProfileChanges, UserId};

/// Failures raised by storage adapters
///
/// Every variant is transient from the caller's point of view: the
/// operation did not apply and may be retried with backoff.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage query failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Profile storage keyed by user identity
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, StoreError>;

    /// Every stored profile, in no particular order
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;

    /// Create or replace a profile; `created_at` survives replacement
    async fn upsert_profile(&self, profile: &NewProfile) -> Result<Profile, StoreError>;

    /// Apply a partial update; `None` when no profile exists for the user
    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>, StoreError>;
}

/// Decision ledger storage
#[async_trait]
pub trait ActionStore: Send + Sync {
    /// Atomic upsert keyed on (actor, target). Must be committed and visible
    /// to subsequent reads before returning.
    async fn upsert_action(
        &self,
        actor_id: &UserId,
        target_id: &UserId,
        decision: Decision,
    ) -> Result<ActionRecord, StoreError>;

    async fn find_action(
        &self,
        actor_id: &UserId,
        target_id: &UserId,
    ) -> Result<Option<ActionRecord>, StoreError>;

    /// Targets the actor decided on, optionally restricted to one decision,
    /// ordered by record `created_at` then target id
    async fn targets_of(
        &self,
        actor_id: &UserId,
        decision: Option<Decision>,
    ) -> Result<Vec<UserId>, StoreError>;
}

/// Append-only message log
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn append_message(
        &self,
        sender_id: &UserId,
        receiver_id: &UserId,
        text: &str,
    ) -> Result<Message, StoreError>;

    /// Messages between `a` and `b` in either direction, oldest first,
    /// at most `limit` of them
    async fn conversation(
        &self,
        a: &UserId,
        b: &UserId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError>;
}

/// Account credentials storage
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account; `None` when the email is already registered
    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<Account>, StoreError>;

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Bundle of storage collaborators handed to the engine and the routes
#[derive(Clone)]
pub struct Storage {
    pub accounts: Arc<dyn AccountStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub actions: Arc<dyn ActionStore>,
    pub messages: Arc<dyn MessageStore>,
    pub health: Arc<dyn HealthCheck>,
}

impl Storage {
    /// Use one adapter for every port
    pub fn from_backend<S>(backend: Arc<S>) -> Self
    where
        S: AccountStore + ProfileStore + ActionStore + MessageStore + HealthCheck + 'static,
    {
        Self {
            accounts: backend.clone(),
            profiles: backend.clone(),
            actions: backend.clone(),
            messages: backend.clone(),
            health: backend,
        }
    }

    /// Fresh in-memory storage
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(crate::services::MemoryStore::new()))
    }

    /// Replace the profile port, e.g. with a caching decorator
    pub fn with_profiles(mut self, profiles: Arc<dyn ProfileStore>) -> Self {
        self.profiles = profiles;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_unavailable() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(_)));

        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Query(_)));
    }
}
