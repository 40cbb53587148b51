use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Account, ActionRecord, Decision, Message, NewProfile, Profile, ProfileChanges, UserId};
use crate::services::store::{AccountStore, ActionStore, HealthCheck, MessageStore, ProfileStore, StoreError};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<String, Account>,
    profiles: HashMap<UserId, Profile>,
    actions: HashMap<(UserId, UserId), ActionRecord>,
    // Append order doubles as the tie-break for equal timestamps
    messages: Vec<Message>,
}

/// In-process storage backend
///
/// Every port is served from a single `RwLock`, so each operation is atomic
/// with respect to every other. Used by the test suite and by the `memory`
/// storage backend for local development.
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    clock: Clock,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Build a store whose timestamps come from `clock`
    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self {
            state: RwLock::new(MemoryState::default()),
            clock: Arc::new(clock),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Number of ledger records, for inspection in tests
    pub async fn action_count(&self) -> usize {
        self.state.read().await.actions.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, StoreError> {
        Ok(self.state.read().await.profiles.get(user_id).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.state.read().await.profiles.values().cloned().collect())
    }

    async fn upsert_profile(&self, profile: &NewProfile) -> Result<Profile, StoreError> {
        let now = self.now();
        let mut state = self.state.write().await;
        let created_at = state
            .profiles
            .get(&profile.user_id)
            .map(|existing| existing.created_at)
            .unwrap_or(now);

        let stored = Profile {
            user_id: profile.user_id,
            nickname: profile.nickname.clone(),
            bio: profile.bio.clone(),
            tags: profile.tags.clone(),
            photos: profile.photos.clone(),
            age: profile.age,
            created_at,
            updated_at: now,
        };
        state.profiles.insert(profile.user_id, stored.clone());

        Ok(stored)
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>, StoreError> {
        let now = self.now();
        let mut state = self.state.write().await;
        let Some(profile) = state.profiles.get_mut(user_id) else {
            return Ok(None);
        };

        changes.apply_to(profile);
        profile.updated_at = now;

        Ok(Some(profile.clone()))
    }
}

#[async_trait]
impl ActionStore for MemoryStore {
    async fn upsert_action(
        &self,
        actor_id: &UserId,
        target_id: &UserId,
        decision: Decision,
    ) -> Result<ActionRecord, StoreError> {
        let now = self.now();
        let mut state = self.state.write().await;
        let record = state
            .actions
            .entry((*actor_id, *target_id))
            .and_modify(|existing| {
                existing.decision = decision;
                existing.updated_at = now;
            })
            .or_insert_with(|| ActionRecord {
                actor_id: *actor_id,
                target_id: *target_id,
                decision,
                created_at: now,
                updated_at: now,
            });

        Ok(record.clone())
    }

    async fn find_action(
        &self,
        actor_id: &UserId,
        target_id: &UserId,
    ) -> Result<Option<ActionRecord>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .actions
            .get(&(*actor_id, *target_id))
            .cloned())
    }

    async fn targets_of(
        &self,
        actor_id: &UserId,
        decision: Option<Decision>,
    ) -> Result<Vec<UserId>, StoreError> {
        let state = self.state.read().await;
        let mut records: Vec<&ActionRecord> = state
            .actions
            .values()
            .filter(|r| r.actor_id == *actor_id)
            .filter(|r| decision.map_or(true, |d| r.decision == d))
            .collect();

        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.target_id.cmp(&b.target_id))
        });

        Ok(records.into_iter().map(|r| r.target_id).collect())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append_message(
        &self,
        sender_id: &UserId,
        receiver_id: &UserId,
        text: &str,
    ) -> Result<Message, StoreError> {
        let message = Message {
            id: Uuid::new_v4(),
            sender_id: *sender_id,
            receiver_id: *receiver_id,
            text: text.to_string(),
            created_at: self.now(),
        };
        self.state.write().await.messages.push(message.clone());

        Ok(message)
    }

    async fn conversation(
        &self,
        a: &UserId,
        b: &UserId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError> {
        let state = self.state.read().await;
        let mut messages: Vec<Message> = state
            .messages
            .iter()
            .filter(|m| m.is_between(a, b))
            .cloned()
            .collect();

        // Stable sort keeps append order for equal timestamps
        messages.sort_by_key(|m| m.created_at);
        messages.truncate(limit);

        Ok(messages)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<Account>, StoreError> {
        let now = self.now();
        let mut state = self.state.write().await;
        if state.accounts.contains_key(email) {
            return Ok(None);
        }

        let account = Account {
            id: UserId::new(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
        };
        state.accounts.insert(email.to_string(), account.clone());

        Ok(Some(account))
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.state.read().await.accounts.get(email).cloned())
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn ticking_store() -> MemoryStore {
        let tick = AtomicI64::new(0);
        MemoryStore::with_clock(move || {
            let secs = tick.fetch_add(1, Ordering::SeqCst);
            Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
        })
    }

    #[tokio::test]
    async fn test_upsert_action_preserves_created_at() {
        let store = ticking_store();
        let a = UserId::new();
        let b = UserId::new();

        let first = store.upsert_action(&a, &b, Decision::Like).await.unwrap();
        let second = store.upsert_action(&a, &b, Decision::Dislike).await.unwrap();

        assert_eq!(store.action_count().await, 1);
        assert_eq!(second.decision, Decision::Dislike);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
    }

    #[tokio::test]
    async fn test_targets_of_filters_and_orders() {
        let store = ticking_store();
        let a = UserId::new();
        let b = UserId::new();
        let c = UserId::new();
        let d = UserId::new();

        store.upsert_action(&a, &c, Decision::Like).await.unwrap();
        store.upsert_action(&a, &b, Decision::Dislike).await.unwrap();
        store.upsert_action(&a, &d, Decision::Like).await.unwrap();
        store.upsert_action(&b, &a, Decision::Like).await.unwrap();

        let all = store.targets_of(&a, None).await.unwrap();
        assert_eq!(all, vec![c, b, d]);

        let liked = store.targets_of(&a, Some(Decision::Like)).await.unwrap();
        assert_eq!(liked, vec![c, d]);
    }

    #[tokio::test]
    async fn test_conversation_truncates_from_oldest_end() {
        let store = ticking_store();
        let a = UserId::new();
        let b = UserId::new();

        for text in ["one", "two", "three"] {
            store.append_message(&a, &b, text).await.unwrap();
        }

        let window = store.conversation(&b, &a, 2).await.unwrap();
        let texts: Vec<&str> = window.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        assert!(store.create_account("a@b.c", "h").await.unwrap().is_some());
        assert!(store.create_account("a@b.c", "h2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_profile_returns_none() {
        let store = MemoryStore::new();
        let changes = ProfileChanges {
            nickname: Some("Nova".to_string()),
            ..Default::default()
        };
        assert!(store.update_profile(&UserId::new(), &changes).await.unwrap().is_none());
    }
}
