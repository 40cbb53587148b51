use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::{NewProfile, Profile, ProfileChanges, UserId};
use crate::services::store::{ProfileStore, StoreError};

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Multi-tier cache manager
///
/// Without Redis the manager runs a single in-process `moka` tier. With
/// Redis, Redis is the only tier: an in-process copy could not observe
/// invalidations made by other instances.
///
/// Fills are guarded by a write epoch. Writers bump it before deleting a
/// key; readers compare it across their fill and drop the entry they just
/// wrote if it moved.
pub struct CacheManager {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: Option<moka::future::Cache<String, Vec<u8>>>,
    local_epoch: AtomicU64,
    ttl_secs: u64,
}

const EPOCH_KEY: &str = "cache:write_epoch";

impl CacheManager {
    /// Create a cache manager backed by Redis
    pub async fn new(redis_url: &str, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Some(Arc::new(tokio::sync::Mutex::new(redis))),
            l1_cache: None,
            local_epoch: AtomicU64::new(0),
            ttl_secs,
        })
    }

    /// Create an in-process cache manager
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        Self {
            redis: None,
            l1_cache: Some(build_l1(l1_size, ttl_secs)),
            local_epoch: AtomicU64::new(0),
            ttl_secs,
        }
    }

    /// Get a value. `Ok(None)` on a miss.
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(l1) = &self.l1_cache {
            return match l1.get(key).await {
                Some(bytes) => {
                    tracing::trace!("L1 cache hit: {}", key);
                    Ok(Some(serde_json::from_slice(&bytes)?))
                }
                None => {
                    tracing::trace!("Cache miss: {}", key);
                    Ok(None)
                }
            };
        }

        let Some(l2) = &self.redis else {
            return Ok(None);
        };

        let mut conn = l2.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        match value {
            Some(json) => {
                tracing::trace!("L2 cache hit: {}", key);
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Ok(None)
            }
        }
    }

    /// Set a value
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        if let Some(l1) = &self.l1_cache {
            l1.insert(key.to_string(), json.into_bytes()).await;
        } else if let Some(l2) = &self.redis {
            let mut conn = l2.lock().await;
            redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async::<()>(&mut *conn)
                .await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        if let Some(l1) = &self.l1_cache {
            l1.invalidate(key).await;
        }

        if let Some(l2) = &self.redis {
            let mut conn = l2.lock().await;
            redis::cmd("DEL")
                .arg(key)
                .query_async::<()>(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Current write epoch, shared through Redis when L2 is enabled
    pub async fn epoch(&self) -> Result<u64, CacheError> {
        let Some(l2) = &self.redis else {
            return Ok(self.local_epoch.load(Ordering::SeqCst));
        };

        let mut conn = l2.lock().await;
        let epoch: Option<u64> = redis::cmd("GET")
            .arg(EPOCH_KEY)
            .query_async(&mut *conn)
            .await?;
        Ok(epoch.unwrap_or(0))
    }

    /// Advance the write epoch; call before deleting the keys a write touched
    pub async fn bump_epoch(&self) -> Result<(), CacheError> {
        let Some(l2) = &self.redis else {
            self.local_epoch.fetch_add(1, Ordering::SeqCst);
            return Ok(());
        };

        let mut conn = l2.lock().await;
        redis::cmd("INCR")
            .arg(EPOCH_KEY)
            .query_async::<()>(&mut *conn)
            .await?;
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.as_ref().map_or(0, |l1| l1.entry_count()),
            l2_enabled: self.redis.is_some(),
        }
    }
}

fn build_l1(l1_size: u64, ttl_secs: u64) -> moka::future::Cache<String, Vec<u8>> {
    moka::future::CacheBuilder::new(l1_size)
        .time_to_live(Duration::from_secs(ttl_secs))
        .build()
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub l2_enabled: bool,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a user profile
    pub fn profile(user_id: &UserId) -> String {
        format!("profile:{}", user_id)
    }
}

/// Read-through profile cache in front of another `ProfileStore`
///
/// Writes go to the inner store first, then the cached entry is dropped in
/// the same call. Listing always hits the inner store.
pub struct CachedProfileStore {
    inner: Arc<dyn ProfileStore>,
    cache: Arc<CacheManager>,
}

impl CachedProfileStore {
    pub fn new(inner: Arc<dyn ProfileStore>, cache: Arc<CacheManager>) -> Self {
        Self { inner, cache }
    }

    /// Drop the cached entry after a committed write. The write already
    /// happened, so a cache failure is logged rather than returned.
    async fn invalidate(&self, user_id: &UserId) {
        if let Err(e) = self.cache.bump_epoch().await {
            tracing::warn!("Failed to advance cache epoch for {}: {}", user_id, e);
        }
        if let Err(e) = self.cache.delete(&CacheKey::profile(user_id)).await {
            tracing::warn!("Failed to invalidate cached profile {}: {}", user_id, e);
        }
    }

    /// Cache a profile read at `epoch`, then undo the fill if a write
    /// invalidated in the meantime
    async fn fill(&self, key: &str, profile: &Profile, epoch: u64) {
        if let Err(e) = self.cache.set(key, profile).await {
            tracing::warn!("Failed to cache profile {}: {}", profile.user_id, e);
            return;
        }

        let unchanged = matches!(self.cache.epoch().await, Ok(current) if current == epoch);
        if !unchanged {
            tracing::debug!("Profile {} changed during fill, dropping entry", profile.user_id);
            if let Err(e) = self.cache.delete(key).await {
                tracing::warn!("Failed to drop raced cache entry {}: {}", key, e);
            }
        }
    }
}

#[async_trait]
impl ProfileStore for CachedProfileStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, StoreError> {
        let key = CacheKey::profile(user_id);
        match self.cache.get::<Profile>(&key).await {
            Ok(Some(profile)) => return Ok(Some(profile)),
            Ok(None) => {}
            Err(e) => tracing::warn!("Profile cache read failed for {}: {}", user_id, e),
        }

        // Read the epoch before the inner store so a concurrent write is
        // always noticed by `fill`
        let epoch = match self.cache.epoch().await {
            Ok(epoch) => Some(epoch),
            Err(e) => {
                tracing::warn!("Cache epoch unavailable, skipping fill: {}", e);
                None
            }
        };

        let profile = self.inner.get_profile(user_id).await?;
        if let (Some(profile), Some(epoch)) = (&profile, epoch) {
            self.fill(&key, profile, epoch).await;
        }

        Ok(profile)
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        self.inner.list_profiles().await
    }

    async fn upsert_profile(&self, profile: &NewProfile) -> Result<Profile, StoreError> {
        let stored = self.inner.upsert_profile(profile).await?;
        self.invalidate(&profile.user_id).await;
        Ok(stored)
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>, StoreError> {
        let updated = self.inner.update_profile(user_id, changes).await?;
        self.invalidate(user_id).await;
        Ok(updated)
    }
}
