// Service exports
pub mod accounts;
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod store;

pub use accounts::{AccountError, AccountService};
pub use cache::{CacheError, CacheKey, CacheManager, CacheStats, CachedProfileStore};
pub use memory::MemoryStore;
pub use postgres::{PostgresClient, PostgresError};
pub use store::{AccountStore, ActionStore, HealthCheck, MessageStore, ProfileStore, Storage, StoreError};
