//! Roomance - matchmaking backend
//!
//! The core is a relationship engine over a like/dislike ledger: discovery
//! candidate selection, mutual-match detection, and chat eligibility with
//! ordered message history. Storage is injected through the ports in
//! [`services::store`], with PostgreSQL and in-memory adapters.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Engine, EngineError};
pub use models::{ActionRecord, Decision, Message, Profile, UserId};
pub use services::{MemoryStore, Storage, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_library_exports() {
        let engine = Engine::new(&Storage::in_memory());
        let user = UserId::new();
        assert!(engine.next_candidate(&user).await.unwrap().is_none());
    }
}
