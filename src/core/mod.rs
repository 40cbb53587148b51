// Relationship engine exports
pub mod chat;
pub mod discovery;
pub mod error;
pub mod ledger;
pub mod matcher;

pub use chat::ChatResolver;
pub use discovery::{select_candidate, DiscoverySelector};
pub use error::EngineError;
pub use ledger::ActionLedger;
pub use matcher::MatchDetector;

use crate::models::{ActionRecord, Decision, Message, Profile, UserId};
use crate::services::Storage;

/// Relationship engine: ledger, match detection, discovery and chat,
/// wired over one set of storage collaborators
#[derive(Clone)]
pub struct Engine {
    pub ledger: ActionLedger,
    pub matches: MatchDetector,
    pub discovery: DiscoverySelector,
    pub chat: ChatResolver,
}

impl Engine {
    pub fn new(storage: &Storage) -> Self {
        let ledger = ActionLedger::new(storage.actions.clone());
        let matches = MatchDetector::new(ledger.clone());
        let discovery = DiscoverySelector::new(ledger.clone(), storage.profiles.clone());
        let chat = ChatResolver::new(
            matches.clone(),
            storage.profiles.clone(),
            storage.messages.clone(),
        );

        Self {
            ledger,
            matches,
            discovery,
            chat,
        }
    }

    pub async fn record_decision(
        &self,
        actor_id: &UserId,
        target_id: &UserId,
        decision: Decision,
    ) -> Result<ActionRecord, EngineError> {
        self.ledger.record_decision(actor_id, target_id, decision).await
    }

    pub async fn get_decision(
        &self,
        actor_id: &UserId,
        target_id: &UserId,
    ) -> Result<Option<Decision>, EngineError> {
        self.ledger.get_decision(actor_id, target_id).await
    }

    pub async fn is_match(&self, user_a: &UserId, user_b: &UserId) -> Result<bool, EngineError> {
        self.matches.is_match(user_a, user_b).await
    }

    pub async fn record_like_and_check_match(
        &self,
        actor_id: &UserId,
        target_id: &UserId,
    ) -> Result<bool, EngineError> {
        self.matches.record_like_and_check_match(actor_id, target_id).await
    }

    pub async fn submit_decision(
        &self,
        actor_id: &UserId,
        target_id: &UserId,
        decision: Decision,
    ) -> Result<bool, EngineError> {
        self.matches.submit_decision(actor_id, target_id, decision).await
    }

    pub async fn next_candidate(&self, user_id: &UserId) -> Result<Option<Profile>, EngineError> {
        self.discovery.next_candidate(user_id).await
    }

    pub async fn list_match_peers(&self, user_id: &UserId) -> Result<Vec<Profile>, EngineError> {
        self.chat.list_match_peers(user_id).await
    }

    pub async fn get_conversation(
        &self,
        user_id: &UserId,
        peer_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Message>, EngineError> {
        self.chat.get_conversation(user_id, peer_id, limit).await
    }

    pub async fn send_message(
        &self,
        sender_id: &UserId,
        receiver_id: &UserId,
        text: &str,
    ) -> Result<Message, EngineError> {
        self.chat.send_message(sender_id, receiver_id, text).await
    }
}
