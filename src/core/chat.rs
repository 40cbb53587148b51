use std::sync::Arc;

use crate::core::{EngineError, MatchDetector};
use crate::models::{Message, Profile, UserId};
use crate::services::{MessageStore, ProfileStore};

/// Chat eligibility and conversation history
#[derive(Clone)]
pub struct ChatResolver {
    detector: MatchDetector,
    profiles: Arc<dyn ProfileStore>,
    messages: Arc<dyn MessageStore>,
}

impl ChatResolver {
    pub fn new(
        detector: MatchDetector,
        profiles: Arc<dyn ProfileStore>,
        messages: Arc<dyn MessageStore>,
    ) -> Self {
        Self {
            detector,
            profiles,
            messages,
        }
    }

    /// Profiles of every user currently matched with `user_id`
    ///
    /// Walks the user's likes in ledger order, so the result is stable while
    /// the ledger is unchanged. Peers without a profile are skipped.
    pub async fn list_match_peers(&self, user_id: &UserId) -> Result<Vec<Profile>, EngineError> {
        let mut peers = Vec::new();

        for target_id in self.detector.ledger().liked_targets(user_id).await? {
            if !self.detector.is_match(user_id, &target_id).await? {
                continue;
            }
            match self.profiles.get_profile(&target_id).await? {
                Some(profile) => peers.push(profile),
                None => tracing::debug!("Match peer {} has no profile yet", target_id),
            }
        }

        Ok(peers)
    }

    /// Messages between the two users, oldest first
    ///
    /// `limit` keeps the oldest `limit` messages, not the newest, and a limit
    /// of zero yields nothing. Retrieval is not gated on the pair still being
    /// matched.
    pub async fn get_conversation(
        &self,
        user_id: &UserId,
        peer_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Message>, EngineError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self.messages.conversation(user_id, peer_id, limit).await?)
    }

    /// Append a message with a server-assigned timestamp. Empty text is
    /// accepted.
    pub async fn send_message(
        &self,
        sender_id: &UserId,
        receiver_id: &UserId,
        text: &str,
    ) -> Result<Message, EngineError> {
        let message = self
            .messages
            .append_message(sender_id, receiver_id, text)
            .await?;

        tracing::debug!("Message {} sent: {} -> {}", message.id, sender_id, receiver_id);

        Ok(message)
    }
}
