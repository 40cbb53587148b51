use std::sync::Arc;

use crate::core::EngineError;
use crate::models::{ActionRecord, Decision, UserId};
use crate::services::ActionStore;

/// Directional like/dislike ledger
///
/// One record per ordered (actor, target) pair. A repeat decision rewrites
/// the record in place; records are never removed.
#[derive(Clone)]
pub struct ActionLedger {
    store: Arc<dyn ActionStore>,
}

impl ActionLedger {
    pub fn new(store: Arc<dyn ActionStore>) -> Self {
        Self { store }
    }

    /// Record `actor`'s decision on `target`
    ///
    /// Rejects self-targeted decisions. Repeating the same decision is not
    /// an error and leaves a single record.
    pub async fn record_decision(
        &self,
        actor_id: &UserId,
        target_id: &UserId,
        decision: Decision,
    ) -> Result<ActionRecord, EngineError> {
        if actor_id == target_id {
            return Err(EngineError::InvalidAction(format!(
                "user {} cannot {} themselves",
                actor_id, decision
            )));
        }

        let record = self.store.upsert_action(actor_id, target_id, decision).await?;
        tracing::debug!("Ledger: {} -> {} = {}", actor_id, target_id, decision);

        Ok(record)
    }

    pub async fn get_decision(
        &self,
        actor_id: &UserId,
        target_id: &UserId,
    ) -> Result<Option<Decision>, EngineError> {
        Ok(self
            .store
            .find_action(actor_id, target_id)
            .await?
            .map(|record| record.decision))
    }

    /// Every target the actor decided on, whatever the decision
    pub async fn decided_targets(&self, actor_id: &UserId) -> Result<Vec<UserId>, EngineError> {
        Ok(self.store.targets_of(actor_id, None).await?)
    }

    /// Targets the actor currently likes, in ledger order
    pub async fn liked_targets(&self, actor_id: &UserId) -> Result<Vec<UserId>, EngineError> {
        Ok(self.store.targets_of(actor_id, Some(Decision::Like)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryStore;

    #[tokio::test]
    async fn test_self_decision_rejected() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ActionLedger::new(store.clone());
        let a = UserId::new();

        let result = ledger.record_decision(&a, &a, Decision::Like).await;
        assert!(matches!(result, Err(EngineError::InvalidAction(_))));
        assert_eq!(store.action_count().await, 0);
    }

    #[tokio::test]
    async fn test_repeat_decision_keeps_one_record() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ActionLedger::new(store.clone());
        let a = UserId::new();
        let b = UserId::new();

        ledger.record_decision(&a, &b, Decision::Like).await.unwrap();
        ledger.record_decision(&a, &b, Decision::Like).await.unwrap();

        assert_eq!(store.action_count().await, 1);
        assert_eq!(ledger.get_decision(&a, &b).await.unwrap(), Some(Decision::Like));
        assert_eq!(ledger.get_decision(&b, &a).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_liked_targets_excludes_dislikes() {
        let ledger = ActionLedger::new(Arc::new(MemoryStore::new()));
        let a = UserId::new();
        let b = UserId::new();
        let c = UserId::new();

        ledger.record_decision(&a, &b, Decision::Like).await.unwrap();
        ledger.record_decision(&a, &c, Decision::Dislike).await.unwrap();

        assert_eq!(ledger.liked_targets(&a).await.unwrap(), vec![b]);
        assert_eq!(ledger.decided_targets(&a).await.unwrap().len(), 2);
    }
}
